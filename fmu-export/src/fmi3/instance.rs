use std::{ffi::CString, path::PathBuf};

use crate::fmi3::{
    Fmi3Error, Fmi3Res, Fmi3Status, ModelState, StoreError, binding,
    traits::{Model, ModelLoggingCategory, UserModel},
};

/// Host log-message callback, already lifted to Rust types.
pub type LogMessageFn = Box<dyn Fn(Fmi3Status, &str, &str) + Send + Sync>;

/// Logging context shared with the model.
///
/// Messages pass the host callback only while logging is on and the message's
/// category is in the active set; everything is additionally mirrored to the
/// `log` facade for local diagnostics.
pub struct ModelContext<M: UserModel> {
    logging_on: bool,
    active: Vec<M::LoggingCategory>,
    log_message: LogMessageFn,
}

impl<M: UserModel> ModelContext<M> {
    fn new(logging_on: bool, log_message: LogMessageFn) -> Self {
        Self {
            logging_on,
            active: M::LoggingCategory::all_categories().collect(),
            log_message,
        }
    }

    /// Context with a discarding host callback, for tests.
    pub fn new_for_test() -> Self {
        Self::new(false, Box::new(|_status, _category, _message| {}))
    }

    pub fn log(&self, status: impl Into<Fmi3Status>, category: M::LoggingCategory, message: &str) {
        let status = status.into();
        match status.ok() {
            Ok(_) => log::trace!("[{category}] {message}"),
            Err(err) => log::warn!("[{category}] {err}: {message}"),
        }
        if self.logging_on && self.active.contains(&category) {
            (self.log_message)(status, &category.to_string(), message);
        }
    }

    /// Replace the active category set. An empty list restores the model's
    /// full category set, mirroring the default state after instantiation.
    fn set_debug_logging(
        &mut self,
        logging_on: bool,
        categories: &[&str],
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.logging_on = logging_on;
        if categories.is_empty() {
            self.active = M::LoggingCategory::all_categories().collect();
            return Ok(Fmi3Res::OK);
        }
        let mut active = Vec::with_capacity(categories.len());
        for &name in categories {
            match name.parse::<M::LoggingCategory>() {
                Ok(category) => {
                    if !active.contains(&category) {
                        active.push(category);
                    }
                }
                Err(_) => {
                    log::warn!("unknown logging category \"{name}\"");
                    return Err(Fmi3Error::Error);
                }
            }
        }
        self.active = active;
        Ok(Fmi3Res::OK)
    }
}

/// Out-parameters of one communication step.
///
/// These FMUs never raise events, never terminate on their own, and never
/// return early, so only the reached time varies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub event_handling_needed: bool,
    pub terminate_simulation: bool,
    pub early_return: bool,
    pub last_successful_time: f64,
}

/// An exportable FMU instance: lifecycle state machine plus the batched
/// variable accessors over the model's pools.
pub struct ModelInstance<M: Model> {
    instance_name: String,
    resource_path: PathBuf,
    visible: bool,
    event_mode_used: bool,
    early_return_allowed: bool,
    state: ModelState,
    /// State to resume when configuration mode is exited.
    resume_state: ModelState,
    last_time: f64,
    context: ModelContext<M>,
    model: M,
}

macro_rules! instance_get_set {
    ($type_name:ident, $name:ident, $accessor:ident, $ty:ty) => {
        paste::paste! {
            #[doc = concat!("Batched accessor backing `fmi3Get", stringify!($type_name), "`.")]
            pub fn [<get_ $name>](
                &self,
                vrs: &[binding::fmi3ValueReference],
                values: &mut [$ty],
            ) -> Result<Fmi3Res, Fmi3Error> {
                self.trace(concat!("fmi3Get", stringify!($type_name), "(...)"));
                let res = match self.model.$accessor() {
                    Some(pool) => pool.read(vrs, values),
                    None if vrs.is_empty() => Ok(()),
                    None => Err(StoreError::UnknownValueReference(vrs[0])),
                };
                match res {
                    Ok(()) => Ok(Fmi3Res::OK),
                    Err(err) => Err(self.reject(concat!("fmi3Get", stringify!($type_name)), err)),
                }
            }

            #[doc = concat!("Batched accessor backing `fmi3Set", stringify!($type_name), "`.")]
            pub fn [<set_ $name>](
                &mut self,
                vrs: &[binding::fmi3ValueReference],
                values: &[$ty],
            ) -> Result<Fmi3Res, Fmi3Error> {
                self.trace(concat!("fmi3Set", stringify!($type_name), "(...)"));
                let in_configuration_mode = self.state == ModelState::ConfigurationMode;
                let res = match self.model.[<$accessor _mut>]() {
                    Some(pool) => pool.write(vrs, values, in_configuration_mode),
                    None if vrs.is_empty() => Ok(false),
                    None => Err(StoreError::UnknownValueReference(vrs[0])),
                };
                match res {
                    Ok(tuned) => self.after_set(tuned),
                    Err(err) => Err(self.reject(concat!("fmi3Set", stringify!($type_name)), err)),
                }
            }
        }
    };
}

impl<M: Model> ModelInstance<M> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        resource_path: PathBuf,
        visible: bool,
        logging_on: bool,
        event_mode_used: bool,
        early_return_allowed: bool,
        log_message: LogMessageFn,
        instantiation_token: &str,
    ) -> Result<Self, Fmi3Error> {
        if instantiation_token != M::INSTANTIATION_TOKEN {
            log::error!(
                "{}: instantiation token mismatch: expected \"{}\", got \"{}\"",
                M::MODEL_NAME,
                M::INSTANTIATION_TOKEN,
                instantiation_token
            );
            return Err(Fmi3Error::Error);
        }

        let mut model = M::default();
        model.set_start_values();

        let instance = Self {
            instance_name: name,
            resource_path,
            visible,
            event_mode_used,
            early_return_allowed,
            state: ModelState::Instantiated,
            resume_state: ModelState::Instantiated,
            last_time: 0.0,
            context: ModelContext::new(logging_on, log_message),
            model,
        };
        instance.trace(&format!(
            "{}: instantiated as \"{}\"",
            M::MODEL_NAME,
            instance.instance_name
        ));
        Ok(instance)
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn resource_path(&self) -> &PathBuf {
        &self.resource_path
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn event_mode_used(&self) -> bool {
        self.event_mode_used
    }

    pub fn early_return_allowed(&self) -> bool {
        self.early_return_allowed
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    pub fn context(&self) -> &ModelContext<M> {
        &self.context
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn trace(&self, message: &str) {
        self.context
            .log(Fmi3Res::OK, M::LoggingCategory::trace_category(), message);
    }

    fn reject(&self, function: &str, err: StoreError) -> Fmi3Error {
        self.context.log(
            Fmi3Error::Error,
            M::LoggingCategory::error_category(),
            &format!("{function}: {err}"),
        );
        Fmi3Error::Error
    }

    fn reject_state(&self, function: &str) -> Fmi3Error {
        self.context.log(
            Fmi3Error::Error,
            M::LoggingCategory::error_category(),
            &format!("{function}: not allowed in state {:?}", self.state),
        );
        Fmi3Error::Error
    }

    /// Diagnostic for the unsupported-function stub surface.
    pub fn log_unsupported(&self, function: &str) -> Fmi3Error {
        self.context.log(
            Fmi3Error::Error,
            M::LoggingCategory::error_category(),
            &format!("Unsupported function {function} called"),
        );
        Fmi3Error::Error
    }

    pub fn set_debug_logging(
        &mut self,
        logging_on: bool,
        categories: &[&str],
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3SetDebugLogging(...)");
        self.context.set_debug_logging(logging_on, categories)
    }

    pub fn enter_initialization_mode(
        &mut self,
        _tolerance: Option<f64>,
        start_time: f64,
        _stop_time: Option<f64>,
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3EnterInitializationMode(...)");
        if self.state != ModelState::Instantiated {
            return Err(self.reject_state("fmi3EnterInitializationMode"));
        }
        self.state = ModelState::InitializationMode;
        self.last_time = start_time;
        self.sync_time();
        self.model.update_calculated_parameters(&self.context)?;
        Ok(Fmi3Res::OK)
    }

    pub fn exit_initialization_mode(&mut self) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3ExitInitializationMode()");
        if self.state != ModelState::InitializationMode {
            return Err(self.reject_state("fmi3ExitInitializationMode"));
        }
        self.state = ModelState::StepMode;
        Ok(Fmi3Res::OK)
    }

    pub fn enter_configuration_mode(&mut self) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3EnterConfigurationMode()");
        if !M::RECONFIGURABLE {
            return Err(self.reject_state("fmi3EnterConfigurationMode"));
        }
        match self.state {
            ModelState::Instantiated | ModelState::StepMode => {
                self.resume_state = self.state;
                self.state = ModelState::ConfigurationMode;
                Ok(Fmi3Res::OK)
            }
            _ => Err(self.reject_state("fmi3EnterConfigurationMode")),
        }
    }

    pub fn exit_configuration_mode(&mut self) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3ExitConfigurationMode()");
        if self.state != ModelState::ConfigurationMode {
            return Err(self.reject_state("fmi3ExitConfigurationMode"));
        }
        self.model.reconfigure(&self.context)?;
        self.state = self.resume_state;
        Ok(Fmi3Res::OK)
    }

    /// Advance the instance by one communication step: recompute calculated
    /// parameters and outputs, then move the clock to the end of the step.
    pub fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
        _no_set_fmu_state_prior: bool,
    ) -> Result<StepResult, Fmi3Error> {
        self.trace(&format!(
            "fmi3DoStep({current_communication_point}, {communication_step_size})"
        ));
        if self.state != ModelState::StepMode {
            return Err(self.reject_state("fmi3DoStep"));
        }
        self.model.update_calculated_parameters(&self.context)?;
        self.model.compute_outputs(&self.context)?;
        self.last_time = current_communication_point + communication_step_size;
        self.sync_time();
        Ok(StepResult {
            event_handling_needed: false,
            terminate_simulation: false,
            early_return: false,
            last_successful_time: self.last_time,
        })
    }

    pub fn terminate(&mut self) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3Terminate()");
        self.state = ModelState::Terminated;
        Ok(Fmi3Res::OK)
    }

    /// Return the instance to its freshly-instantiated state: start values,
    /// default dimensions, clock at zero.
    pub fn reset(&mut self) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3Reset()");
        self.model = M::default();
        self.model.set_start_values();
        self.state = ModelState::Instantiated;
        self.resume_state = ModelState::Instantiated;
        self.last_time = 0.0;
        Ok(Fmi3Res::OK)
    }

    fn sync_time(&mut self) {
        let time = self.last_time;
        if let Some(pool) = self.model.float64s_mut() {
            pool.set_time(time);
        }
    }

    fn after_set(&mut self, tuned: bool) -> Result<Fmi3Res, Fmi3Error> {
        if tuned || self.state == ModelState::InitializationMode {
            self.model.update_calculated_parameters(&self.context)?;
        }
        Ok(Fmi3Res::OK)
    }

    instance_get_set!(Float64, float64, float64s, f64);
    instance_get_set!(Float32, float32, float32s, f32);
    instance_get_set!(UInt64, uint64, uint64s, u64);
    instance_get_set!(Int64, int64, int64s, i64);
    instance_get_set!(UInt32, uint32, uint32s, u32);
    instance_get_set!(Int32, int32, int32s, i32);
    instance_get_set!(UInt16, uint16, uint16s, u16);
    instance_get_set!(Int16, int16, int16s, i16);
    instance_get_set!(UInt8, uint8, uint8s, u8);
    instance_get_set!(Int8, int8, int8s, i8);
    instance_get_set!(Boolean, boolean, booleans, bool);

    /// Batched accessor backing `fmi3GetString`. The visitor receives one
    /// string per element; pointers taken from it stay valid until the next
    /// mutating call on the instance.
    pub fn get_string(
        &self,
        vrs: &[binding::fmi3ValueReference],
        n_values: usize,
        mut visit: impl FnMut(&CString),
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3GetString(...)");
        let res = (|| {
            let pool = match self.model.strings() {
                Some(pool) => pool,
                None if vrs.is_empty() => return Ok(()),
                None => return Err(StoreError::UnknownValueReference(vrs[0])),
            };
            let expected = pool.span(vrs)?;
            if expected != n_values {
                return Err(StoreError::SizeMismatch {
                    expected,
                    given: n_values,
                });
            }
            pool.visit(vrs, |value| visit(value))
        })();
        res.map(|()| Fmi3Res::OK)
            .map_err(|err| self.reject("fmi3GetString", err))
    }

    /// Batched accessor backing `fmi3SetString`.
    pub fn set_string(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[CString],
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3SetString(...)");
        let in_configuration_mode = self.state == ModelState::ConfigurationMode;
        let res = match self.model.strings_mut() {
            Some(pool) => pool.write(vrs, values, in_configuration_mode),
            None if vrs.is_empty() => Ok(false),
            None => Err(StoreError::UnknownValueReference(vrs[0])),
        };
        match res {
            Ok(tuned) => self.after_set(tuned),
            Err(err) => Err(self.reject("fmi3SetString", err)),
        }
    }

    /// Batched accessor backing `fmi3GetBinary`. The visitor receives one
    /// byte buffer per element; pointers taken from it stay valid until the
    /// next mutating call on the instance.
    pub fn get_binary(
        &self,
        vrs: &[binding::fmi3ValueReference],
        n_values: usize,
        mut visit: impl FnMut(&[u8]),
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3GetBinary(...)");
        let res = (|| {
            let pool = match self.model.binaries() {
                Some(pool) => pool,
                None if vrs.is_empty() => return Ok(()),
                None => return Err(StoreError::UnknownValueReference(vrs[0])),
            };
            let expected = pool.span(vrs)?;
            if expected != n_values {
                return Err(StoreError::SizeMismatch {
                    expected,
                    given: n_values,
                });
            }
            pool.visit(vrs, |value| visit(value))
        })();
        res.map(|()| Fmi3Res::OK)
            .map_err(|err| self.reject("fmi3GetBinary", err))
    }

    /// Batched accessor backing `fmi3SetBinary`. Each incoming buffer replaces
    /// the previously owned one.
    pub fn set_binary(
        &mut self,
        vrs: &[binding::fmi3ValueReference],
        values: &[&[u8]],
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.trace("fmi3SetBinary(...)");
        let in_configuration_mode = self.state == ModelState::ConfigurationMode;
        let owned: Vec<Vec<u8>> = values.iter().map(|value| value.to_vec()).collect();
        let res = match self.model.binaries_mut() {
            Some(pool) => pool.write(vrs, &owned, in_configuration_mode),
            None if vrs.is_empty() => Ok(false),
            None => Err(StoreError::UnknownValueReference(vrs[0])),
        };
        match res {
            Ok(tuned) => self.after_set(tuned),
            Err(err) => Err(self.reject("fmi3SetBinary", err)),
        }
    }
}
