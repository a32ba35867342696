//! Helpers behind the generated C API functions.
//!
//! [`export_fmu!`](crate::export_fmu) expands to thin `extern "C"` shims; the
//! pointer handling lives here so the macro output stays readable.

use std::{
    ffi::{CStr, CString},
    path::PathBuf,
};

use crate::fmi3::{
    Fmi3Error, Fmi3Res, Fmi3Status, LogMessageFn, Model, ModelInstance, ModelLoggingCategory,
    UserModel, binding,
};

/// Map a Rust-level result onto the raw status crossing the ABI.
pub fn status(result: Result<Fmi3Res, Fmi3Error>) -> binding::fmi3Status {
    Fmi3Status::from(result).into()
}

/// Borrow `len` elements behind a C array pointer, tolerating the null/empty
/// combination some hosts pass.
///
/// # Safety
/// `ptr` must be valid for reads of `len` elements when non-null.
pub unsafe fn ref_slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

/// Mutable counterpart of [`ref_slice`].
///
/// # Safety
/// `ptr` must be valid for writes of `len` elements when non-null.
pub unsafe fn mut_slice<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        &mut []
    } else {
        unsafe { std::slice::from_raw_parts_mut(ptr, len) }
    }
}

unsafe fn cstr_arg(ptr: binding::fmi3String) -> Option<String> {
    (!ptr.is_null()).then(|| unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Shared body of the `fmi3Instantiate*` entry points: lift the C arguments,
/// wrap the host callback, and box the instance into an opaque handle.
///
/// A null instantiation token skips the token check. Any construction failure
/// yields a null handle with nothing left allocated.
///
/// # Safety
/// The string arguments must be null or valid NUL-terminated C strings.
pub unsafe fn instantiate<M: Model>(
    instance_name: binding::fmi3String,
    instantiation_token: binding::fmi3String,
    resource_path: binding::fmi3String,
    visible: binding::fmi3Boolean,
    logging_on: binding::fmi3Boolean,
    event_mode_used: binding::fmi3Boolean,
    early_return_allowed: binding::fmi3Boolean,
    instance_environment: binding::fmi3InstanceEnvironment,
    log_message: binding::fmi3LogMessageCallback,
) -> binding::fmi3Instance {
    let Some(log_message) = log_message else {
        log::error!("{}: no log message callback provided", M::MODEL_NAME);
        return std::ptr::null_mut();
    };
    let Some(name) = (unsafe { cstr_arg(instance_name) }) else {
        log::error!("{}: no instance name provided", M::MODEL_NAME);
        return std::ptr::null_mut();
    };
    let token = unsafe { cstr_arg(instantiation_token) }
        .unwrap_or_else(|| M::INSTANTIATION_TOKEN.to_owned());
    let resource_path = PathBuf::from(unsafe { cstr_arg(resource_path) }.unwrap_or_default());

    // The environment pointer is owned by the host and only ever handed back
    // through the callback, so it can ride along as an integer.
    let environment = instance_environment as usize;
    let callback: LogMessageFn = Box::new(move |status, category, message| {
        let category = CString::new(category).unwrap_or_default();
        let message = CString::new(message).unwrap_or_default();
        unsafe {
            log_message(
                environment as binding::fmi3InstanceEnvironment,
                status.into(),
                category.as_ptr(),
                message.as_ptr(),
            )
        };
    });

    match ModelInstance::<M>::new(
        name,
        resource_path,
        visible,
        logging_on,
        event_mode_used,
        early_return_allowed,
        callback,
        &token,
    ) {
        Ok(instance) => Box::into_raw(Box::new(instance)) as binding::fmi3Instance,
        Err(_) => std::ptr::null_mut(),
    }
}

/// Shared body of `fmi3FreeInstance`: reclaim the box, dropping every owned
/// buffer. Null handles are ignored.
///
/// # Safety
/// `instance` must be null or a handle previously returned by
/// [`instantiate::<M>`] that has not been freed.
pub unsafe fn free_instance<M: Model>(instance: binding::fmi3Instance) {
    if instance.is_null() {
        log::warn!("fmi3FreeInstance called with a null instance");
        return;
    }
    let instance = unsafe { Box::from_raw(instance as *mut ModelInstance<M>) };
    instance.context().log(
        Fmi3Res::OK,
        <M as UserModel>::LoggingCategory::trace_category(),
        &format!("{}: fmi3FreeInstance()", instance.instance_name()),
    );
}

/// Shared body of the unsupported-function stubs: log through the instance
/// when one exists, then report `fmi3Error`. No state transition occurs.
///
/// # Safety
/// `instance` must be null or a live handle created by [`instantiate::<M>`].
pub unsafe fn unsupported<M: Model>(
    instance: binding::fmi3Instance,
    function: &str,
) -> binding::fmi3Status {
    if instance.is_null() {
        log::warn!("Unsupported function {function} called on a null instance");
    } else {
        let instance = unsafe { &*(instance as *const ModelInstance<M>) };
        instance.log_unsupported(function);
    }
    binding::fmi3Status_fmi3Error
}

/// Dereference an instance handle inside a status-returning wrapper,
/// reporting `fmi3Error` for null handles.
#[macro_export]
macro_rules! checked_deref {
    ($ptr:expr, $ty:ty) => {{
        if $ptr.is_null() {
            $crate::log::error!("invalid FMU instance handle");
            return $crate::fmi3::binding::fmi3Status_fmi3Error;
        }
        unsafe { &mut *($ptr as *mut $crate::fmi3::ModelInstance<$ty>) }
    }};
}

/// Generates the exported getter and setter pair for one FMI scalar type.
#[macro_export]
macro_rules! export_getset {
    ($ty:ty, $type_name:ident, $name:ident, $abi_ty:ty) => {
        $crate::paste::paste! {
            #[unsafe(export_name = stringify!([<fmi3Get $type_name>]))]
            pub unsafe extern "C" fn [<fmi3_get_ $name>](
                instance: $crate::fmi3::binding::fmi3Instance,
                value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                n_value_references: usize,
                values: *mut $abi_ty,
                n_values: usize,
            ) -> $crate::fmi3::binding::fmi3Status {
                let instance = $crate::checked_deref!(instance, $ty);
                let vrs = unsafe { $crate::fmi3::export::ref_slice(value_references, n_value_references) };
                let values = unsafe { $crate::fmi3::export::mut_slice(values, n_values) };
                $crate::fmi3::export::status(instance.[<get_ $name>](vrs, values))
            }

            #[unsafe(export_name = stringify!([<fmi3Set $type_name>]))]
            pub unsafe extern "C" fn [<fmi3_set_ $name>](
                instance: $crate::fmi3::binding::fmi3Instance,
                value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                n_value_references: usize,
                values: *const $abi_ty,
                n_values: usize,
            ) -> $crate::fmi3::binding::fmi3Status {
                let instance = $crate::checked_deref!(instance, $ty);
                let vrs = unsafe { $crate::fmi3::export::ref_slice(value_references, n_value_references) };
                let values = unsafe { $crate::fmi3::export::ref_slice(values, n_values) };
                $crate::fmi3::export::status(instance.[<set_ $name>](vrs, values))
            }
        }
    };
}

/// Generates the always-erroring stubs for the parts of the standard surface
/// these FMUs do not implement.
#[macro_export]
macro_rules! export_unsupported {
    ($ty:ty, $( $c_name:ident ( $( $arg:ident : $argty:ty ),* $(,)? ) );* $(;)? ) => {
        $crate::paste::paste! { $(
            #[unsafe(export_name = stringify!($c_name))]
            pub unsafe extern "C" fn [<$c_name:snake>](
                instance: $crate::fmi3::binding::fmi3Instance,
                $( $arg: $argty ),*
            ) -> $crate::fmi3::binding::fmi3Status {
                unsafe { $crate::fmi3::export::unsupported::<$ty>(instance, stringify!($c_name)) }
            }
        )* }
    };
}

/// Exports the complete FMI 3.0 C API for a model type.
///
/// `co_simulation` emits the final FMI 3.0 Co-Simulation entry points;
/// `basic_co_simulation` emits the draft Basic Co-Simulation variants of
/// `fmi3Instantiate*` and `fmi3DoStep` instead. Everything else (version and
/// logging control, the lifecycle functions, the typed get/set families, and
/// the unsupported-stub surface) is identical between the two.
#[macro_export]
macro_rules! export_fmu {
    (co_simulation: $ty:ty) => {
        $crate::export_fmu!(@common $ty);

        #[unsafe(export_name = "fmi3InstantiateCoSimulation")]
        pub unsafe extern "C" fn fmi3_instantiate_co_simulation(
            instance_name: $crate::fmi3::binding::fmi3String,
            instantiation_token: $crate::fmi3::binding::fmi3String,
            resource_path: $crate::fmi3::binding::fmi3String,
            visible: $crate::fmi3::binding::fmi3Boolean,
            logging_on: $crate::fmi3::binding::fmi3Boolean,
            event_mode_used: $crate::fmi3::binding::fmi3Boolean,
            early_return_allowed: $crate::fmi3::binding::fmi3Boolean,
            _required_intermediate_variables: *const $crate::fmi3::binding::fmi3ValueReference,
            _n_required_intermediate_variables: usize,
            instance_environment: $crate::fmi3::binding::fmi3InstanceEnvironment,
            log_message: $crate::fmi3::binding::fmi3LogMessageCallback,
            _intermediate_update: $crate::fmi3::binding::fmi3IntermediateUpdateCallback,
        ) -> $crate::fmi3::binding::fmi3Instance {
            unsafe {
                $crate::fmi3::export::instantiate::<$ty>(
                    instance_name,
                    instantiation_token,
                    resource_path,
                    visible,
                    logging_on,
                    event_mode_used,
                    early_return_allowed,
                    instance_environment,
                    log_message,
                )
            }
        }

        #[unsafe(export_name = "fmi3DoStep")]
        pub unsafe extern "C" fn fmi3_do_step(
            instance: $crate::fmi3::binding::fmi3Instance,
            current_communication_point: $crate::fmi3::binding::fmi3Float64,
            communication_step_size: $crate::fmi3::binding::fmi3Float64,
            no_set_fmu_state_prior_to_current_point: $crate::fmi3::binding::fmi3Boolean,
            event_handling_needed: *mut $crate::fmi3::binding::fmi3Boolean,
            terminate_simulation: *mut $crate::fmi3::binding::fmi3Boolean,
            early_return: *mut $crate::fmi3::binding::fmi3Boolean,
            last_successful_time: *mut $crate::fmi3::binding::fmi3Float64,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            match instance.do_step(
                current_communication_point,
                communication_step_size,
                no_set_fmu_state_prior_to_current_point,
            ) {
                Ok(step) => {
                    unsafe {
                        if !event_handling_needed.is_null() {
                            *event_handling_needed = step.event_handling_needed;
                        }
                        if !terminate_simulation.is_null() {
                            *terminate_simulation = step.terminate_simulation;
                        }
                        if !early_return.is_null() {
                            *early_return = step.early_return;
                        }
                        if !last_successful_time.is_null() {
                            *last_successful_time = step.last_successful_time;
                        }
                    }
                    $crate::fmi3::binding::fmi3Status_fmi3OK
                }
                Err(err) => $crate::fmi3::export::status(Err(err)),
            }
        }
    };

    (basic_co_simulation: $ty:ty) => {
        $crate::export_fmu!(@common $ty);

        #[unsafe(export_name = "fmi3InstantiateBasicCoSimulation")]
        pub unsafe extern "C" fn fmi3_instantiate_basic_co_simulation(
            instance_name: $crate::fmi3::binding::fmi3String,
            instantiation_token: $crate::fmi3::binding::fmi3String,
            resource_path: $crate::fmi3::binding::fmi3String,
            visible: $crate::fmi3::binding::fmi3Boolean,
            logging_on: $crate::fmi3::binding::fmi3Boolean,
            _intermediate_variable_get_required: $crate::fmi3::binding::fmi3Boolean,
            _intermediate_internal_variable_get_required: $crate::fmi3::binding::fmi3Boolean,
            _intermediate_variable_set_required: $crate::fmi3::binding::fmi3Boolean,
            instance_environment: $crate::fmi3::binding::fmi3InstanceEnvironment,
            log_message: $crate::fmi3::binding::fmi3LogMessageCallback,
            _intermediate_update: $crate::fmi3::binding::fmi3IntermediateUpdateCallback,
        ) -> $crate::fmi3::binding::fmi3Instance {
            unsafe {
                $crate::fmi3::export::instantiate::<$ty>(
                    instance_name,
                    instantiation_token,
                    resource_path,
                    visible,
                    logging_on,
                    false,
                    false,
                    instance_environment,
                    log_message,
                )
            }
        }

        #[unsafe(export_name = "fmi3DoStep")]
        pub unsafe extern "C" fn fmi3_do_step(
            instance: $crate::fmi3::binding::fmi3Instance,
            current_communication_point: $crate::fmi3::binding::fmi3Float64,
            communication_step_size: $crate::fmi3::binding::fmi3Float64,
            no_set_fmu_state_prior_to_current_point: $crate::fmi3::binding::fmi3Boolean,
            early_return: *mut $crate::fmi3::binding::fmi3Boolean,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            match instance.do_step(
                current_communication_point,
                communication_step_size,
                no_set_fmu_state_prior_to_current_point,
            ) {
                Ok(step) => {
                    unsafe {
                        if !early_return.is_null() {
                            *early_return = step.early_return;
                        }
                    }
                    $crate::fmi3::binding::fmi3Status_fmi3OK
                }
                Err(err) => $crate::fmi3::export::status(Err(err)),
            }
        }
    };

    (@common $ty:ty) => {
        // Inquire version number and set debug logging

        #[unsafe(export_name = "fmi3GetVersion")]
        pub unsafe extern "C" fn fmi3_get_version() -> *const ::std::os::raw::c_char {
            $crate::fmi3::binding::fmi3Version.as_ptr() as *const ::std::os::raw::c_char
        }

        #[unsafe(export_name = "fmi3SetDebugLogging")]
        pub unsafe extern "C" fn fmi3_set_debug_logging(
            instance: $crate::fmi3::binding::fmi3Instance,
            logging_on: $crate::fmi3::binding::fmi3Boolean,
            n_categories: usize,
            categories: *const $crate::fmi3::binding::fmi3String,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            let raw = unsafe { $crate::fmi3::export::ref_slice(categories, n_categories) };
            let categories: ::std::vec::Vec<&str> = raw
                .iter()
                .filter_map(|&ptr| {
                    if ptr.is_null() {
                        None
                    } else {
                        unsafe { ::std::ffi::CStr::from_ptr(ptr) }.to_str().ok()
                    }
                })
                .collect();
            $crate::fmi3::export::status(instance.set_debug_logging(logging_on, &categories))
        }

        // Creation and destruction of FMU instances

        #[unsafe(export_name = "fmi3InstantiateModelExchange")]
        pub unsafe extern "C" fn fmi3_instantiate_model_exchange(
            _instance_name: $crate::fmi3::binding::fmi3String,
            _instantiation_token: $crate::fmi3::binding::fmi3String,
            _resource_path: $crate::fmi3::binding::fmi3String,
            _visible: $crate::fmi3::binding::fmi3Boolean,
            _logging_on: $crate::fmi3::binding::fmi3Boolean,
            _instance_environment: $crate::fmi3::binding::fmi3InstanceEnvironment,
            _log_message: $crate::fmi3::binding::fmi3LogMessageCallback,
        ) -> $crate::fmi3::binding::fmi3Instance {
            $crate::log::warn!("fmi3InstantiateModelExchange is not supported by this FMU");
            ::std::ptr::null_mut()
        }

        #[unsafe(export_name = "fmi3InstantiateScheduledExecution")]
        pub unsafe extern "C" fn fmi3_instantiate_scheduled_execution(
            _instance_name: $crate::fmi3::binding::fmi3String,
            _instantiation_token: $crate::fmi3::binding::fmi3String,
            _resource_path: $crate::fmi3::binding::fmi3String,
            _visible: $crate::fmi3::binding::fmi3Boolean,
            _logging_on: $crate::fmi3::binding::fmi3Boolean,
            _instance_environment: $crate::fmi3::binding::fmi3InstanceEnvironment,
            _log_message: $crate::fmi3::binding::fmi3LogMessageCallback,
            _clock_update: $crate::fmi3::binding::fmi3ClockUpdateCallback,
            _lock_preemption: $crate::fmi3::binding::fmi3LockPreemptionCallback,
            _unlock_preemption: $crate::fmi3::binding::fmi3UnlockPreemptionCallback,
        ) -> $crate::fmi3::binding::fmi3Instance {
            $crate::log::warn!("fmi3InstantiateScheduledExecution is not supported by this FMU");
            ::std::ptr::null_mut()
        }

        #[unsafe(export_name = "fmi3FreeInstance")]
        pub unsafe extern "C" fn fmi3_free_instance(
            instance: $crate::fmi3::binding::fmi3Instance,
        ) {
            unsafe { $crate::fmi3::export::free_instance::<$ty>(instance) }
        }

        // Enter and exit initialization mode, terminate and reset

        #[unsafe(export_name = "fmi3EnterInitializationMode")]
        pub unsafe extern "C" fn fmi3_enter_initialization_mode(
            instance: $crate::fmi3::binding::fmi3Instance,
            tolerance_defined: $crate::fmi3::binding::fmi3Boolean,
            tolerance: $crate::fmi3::binding::fmi3Float64,
            start_time: $crate::fmi3::binding::fmi3Float64,
            stop_time_defined: $crate::fmi3::binding::fmi3Boolean,
            stop_time: $crate::fmi3::binding::fmi3Float64,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            let tolerance = tolerance_defined.then_some(tolerance);
            let stop_time = stop_time_defined.then_some(stop_time);
            $crate::fmi3::export::status(
                instance.enter_initialization_mode(tolerance, start_time, stop_time),
            )
        }

        #[unsafe(export_name = "fmi3ExitInitializationMode")]
        pub unsafe extern "C" fn fmi3_exit_initialization_mode(
            instance: $crate::fmi3::binding::fmi3Instance,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            $crate::fmi3::export::status(instance.exit_initialization_mode())
        }

        #[unsafe(export_name = "fmi3Terminate")]
        pub unsafe extern "C" fn fmi3_terminate(
            instance: $crate::fmi3::binding::fmi3Instance,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            $crate::fmi3::export::status(instance.terminate())
        }

        #[unsafe(export_name = "fmi3Reset")]
        pub unsafe extern "C" fn fmi3_reset(
            instance: $crate::fmi3::binding::fmi3Instance,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            $crate::fmi3::export::status(instance.reset())
        }

        // Entering and exiting the Configuration or Reconfiguration Mode

        #[unsafe(export_name = "fmi3EnterConfigurationMode")]
        pub unsafe extern "C" fn fmi3_enter_configuration_mode(
            instance: $crate::fmi3::binding::fmi3Instance,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            $crate::fmi3::export::status(instance.enter_configuration_mode())
        }

        #[unsafe(export_name = "fmi3ExitConfigurationMode")]
        pub unsafe extern "C" fn fmi3_exit_configuration_mode(
            instance: $crate::fmi3::binding::fmi3Instance,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            $crate::fmi3::export::status(instance.exit_configuration_mode())
        }

        // Getting and setting variable values

        $crate::export_getset!($ty, Float64, float64, $crate::fmi3::binding::fmi3Float64);
        $crate::export_getset!($ty, Float32, float32, $crate::fmi3::binding::fmi3Float32);
        $crate::export_getset!($ty, UInt64, uint64, $crate::fmi3::binding::fmi3UInt64);
        $crate::export_getset!($ty, Int64, int64, $crate::fmi3::binding::fmi3Int64);
        $crate::export_getset!($ty, UInt32, uint32, $crate::fmi3::binding::fmi3UInt32);
        $crate::export_getset!($ty, Int32, int32, $crate::fmi3::binding::fmi3Int32);
        $crate::export_getset!($ty, UInt16, uint16, $crate::fmi3::binding::fmi3UInt16);
        $crate::export_getset!($ty, Int16, int16, $crate::fmi3::binding::fmi3Int16);
        $crate::export_getset!($ty, UInt8, uint8, $crate::fmi3::binding::fmi3UInt8);
        $crate::export_getset!($ty, Int8, int8, $crate::fmi3::binding::fmi3Int8);
        $crate::export_getset!($ty, Boolean, boolean, $crate::fmi3::binding::fmi3Boolean);

        #[unsafe(export_name = "fmi3GetString")]
        pub unsafe extern "C" fn fmi3_get_string(
            instance: $crate::fmi3::binding::fmi3Instance,
            value_references: *const $crate::fmi3::binding::fmi3ValueReference,
            n_value_references: usize,
            values: *mut $crate::fmi3::binding::fmi3String,
            n_values: usize,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            let vrs = unsafe { $crate::fmi3::export::ref_slice(value_references, n_value_references) };
            let out = unsafe { $crate::fmi3::export::mut_slice(values, n_values) };
            let mut next = 0;
            $crate::fmi3::export::status(instance.get_string(vrs, n_values, |value| {
                out[next] = value.as_ptr();
                next += 1;
            }))
        }

        #[unsafe(export_name = "fmi3SetString")]
        pub unsafe extern "C" fn fmi3_set_string(
            instance: $crate::fmi3::binding::fmi3Instance,
            value_references: *const $crate::fmi3::binding::fmi3ValueReference,
            n_value_references: usize,
            values: *const $crate::fmi3::binding::fmi3String,
            n_values: usize,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            let vrs = unsafe { $crate::fmi3::export::ref_slice(value_references, n_value_references) };
            let raw = unsafe { $crate::fmi3::export::ref_slice(values, n_values) };
            let values: ::std::vec::Vec<::std::ffi::CString> = raw
                .iter()
                .map(|&ptr| {
                    if ptr.is_null() {
                        ::std::ffi::CString::default()
                    } else {
                        unsafe { ::std::ffi::CStr::from_ptr(ptr) }.to_owned()
                    }
                })
                .collect();
            $crate::fmi3::export::status(instance.set_string(vrs, &values))
        }

        #[unsafe(export_name = "fmi3GetBinary")]
        pub unsafe extern "C" fn fmi3_get_binary(
            instance: $crate::fmi3::binding::fmi3Instance,
            value_references: *const $crate::fmi3::binding::fmi3ValueReference,
            n_value_references: usize,
            value_sizes: *mut usize,
            values: *mut $crate::fmi3::binding::fmi3Binary,
            n_values: usize,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            let vrs = unsafe { $crate::fmi3::export::ref_slice(value_references, n_value_references) };
            let sizes = unsafe { $crate::fmi3::export::mut_slice(value_sizes, n_values) };
            let out = unsafe { $crate::fmi3::export::mut_slice(values, n_values) };
            let mut next = 0;
            $crate::fmi3::export::status(instance.get_binary(vrs, n_values, |value| {
                sizes[next] = value.len();
                out[next] = value.as_ptr();
                next += 1;
            }))
        }

        #[unsafe(export_name = "fmi3SetBinary")]
        pub unsafe extern "C" fn fmi3_set_binary(
            instance: $crate::fmi3::binding::fmi3Instance,
            value_references: *const $crate::fmi3::binding::fmi3ValueReference,
            n_value_references: usize,
            value_sizes: *const usize,
            values: *const $crate::fmi3::binding::fmi3Binary,
            n_values: usize,
        ) -> $crate::fmi3::binding::fmi3Status {
            let instance = $crate::checked_deref!(instance, $ty);
            let vrs = unsafe { $crate::fmi3::export::ref_slice(value_references, n_value_references) };
            let sizes = unsafe { $crate::fmi3::export::ref_slice(value_sizes, n_values) };
            let raw = unsafe { $crate::fmi3::export::ref_slice(values, n_values) };
            let buffers: ::std::vec::Vec<&[u8]> = raw
                .iter()
                .zip(sizes)
                .map(|(&ptr, &len)| unsafe { $crate::fmi3::export::ref_slice(ptr, len) })
                .collect();
            $crate::fmi3::export::status(instance.set_binary(vrs, &buffers))
        }

        // Everything below is outside the supported surface of these FMUs.

        $crate::export_unsupported!($ty,
            fmi3EnterEventMode();
            fmi3EnterStepMode();
            fmi3EnterContinuousTimeMode();
            fmi3CompletedIntegratorStep(
                _no_set_fmu_state_prior: $crate::fmi3::binding::fmi3Boolean,
                _enter_event_mode: *mut $crate::fmi3::binding::fmi3Boolean,
                _terminate_simulation: *mut $crate::fmi3::binding::fmi3Boolean,
            );
            fmi3SetTime(_time: $crate::fmi3::binding::fmi3Float64);
            fmi3SetContinuousStates(
                _continuous_states: *const $crate::fmi3::binding::fmi3Float64,
                _n_continuous_states: usize,
            );
            fmi3GetContinuousStateDerivatives(
                _derivatives: *mut $crate::fmi3::binding::fmi3Float64,
                _n_continuous_states: usize,
            );
            fmi3GetEventIndicators(
                _event_indicators: *mut $crate::fmi3::binding::fmi3Float64,
                _n_event_indicators: usize,
            );
            fmi3GetContinuousStates(
                _continuous_states: *mut $crate::fmi3::binding::fmi3Float64,
                _n_continuous_states: usize,
            );
            fmi3GetNominalsOfContinuousStates(
                _nominals: *mut $crate::fmi3::binding::fmi3Float64,
                _n_continuous_states: usize,
            );
            fmi3GetNumberOfEventIndicators(_n_event_indicators: *mut usize);
            fmi3GetNumberOfContinuousStates(_n_continuous_states: *mut usize);
            fmi3GetNumberOfVariableDependencies(
                _value_reference: $crate::fmi3::binding::fmi3ValueReference,
                _n_dependencies: *mut usize,
            );
            fmi3GetVariableDependencies(
                _dependent: $crate::fmi3::binding::fmi3ValueReference,
                _element_indices_of_dependent: *mut usize,
                _independents: *mut $crate::fmi3::binding::fmi3ValueReference,
                _element_indices_of_independents: *mut usize,
                _dependency_kinds: *mut $crate::fmi3::binding::fmi3DependencyKind,
                _n_dependencies: usize,
            );
            fmi3GetFMUState(_fmu_state: *mut $crate::fmi3::binding::fmi3FMUState);
            fmi3SetFMUState(_fmu_state: $crate::fmi3::binding::fmi3FMUState);
            fmi3FreeFMUState(_fmu_state: *mut $crate::fmi3::binding::fmi3FMUState);
            fmi3SerializedFMUStateSize(
                _fmu_state: $crate::fmi3::binding::fmi3FMUState,
                _size: *mut usize,
            );
            fmi3SerializeFMUState(
                _fmu_state: $crate::fmi3::binding::fmi3FMUState,
                _serialized_state: *mut $crate::fmi3::binding::fmi3Byte,
                _size: usize,
            );
            fmi3DeserializeFMUState(
                _serialized_state: *const $crate::fmi3::binding::fmi3Byte,
                _size: usize,
                _fmu_state: *mut $crate::fmi3::binding::fmi3FMUState,
            );
            fmi3GetDirectionalDerivative(
                _unknowns: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_unknowns: usize,
                _knowns: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_knowns: usize,
                _seed: *const $crate::fmi3::binding::fmi3Float64,
                _n_seed: usize,
                _sensitivity: *mut $crate::fmi3::binding::fmi3Float64,
                _n_sensitivity: usize,
            );
            fmi3GetAdjointDerivative(
                _unknowns: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_unknowns: usize,
                _knowns: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_knowns: usize,
                _seed: *const $crate::fmi3::binding::fmi3Float64,
                _n_seed: usize,
                _sensitivity: *mut $crate::fmi3::binding::fmi3Float64,
                _n_sensitivity: usize,
            );
            fmi3GetClock(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _values: *mut $crate::fmi3::binding::fmi3Clock,
            );
            fmi3SetClock(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _values: *const $crate::fmi3::binding::fmi3Clock,
            );
            fmi3GetIntervalDecimal(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _intervals: *mut $crate::fmi3::binding::fmi3Float64,
                _qualifiers: *mut $crate::fmi3::binding::fmi3IntervalQualifier,
            );
            fmi3GetIntervalFraction(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _counters: *mut $crate::fmi3::binding::fmi3UInt64,
                _resolutions: *mut $crate::fmi3::binding::fmi3UInt64,
                _qualifiers: *mut $crate::fmi3::binding::fmi3IntervalQualifier,
            );
            fmi3GetShiftDecimal(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _shifts: *mut $crate::fmi3::binding::fmi3Float64,
            );
            fmi3GetShiftFraction(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _counters: *mut $crate::fmi3::binding::fmi3UInt64,
                _resolutions: *mut $crate::fmi3::binding::fmi3UInt64,
            );
            fmi3SetIntervalDecimal(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _intervals: *const $crate::fmi3::binding::fmi3Float64,
            );
            fmi3SetIntervalFraction(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _counters: *const $crate::fmi3::binding::fmi3UInt64,
                _resolutions: *const $crate::fmi3::binding::fmi3UInt64,
            );
            fmi3SetShiftDecimal(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _shifts: *const $crate::fmi3::binding::fmi3Float64,
            );
            fmi3SetShiftFraction(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _counters: *const $crate::fmi3::binding::fmi3UInt64,
                _resolutions: *const $crate::fmi3::binding::fmi3UInt64,
            );
            fmi3EvaluateDiscreteStates();
            fmi3UpdateDiscreteStates(
                _discrete_states_need_update: *mut $crate::fmi3::binding::fmi3Boolean,
                _terminate_simulation: *mut $crate::fmi3::binding::fmi3Boolean,
                _nominals_of_continuous_states_changed: *mut $crate::fmi3::binding::fmi3Boolean,
                _values_of_continuous_states_changed: *mut $crate::fmi3::binding::fmi3Boolean,
                _next_event_time_defined: *mut $crate::fmi3::binding::fmi3Boolean,
                _next_event_time: *mut $crate::fmi3::binding::fmi3Float64,
            );
            fmi3GetOutputDerivatives(
                _value_references: *const $crate::fmi3::binding::fmi3ValueReference,
                _n_value_references: usize,
                _orders: *const $crate::fmi3::binding::fmi3Int32,
                _values: *mut $crate::fmi3::binding::fmi3Float64,
                _n_values: usize,
            );
            fmi3ActivateModelPartition(
                _clock_reference: $crate::fmi3::binding::fmi3ValueReference,
                _activation_time: $crate::fmi3::binding::fmi3Float64,
            );
        );
    };
}
