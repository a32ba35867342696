use std::{ffi::CString, fmt::Display, str::FromStr};

use crate::fmi3::{Fmi3Error, Fmi3Res, VarPool, instance::ModelContext};

/// Logging category enum of a model.
///
/// Categories cross the ABI as strings; `Display`/`FromStr` define the names
/// the host sees and may pass to `fmi3SetDebugLogging`.
pub trait ModelLoggingCategory: Display + FromStr + PartialEq + Copy + Default {
    /// All categories the model declares, in declaration order.
    fn all_categories() -> impl Iterator<Item = Self>;
    /// Category used for tracing FMI API calls.
    fn trace_category() -> Self;
    /// Category used for rejection diagnostics.
    fn error_category() -> Self;
}

/// Hand-implemented model behavior.
pub trait UserModel: Sized {
    type LoggingCategory: ModelLoggingCategory + 'static;

    /// Recompute calculated parameters from the current parameter and
    /// constant values. Called on entering initialization mode, after any Set
    /// during initialization mode, and after any Set touching a
    /// parameter-role variable.
    fn update_calculated_parameters(
        &mut self,
        _context: &ModelContext<Self>,
    ) -> Result<Fmi3Res, Fmi3Error> {
        Ok(Fmi3Res::OK)
    }

    /// Recompute every output from the corresponding input and parameter.
    /// Called once per communication step.
    fn compute_outputs(&mut self, _context: &ModelContext<Self>) -> Result<Fmi3Res, Fmi3Error> {
        Ok(Fmi3Res::OK)
    }

    /// Re-read structural size parameters and resize dynamic storage.
    /// Called when the host exits configuration mode.
    fn reconfigure(&mut self, _context: &ModelContext<Self>) -> Result<Fmi3Res, Fmi3Error> {
        Ok(Fmi3Res::OK)
    }
}

macro_rules! pool_accessors {
    ($($accessor:ident: $ty:ty),* $(,)?) => {
        paste::paste! { $(
            fn $accessor(&self) -> Option<&VarPool<$ty>> {
                None
            }
            fn [<$accessor _mut>](&mut self) -> Option<&mut VarPool<$ty>> {
                None
            }
        )* }
    };
}

/// Access to a model's variable pools, one per FMI type.
///
/// The default for every accessor is `None`, which makes every value
/// reference of that type out of range, as a variant with no variables of
/// the type needs. Implement through
/// [`impl_var_access!`](crate::impl_var_access).
pub trait VarAccess {
    pool_accessors! {
        booleans: bool,
        uint64s: u64,
        int64s: i64,
        uint32s: u32,
        int32s: i32,
        uint16s: u16,
        int16s: i16,
        uint8s: u8,
        int8s: i8,
        float64s: f64,
        float32s: f32,
        strings: CString,
        binaries: Vec<u8>,
    }
}

/// An exportable FMU model.
pub trait Model: Default + UserModel + VarAccess {
    const MODEL_NAME: &'static str;
    const INSTANTIATION_TOKEN: &'static str;
    /// Models with structural parameters opt into configuration mode.
    const RECONFIGURABLE: bool = false;

    /// Populate every variable with its declared start value.
    fn set_start_values(&mut self);
}

/// Implements [`VarAccess`] by mapping each listed accessor to a struct field
/// of the same name.
#[macro_export]
macro_rules! impl_var_access {
    ($ty:ty { $($accessor:ident),* $(,)? }) => {
        impl $crate::fmi3::VarAccess for $ty {
            $( $crate::impl_var_access!(@field $accessor); )*
        }
    };
    (@field booleans) => { $crate::impl_var_access!(@pool booleans, booleans_mut, bool); };
    (@field uint64s) => { $crate::impl_var_access!(@pool uint64s, uint64s_mut, u64); };
    (@field int64s) => { $crate::impl_var_access!(@pool int64s, int64s_mut, i64); };
    (@field uint32s) => { $crate::impl_var_access!(@pool uint32s, uint32s_mut, u32); };
    (@field int32s) => { $crate::impl_var_access!(@pool int32s, int32s_mut, i32); };
    (@field uint16s) => { $crate::impl_var_access!(@pool uint16s, uint16s_mut, u16); };
    (@field int16s) => { $crate::impl_var_access!(@pool int16s, int16s_mut, i16); };
    (@field uint8s) => { $crate::impl_var_access!(@pool uint8s, uint8s_mut, u8); };
    (@field int8s) => { $crate::impl_var_access!(@pool int8s, int8s_mut, i8); };
    (@field float64s) => { $crate::impl_var_access!(@pool float64s, float64s_mut, f64); };
    (@field float32s) => { $crate::impl_var_access!(@pool float32s, float32s_mut, f32); };
    (@field strings) => {
        $crate::impl_var_access!(@pool strings, strings_mut, ::std::ffi::CString);
    };
    (@field binaries) => {
        $crate::impl_var_access!(@pool binaries, binaries_mut, ::std::vec::Vec<u8>);
    };
    (@pool $get:ident, $get_mut:ident, $ty:ty) => {
        fn $get(&self) -> Option<&$crate::fmi3::VarPool<$ty>> {
            Some(&self.$get)
        }
        fn $get_mut(&mut self) -> Option<&mut $crate::fmi3::VarPool<$ty>> {
            Some(&mut self.$get)
        }
    };
}
