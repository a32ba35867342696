//! Raw FMI 3.0 C ABI surface.
//!
//! Hand-maintained mirror of the type and callback definitions in
//! `fmi3FunctionTypes.h` / `fmi3PlatformTypes.h`, using the same names the
//! header uses so that exported symbols and wrapper code read like the
//! standard. Only the pieces an exported Co-Simulation FMU needs are covered.

#![deny(clippy::all)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use std::os::raw::{c_char, c_int, c_void};

/// Version string returned by `fmi3GetVersion`, NUL-terminated.
pub const fmi3Version: &[u8; 4] = b"3.0\0";

pub type fmi3Instance = *mut c_void;
pub type fmi3InstanceEnvironment = *mut c_void;
pub type fmi3FMUState = *mut c_void;
pub type fmi3ValueReference = u32;

pub type fmi3Float32 = f32;
pub type fmi3Float64 = f64;
pub type fmi3Int8 = i8;
pub type fmi3UInt8 = u8;
pub type fmi3Int16 = i16;
pub type fmi3UInt16 = u16;
pub type fmi3Int32 = i32;
pub type fmi3UInt32 = u32;
pub type fmi3Int64 = i64;
pub type fmi3UInt64 = u64;
pub type fmi3Boolean = bool;
pub type fmi3Char = c_char;
pub type fmi3String = *const fmi3Char;
pub type fmi3Byte = u8;
pub type fmi3Binary = *const fmi3Byte;
pub type fmi3Clock = bool;

pub type fmi3Status = c_int;
pub const fmi3Status_fmi3OK: fmi3Status = 0;
pub const fmi3Status_fmi3Warning: fmi3Status = 1;
pub const fmi3Status_fmi3Discard: fmi3Status = 2;
pub const fmi3Status_fmi3Error: fmi3Status = 3;
pub const fmi3Status_fmi3Fatal: fmi3Status = 4;

pub type fmi3DependencyKind = c_int;
pub const fmi3DependencyKind_fmi3Independent: fmi3DependencyKind = 0;
pub const fmi3DependencyKind_fmi3Constant: fmi3DependencyKind = 1;
pub const fmi3DependencyKind_fmi3Fixed: fmi3DependencyKind = 2;
pub const fmi3DependencyKind_fmi3Tunable: fmi3DependencyKind = 3;
pub const fmi3DependencyKind_fmi3Discrete: fmi3DependencyKind = 4;
pub const fmi3DependencyKind_fmi3Dependent: fmi3DependencyKind = 5;

pub type fmi3IntervalQualifier = c_int;
pub const fmi3IntervalQualifier_fmi3IntervalNotYetKnown: fmi3IntervalQualifier = 0;
pub const fmi3IntervalQualifier_fmi3IntervalUnchanged: fmi3IntervalQualifier = 1;
pub const fmi3IntervalQualifier_fmi3IntervalChanged: fmi3IntervalQualifier = 2;

pub type fmi3LogMessageCallback = Option<
    unsafe extern "C" fn(
        instance_environment: fmi3InstanceEnvironment,
        status: fmi3Status,
        category: fmi3String,
        message: fmi3String,
    ),
>;

pub type fmi3IntermediateUpdateCallback = Option<
    unsafe extern "C" fn(
        instance_environment: fmi3InstanceEnvironment,
        intermediate_update_time: fmi3Float64,
        intermediate_variable_set_requested: fmi3Boolean,
        intermediate_variable_get_allowed: fmi3Boolean,
        intermediate_step_finished: fmi3Boolean,
        can_return_early: fmi3Boolean,
        early_return_requested: *mut fmi3Boolean,
        early_return_time: *mut fmi3Float64,
    ),
>;

pub type fmi3ClockUpdateCallback =
    Option<unsafe extern "C" fn(instance_environment: fmi3InstanceEnvironment)>;

pub type fmi3LockPreemptionCallback = Option<unsafe extern "C" fn()>;
pub type fmi3UnlockPreemptionCallback = Option<unsafe extern "C" fn()>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nul_terminated() {
        assert_eq!(fmi3Version.last(), Some(&0u8));
        assert_eq!(&fmi3Version[..3], b"3.0");
    }

    #[test]
    fn status_constants_match_header_order() {
        assert_eq!(fmi3Status_fmi3OK, 0);
        assert_eq!(fmi3Status_fmi3Fatal, 4);
    }
}
