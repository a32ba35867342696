//! Round-trip through the exported `extern "C"` surface, the way a host
//! simulator drives the shared library.

use std::ffi::{CStr, CString};
use std::os::raw::c_void;

use fmu_export::fmi3::{Model, binding};
use simple_array_test::{SimpleArrayTest, vr};

const F64_INPUT: u32 = vr::FLOAT64_BASE + 1;
const F64_OUTPUT: u32 = vr::FLOAT64_BASE + 2;
const F64_PARAMETER: u32 = vr::FLOAT64_BASE + 4;
const F64_CALCULATED: u32 = vr::FLOAT64_BASE + 5;

unsafe extern "C" fn log_message(
    _instance_environment: binding::fmi3InstanceEnvironment,
    _status: binding::fmi3Status,
    _category: binding::fmi3String,
    _message: binding::fmi3String,
) {
}

unsafe fn instantiate(token: &CStr) -> binding::fmi3Instance {
    let name = CString::new("abi").expect("name");
    let path = CString::new("file:///tmp/resources").expect("path");
    unsafe {
        simple_array_test::fmi3_instantiate_co_simulation(
            name.as_ptr(),
            token.as_ptr(),
            path.as_ptr(),
            false,
            true,
            false,
            false,
            std::ptr::null(),
            0,
            std::ptr::null_mut::<c_void>(),
            Some(log_message),
            None,
        )
    }
}

#[test]
fn version_string_is_fmi3() {
    let version = unsafe { CStr::from_ptr(simple_array_test::fmi3_get_version()) };
    assert_eq!(version.to_str().expect("utf8"), "3.0");
}

#[test]
fn token_mismatch_returns_a_null_handle() {
    let token = CString::new("{00000000-0000-0000-0000-000000000000}").expect("token");
    let handle = unsafe { instantiate(&token) };
    assert!(handle.is_null());
}

#[test]
fn host_round_trip() {
    let token = CString::new(SimpleArrayTest::INSTANTIATION_TOKEN).expect("token");
    let handle = unsafe { instantiate(&token) };
    assert!(!handle.is_null());

    unsafe {
        let status = simple_array_test::fmi3_enter_initialization_mode(
            handle, false, 0.0, 0.0, false, 0.0,
        );
        assert_eq!(status, binding::fmi3Status_fmi3OK);

        // Tune the parameter and observe the calculated parameter.
        let vrs = [F64_PARAMETER];
        let values = [2.0f64; 6];
        let status =
            simple_array_test::fmi3_set_float64(handle, vrs.as_ptr(), 1, values.as_ptr(), 6);
        assert_eq!(status, binding::fmi3Status_fmi3OK);

        let vrs = [F64_CALCULATED];
        let mut out = [0.0f64; 6];
        let status =
            simple_array_test::fmi3_get_float64(handle, vrs.as_ptr(), 1, out.as_mut_ptr(), 6);
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        assert_eq!(out, [10.0; 6]);

        let status = simple_array_test::fmi3_exit_initialization_mode(handle);
        assert_eq!(status, binding::fmi3Status_fmi3OK);

        let mut event_handling_needed = true;
        let mut terminate_simulation = true;
        let mut early_return = true;
        let mut last_successful_time = 0.0f64;
        let status = simple_array_test::fmi3_do_step(
            handle,
            0.0,
            0.5,
            false,
            &mut event_handling_needed,
            &mut terminate_simulation,
            &mut early_return,
            &mut last_successful_time,
        );
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        assert!(!event_handling_needed);
        assert!(!terminate_simulation);
        assert!(!early_return);
        assert_eq!(last_successful_time, 0.5);

        // Output = parameter * input = 2 * 1.
        let vrs = [F64_OUTPUT];
        let status =
            simple_array_test::fmi3_get_float64(handle, vrs.as_ptr(), 1, out.as_mut_ptr(), 6);
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        assert_eq!(out, [2.0; 6]);

        // Mismatched buffer sizes are rejected wholesale.
        let status =
            simple_array_test::fmi3_get_float64(handle, vrs.as_ptr(), 1, out.as_mut_ptr(), 5);
        assert_eq!(status, binding::fmi3Status_fmi3Error);

        // Strings come back as pointers into instance-owned storage.
        let vrs = [vr::STRING_BASE + 1];
        let mut strings = [std::ptr::null(); 6];
        let status = simple_array_test::fmi3_get_string(
            handle,
            vrs.as_ptr(),
            1,
            strings.as_mut_ptr(),
            6,
        );
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        for ptr in strings {
            assert_eq!(CStr::from_ptr(ptr).to_bytes(), b"abcdefgh");
        }

        // Binary payloads report per-element sizes.
        let vrs = [vr::BINARY_BASE + 3];
        let mut sizes = [0usize; 6];
        let mut blocks = [std::ptr::null(); 6];
        let status = simple_array_test::fmi3_get_binary(
            handle,
            vrs.as_ptr(),
            1,
            sizes.as_mut_ptr(),
            blocks.as_mut_ptr(),
            6,
        );
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        for (size, block) in sizes.iter().zip(blocks) {
            assert_eq!(*size, 2);
            assert_eq!(std::slice::from_raw_parts(block, *size), &[0xBE, 0xEF]);
        }

        // The unsupported surface errors without disturbing the instance.
        let status = simple_array_test::fmi3_enter_event_mode(handle);
        assert_eq!(status, binding::fmi3Status_fmi3Error);

        // Reset returns the instance to its start values.
        let status = simple_array_test::fmi3_reset(handle);
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        let vrs = [F64_INPUT];
        let status =
            simple_array_test::fmi3_get_float64(handle, vrs.as_ptr(), 1, out.as_mut_ptr(), 6);
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        assert_eq!(out, [1.0; 6]);

        simple_array_test::fmi3_free_instance(handle);
    }
}

#[test]
fn null_handles_are_rejected() {
    let vrs = [F64_INPUT];
    let mut out = [0.0f64; 6];
    let status = unsafe {
        simple_array_test::fmi3_get_float64(
            std::ptr::null_mut(),
            vrs.as_ptr(),
            1,
            out.as_mut_ptr(),
            6,
        )
    };
    assert_eq!(status, binding::fmi3Status_fmi3Error);
    unsafe { simple_array_test::fmi3_free_instance(std::ptr::null_mut()) };
}
