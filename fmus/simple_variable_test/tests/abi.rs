//! Smoke test of the draft Basic Co-Simulation `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_void;

use fmu_export::fmi3::{Model, binding};
use simple_variable_test::{SimpleVariableTest, vr};

unsafe extern "C" fn log_message(
    _instance_environment: binding::fmi3InstanceEnvironment,
    _status: binding::fmi3Status,
    _category: binding::fmi3String,
    _message: binding::fmi3String,
) {
}

#[test]
fn basic_co_simulation_round_trip() {
    let name = CString::new("abi").expect("name");
    let token = CString::new(SimpleVariableTest::INSTANTIATION_TOKEN).expect("token");
    let path = CString::new("file:///tmp/resources").expect("path");

    unsafe {
        let handle = simple_variable_test::fmi3_instantiate_basic_co_simulation(
            name.as_ptr(),
            token.as_ptr(),
            path.as_ptr(),
            false,
            true,
            false,
            false,
            false,
            std::ptr::null_mut::<c_void>(),
            Some(log_message),
            None,
        );
        assert!(!handle.is_null());

        let status = simple_variable_test::fmi3_enter_initialization_mode(
            handle, false, 0.0, 0.0, false, 0.0,
        );
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        let status = simple_variable_test::fmi3_exit_initialization_mode(handle);
        assert_eq!(status, binding::fmi3Status_fmi3OK);

        let vrs = [vr::FLOAT64];
        let values = [3.5f64];
        let status =
            simple_variable_test::fmi3_set_float64(handle, vrs.as_ptr(), 1, values.as_ptr(), 1);
        assert_eq!(status, binding::fmi3Status_fmi3OK);

        // The draft DoStep only reports early return.
        let mut early_return = true;
        let status = simple_variable_test::fmi3_do_step(handle, 0.0, 1.0, false, &mut early_return);
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        assert!(!early_return);

        let mut out = [0.0f64];
        let status =
            simple_variable_test::fmi3_get_float64(handle, vrs.as_ptr(), 1, out.as_mut_ptr(), 1);
        assert_eq!(status, binding::fmi3Status_fmi3OK);
        assert_eq!(out[0], 3.5);

        simple_variable_test::fmi3_free_instance(handle);
    }
}
