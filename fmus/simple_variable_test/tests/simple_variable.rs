//! Behavior of the scalar-variable test FMU through the instance API.

use std::path::PathBuf;

use fmu_export::fmi3::{Fmi3Res, LogMessageFn, Model, ModelInstance};
use simple_variable_test::{SimpleVariableTest, vr};

const BIN_INPUT: u32 = vr::BINARY_BASE;
const BIN_OUTPUT: u32 = vr::BINARY_BASE + 1;
const BIN_XOR_OUTPUT: u32 = vr::BINARY_BASE + 2;
const BIN_CONSTANT: u32 = vr::BINARY_BASE + 3;
const BIN_PARAMETER: u32 = vr::BINARY_BASE + 4;
const BIN_CALCULATED: u32 = vr::BINARY_BASE + 5;

fn discard() -> LogMessageFn {
    Box::new(|_status, _category, _message| {})
}

fn instance() -> ModelInstance<SimpleVariableTest> {
    ModelInstance::new(
        "scalar".to_string(),
        PathBuf::new(),
        false,
        false,
        false,
        false,
        discard(),
        SimpleVariableTest::INSTANTIATION_TOKEN,
    )
    .expect("instantiation should succeed")
}

fn get_binary(instance: &ModelInstance<SimpleVariableTest>, vr: u32) -> Vec<u8> {
    let mut value = Vec::new();
    instance
        .get_binary(&[vr], 1, |bytes| value = bytes.to_vec())
        .expect("get should succeed");
    value
}

#[test]
fn scalar_variables_default_to_zero() {
    let instance = instance();
    let mut value = [1.5];
    instance
        .get_float64(&[vr::FLOAT64], &mut value)
        .expect("get");
    assert_eq!(value[0], 0.0);

    let mut value = [42u16];
    instance
        .get_uint16(&[vr::UINT16], &mut value)
        .expect("get");
    assert_eq!(value[0], 0);

    let mut flag = [true];
    instance
        .get_boolean(&[vr::BOOLEAN], &mut flag)
        .expect("get");
    assert!(!flag[0]);

    instance
        .get_string(&[vr::STRING], 1, |value| {
            assert!(value.as_bytes().is_empty());
        })
        .expect("get");
}

#[test]
fn scalar_variables_round_trip() {
    let mut instance = instance();
    instance
        .set_int8(&[vr::INT8], &[-5])
        .expect("set should succeed");
    let mut value = [0i8];
    instance.get_int8(&[vr::INT8], &mut value).expect("get");
    assert_eq!(value[0], -5);
}

#[test]
fn each_type_owns_exactly_one_reference() {
    let mut instance = instance();
    // The neighbouring reference belongs to the next type and must be
    // rejected by this type's accessor.
    let mut value = [0u64];
    assert!(instance
        .get_uint64(&[vr::UINT64 + 1], &mut value)
        .is_err());
    assert!(instance.set_uint64(&[vr::UINT64 + 1], &[1]).is_err());
    instance.get_uint64(&[vr::UINT64], &mut value).expect("get");
}

#[test]
fn calculated_parameter_is_xor_of_parameter_and_constant() {
    let instance = instance();
    assert_eq!(get_binary(&instance, BIN_CONSTANT), vec![0xBE, 0xEF]);
    assert_eq!(get_binary(&instance, BIN_PARAMETER), vec![0x1D, 0xE4]);
    assert_eq!(get_binary(&instance, BIN_CALCULATED), vec![0xA3, 0x0B]);
}

#[test]
fn parameter_set_recomputes_the_cipher() {
    let mut instance = instance();
    instance
        .enter_initialization_mode(None, 0.0, None)
        .expect("enter");
    let payload: Vec<&[u8]> = vec![&[0xFF, 0x00, 0xFF]];
    instance
        .set_binary(&[BIN_PARAMETER], &payload)
        .expect("set");
    // Three parameter bytes against the cycled two-byte constant block.
    assert_eq!(
        get_binary(&instance, BIN_CALCULATED),
        vec![0xFF ^ 0xBE, 0x00 ^ 0xEF, 0xFF ^ 0xBE]
    );
}

#[test]
fn empty_constant_block_degrades_to_copy() {
    let mut instance = instance();
    instance
        .enter_initialization_mode(None, 0.0, None)
        .expect("enter");
    let empty: Vec<&[u8]> = vec![&[]];
    instance.set_binary(&[BIN_CONSTANT], &empty).expect("set");
    assert_eq!(get_binary(&instance, BIN_CALCULATED), vec![0x1D, 0xE4]);

    instance.set_binary(&[BIN_PARAMETER], &empty).expect("set");
    assert!(get_binary(&instance, BIN_CALCULATED).is_empty());
}

#[test]
fn step_copies_and_enciphers_the_input() {
    let mut instance = instance();
    instance
        .enter_initialization_mode(None, 0.0, None)
        .expect("enter");
    let payload: Vec<&[u8]> = vec![&[0x01, 0x02, 0x03]];
    instance.set_binary(&[BIN_INPUT], &payload).expect("set");
    instance.exit_initialization_mode().expect("exit");

    let step = instance.do_step(0.0, 0.125, false).expect("step");
    assert_eq!(step.last_successful_time, 0.125);
    assert!(!step.early_return);

    assert_eq!(get_binary(&instance, BIN_OUTPUT), vec![0x01, 0x02, 0x03]);
    assert_eq!(
        get_binary(&instance, BIN_XOR_OUTPUT),
        vec![0x01 ^ 0x1D, 0x02 ^ 0xE4, 0x03 ^ 0x1D]
    );
}

#[test]
fn binary_outputs_reject_set() {
    let mut instance = instance();
    let payload: Vec<&[u8]> = vec![&[0x01]];
    assert!(instance.set_binary(&[BIN_OUTPUT], &payload).is_err());
    assert!(instance.set_binary(&[BIN_XOR_OUTPUT], &payload).is_err());
}

#[test]
fn reset_restores_the_default_blocks() {
    let mut instance = instance();
    instance
        .enter_initialization_mode(None, 0.0, None)
        .expect("enter");
    let payload: Vec<&[u8]> = vec![&[0xAA, 0xBB, 0xCC, 0xDD]];
    instance
        .set_binary(&[BIN_PARAMETER], &payload)
        .expect("set");
    instance.set_float64(&[vr::FLOAT64], &[2.5]).expect("set");

    instance.reset().expect("reset");
    assert_eq!(get_binary(&instance, BIN_PARAMETER), vec![0x1D, 0xE4]);
    assert_eq!(get_binary(&instance, BIN_CALCULATED), vec![0xA3, 0x0B]);
    assert!(get_binary(&instance, BIN_INPUT).is_empty());
    let mut value = [9.9];
    instance
        .get_float64(&[vr::FLOAT64], &mut value)
        .expect("get");
    assert_eq!(value[0], 0.0);
}

#[test]
fn binary_size_prevalidation_spans_the_batch() {
    let mut instance = instance();
    // Two references, one buffer: rejected before any replacement happens.
    let payload: Vec<&[u8]> = vec![&[0x01]];
    assert!(instance
        .set_binary(&[BIN_INPUT, BIN_PARAMETER], &payload)
        .is_err());
    assert_eq!(get_binary(&instance, BIN_PARAMETER), vec![0x1D, 0xE4]);
    assert_eq!(instance.get_binary(&[], 0, |_| {}), Ok(Fmi3Res::OK));
}
