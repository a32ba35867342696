//! `SimpleVariableTest`: a reference test FMU with one plain scalar variable
//! per FMI type, plus a six-variable binary family.
//!
//! The scalar variables are bare read/write storage; all of the model's
//! actual computation happens on the binary side, where the calculated
//! parameter and the outputs are derived by cyclic byte-XOR. This variant
//! targets the draft Basic Co-Simulation entry points
//! (`fmi3InstantiateBasicCoSimulation` and the single-out-parameter
//! `fmi3DoStep`).

use std::ffi::CString;

use fmu_export::fmi3::{
    Fmi3Error, Fmi3Res, Model, ModelContext, ModelLoggingCategory, Role, UserModel, VarPool,
    VarSlot,
};

/// Value-reference layout: one variable per type, bases formed by summing the
/// preceding slot counts, then the six binary variables.
pub mod vr {
    pub const BOOLEAN: u32 = 0;
    pub const UINT64: u32 = BOOLEAN + 1;
    pub const INT64: u32 = UINT64 + 1;
    pub const UINT32: u32 = INT64 + 1;
    pub const INT32: u32 = UINT32 + 1;
    pub const UINT16: u32 = INT32 + 1;
    pub const INT16: u32 = UINT16 + 1;
    pub const UINT8: u32 = INT16 + 1;
    pub const INT8: u32 = UINT8 + 1;
    pub const FLOAT64: u32 = INT8 + 1;
    pub const FLOAT32: u32 = FLOAT64 + 1;
    pub const STRING: u32 = FLOAT32 + 1;
    pub const BINARY_BASE: u32 = STRING + 1;
    pub const BINARY_COUNT: u32 = 6;
}

/// Binary slot order.
pub mod bin_slot {
    pub const INPUT: usize = 0;
    pub const OUTPUT: usize = 1;
    pub const XOR_OUTPUT: usize = 2;
    pub const CONSTANT: usize = 3;
    pub const PARAMETER: usize = 4;
    pub const CALCULATED_PARAMETER: usize = 5;
}

/// Logging categories exposed through `fmi3SetDebugLogging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogCategory {
    /// Tracing of FMI API calls.
    #[default]
    Fmi,
    /// Binary payload handling.
    Binary,
    /// Rejected calls and other diagnostics.
    Error,
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fmi => write!(f, "FMI"),
            Self::Binary => write!(f, "BINARY"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FMI" => Ok(Self::Fmi),
            "BINARY" => Ok(Self::Binary),
            "ERROR" => Ok(Self::Error),
            _ => Err(format!("Unknown logging category: {s}")),
        }
    }
}

impl ModelLoggingCategory for LogCategory {
    fn all_categories() -> impl Iterator<Item = Self> {
        [Self::Fmi, Self::Binary, Self::Error].iter().copied()
    }
    fn trace_category() -> Self {
        Self::Fmi
    }
    fn error_category() -> Self {
        Self::Error
    }
}

pub struct SimpleVariableTest {
    booleans: VarPool<bool>,
    uint64s: VarPool<u64>,
    int64s: VarPool<i64>,
    uint32s: VarPool<u32>,
    int32s: VarPool<i32>,
    uint16s: VarPool<u16>,
    int16s: VarPool<i16>,
    uint8s: VarPool<u8>,
    int8s: VarPool<i8>,
    float64s: VarPool<f64>,
    float32s: VarPool<f32>,
    strings: VarPool<CString>,
    binaries: VarPool<Vec<u8>>,
}

fn single<T: Clone + Default>(base: u32) -> VarPool<T> {
    VarPool::new(base, vec![VarSlot::scalar(Role::Input, T::default())])
}

impl Default for SimpleVariableTest {
    fn default() -> Self {
        Self {
            booleans: single(vr::BOOLEAN),
            uint64s: single(vr::UINT64),
            int64s: single(vr::INT64),
            uint32s: single(vr::UINT32),
            int32s: single(vr::INT32),
            uint16s: single(vr::UINT16),
            int16s: single(vr::INT16),
            uint8s: single(vr::UINT8),
            int8s: single(vr::INT8),
            float64s: single(vr::FLOAT64),
            float32s: single(vr::FLOAT32),
            strings: single(vr::STRING),
            binaries: VarPool::new(
                vr::BINARY_BASE,
                vec![
                    VarSlot::scalar(Role::Input, Vec::new()),
                    VarSlot::scalar(Role::Output, Vec::new()),
                    VarSlot::scalar(Role::Output, Vec::new()),
                    VarSlot::scalar(Role::Constant, Vec::new()),
                    VarSlot::scalar(Role::Parameter, Vec::new()),
                    VarSlot::scalar(Role::CalculatedParameter, Vec::new()),
                ],
            ),
        }
    }
}

/// XOR `input` against `block`, cycling the block. An empty block degrades to
/// a plain copy.
fn xor_block(input: &[u8], block: &[u8]) -> Vec<u8> {
    if block.is_empty() {
        return input.to_vec();
    }
    input
        .iter()
        .zip(block.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect()
}

impl UserModel for SimpleVariableTest {
    type LoggingCategory = LogCategory;

    /// The calculated binary parameter is the parameter block enciphered with
    /// the constant block.
    fn update_calculated_parameters(
        &mut self,
        context: &ModelContext<Self>,
    ) -> Result<Fmi3Res, Fmi3Error> {
        self.binaries.apply_binop(
            bin_slot::CALCULATED_PARAMETER,
            bin_slot::PARAMETER,
            bin_slot::CONSTANT,
            |p, c| xor_block(p, c),
        );
        context.log(
            Fmi3Res::OK,
            LogCategory::Binary,
            &format!(
                "recomputed calculated parameter ({} bytes)",
                self.binaries.elements(bin_slot::CALCULATED_PARAMETER)[0].len()
            ),
        );
        Ok(Fmi3Res::OK)
    }

    fn compute_outputs(&mut self, _context: &ModelContext<Self>) -> Result<Fmi3Res, Fmi3Error> {
        self.binaries
            .apply_unop(bin_slot::OUTPUT, bin_slot::INPUT, |input| input.clone());
        self.binaries.apply_binop(
            bin_slot::XOR_OUTPUT,
            bin_slot::INPUT,
            bin_slot::PARAMETER,
            |i, p| xor_block(i, p),
        );
        Ok(Fmi3Res::OK)
    }
}

impl Model for SimpleVariableTest {
    const MODEL_NAME: &'static str = "SimpleVariableTest";
    const INSTANTIATION_TOKEN: &'static str = "{4f7b01b1-7f35-4c55-ae10-7a2b1f05fa4d}";

    fn set_start_values(&mut self) {
        self.booleans.set_scalar(0, false);
        self.uint64s.set_scalar(0, 0);
        self.int64s.set_scalar(0, 0);
        self.uint32s.set_scalar(0, 0);
        self.int32s.set_scalar(0, 0);
        self.uint16s.set_scalar(0, 0);
        self.int16s.set_scalar(0, 0);
        self.uint8s.set_scalar(0, 0);
        self.int8s.set_scalar(0, 0);
        self.float64s.set_scalar(0, 0.0);
        self.float32s.set_scalar(0, 0.0);
        self.strings.set_scalar(0, CString::default());

        self.binaries.set_scalar(bin_slot::INPUT, Vec::new());
        self.binaries.set_scalar(bin_slot::OUTPUT, Vec::new());
        self.binaries.set_scalar(bin_slot::XOR_OUTPUT, Vec::new());
        self.binaries
            .set_scalar(bin_slot::CONSTANT, vec![0xBE, 0xEF]);
        self.binaries
            .set_scalar(bin_slot::PARAMETER, vec![0x1D, 0xE4]);
        self.binaries
            .set_scalar(bin_slot::CALCULATED_PARAMETER, vec![0xA3, 0x0B]);
    }
}

fmu_export::impl_var_access!(SimpleVariableTest {
    booleans,
    uint64s,
    int64s,
    uint32s,
    int32s,
    uint16s,
    int16s,
    uint8s,
    int8s,
    float64s,
    float32s,
    strings,
    binaries,
});

fmu_export::export_fmu!(basic_co_simulation: SimpleVariableTest);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_block_matches_default_calculated_parameter() {
        // 1D^BE = A3, E4^EF = 0B: the declared start value of the calculated
        // parameter is exactly the recomputation of the other two defaults.
        assert_eq!(xor_block(&[0x1D, 0xE4], &[0xBE, 0xEF]), vec![0xA3, 0x0B]);
    }

    #[test]
    fn vr_layout_is_dense() {
        assert_eq!(vr::BOOLEAN, 0);
        assert_eq!(vr::FLOAT64, 9);
        assert_eq!(vr::STRING, 11);
        assert_eq!(vr::BINARY_BASE, 12);
        assert_eq!(vr::BINARY_BASE + vr::BINARY_COUNT, 18);
    }
}
