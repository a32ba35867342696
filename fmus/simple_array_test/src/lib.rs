//! `SimpleArrayTest`: a reference test FMU in which every variable of every
//! FMI type is a fixed 2×3 array.
//!
//! Each type declares the same five-variable role family (input, output,
//! constant, parameter, calculated parameter); Float64 additionally carries
//! the independent time variable, and Binary adds a cyclic-XOR output. The
//! step computation is deliberately trivial, output = parameter * input, with
//! XOR and concatenation standing in for the non-numeric types, so that hosts
//! can exercise array-valued data exchange end to end.

use std::ffi::CString;

use fmu_export::fmi3::{
    Fmi3Error, Fmi3Res, Model, ModelContext, ModelLoggingCategory, Role, UserModel, VarPool,
    VarSlot,
};

pub const ROWS: usize = 2;
pub const COLS: usize = 3;

/// Value-reference layout: one contiguous range per type, each base formed by
/// summing the slot counts of the preceding types.
pub mod vr {
    pub const BOOLEAN_BASE: u32 = 0;
    pub const BOOLEAN_COUNT: u32 = 5;
    pub const UINT64_BASE: u32 = BOOLEAN_BASE + BOOLEAN_COUNT;
    pub const UINT64_COUNT: u32 = 5;
    pub const INT64_BASE: u32 = UINT64_BASE + UINT64_COUNT;
    pub const INT64_COUNT: u32 = 5;
    pub const UINT32_BASE: u32 = INT64_BASE + INT64_COUNT;
    pub const UINT32_COUNT: u32 = 5;
    pub const INT32_BASE: u32 = UINT32_BASE + UINT32_COUNT;
    pub const INT32_COUNT: u32 = 5;
    pub const UINT16_BASE: u32 = INT32_BASE + INT32_COUNT;
    pub const UINT16_COUNT: u32 = 5;
    pub const INT16_BASE: u32 = UINT16_BASE + UINT16_COUNT;
    pub const INT16_COUNT: u32 = 5;
    pub const UINT8_BASE: u32 = INT16_BASE + INT16_COUNT;
    pub const UINT8_COUNT: u32 = 5;
    pub const INT8_BASE: u32 = UINT8_BASE + UINT8_COUNT;
    pub const INT8_COUNT: u32 = 5;
    pub const FLOAT64_BASE: u32 = INT8_BASE + INT8_COUNT;
    pub const FLOAT64_COUNT: u32 = 6;
    pub const FLOAT32_BASE: u32 = FLOAT64_BASE + FLOAT64_COUNT;
    pub const FLOAT32_COUNT: u32 = 5;
    pub const STRING_BASE: u32 = FLOAT32_BASE + FLOAT32_COUNT;
    pub const STRING_COUNT: u32 = 5;
    pub const BINARY_BASE: u32 = STRING_BASE + STRING_COUNT;
    pub const BINARY_COUNT: u32 = 6;
}

/// Slot order of the five-variable role family.
pub mod role {
    pub const INPUT: usize = 0;
    pub const OUTPUT: usize = 1;
    pub const CONSTANT: usize = 2;
    pub const PARAMETER: usize = 3;
    pub const CALCULATED_PARAMETER: usize = 4;
}

/// Float64 slots: the independent time variable leads the role family.
pub mod f64_slot {
    pub const TIME: usize = 0;
    pub const INPUT: usize = 1;
    pub const OUTPUT: usize = 2;
    pub const CONSTANT: usize = 3;
    pub const PARAMETER: usize = 4;
    pub const CALCULATED_PARAMETER: usize = 5;
}

/// Binary slots: a cyclic-XOR output sits between output and constant.
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

pub struct SimpleArrayTest {
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

fn role_family<T: Clone + Default>(base: u32) -> VarPool<T> {
    VarPool::new(
        base,
        vec![
            VarSlot::fixed(Role::Input, ROWS, COLS, T::default()),
            VarSlot::fixed(Role::Output, ROWS, COLS, T::default()),
            VarSlot::fixed(Role::Constant, ROWS, COLS, T::default()),
            VarSlot::fixed(Role::Parameter, ROWS, COLS, T::default()),
            VarSlot::fixed(Role::CalculatedParameter, ROWS, COLS, T::default()),
        ],
    )
}

impl Default for SimpleArrayTest {
    fn default() -> Self {
        Self {
            booleans: role_family(vr::BOOLEAN_BASE),
            uint64s: role_family(vr::UINT64_BASE),
            int64s: role_family(vr::INT64_BASE),
            uint32s: role_family(vr::UINT32_BASE),
            int32s: role_family(vr::INT32_BASE),
            uint16s: role_family(vr::UINT16_BASE),
            int16s: role_family(vr::INT16_BASE),
            uint8s: role_family(vr::UINT8_BASE),
            int8s: role_family(vr::INT8_BASE),
            float64s: VarPool::new(
                vr::FLOAT64_BASE,
                vec![
                    VarSlot::scalar(Role::Time, 0.0),
                    VarSlot::fixed(Role::Input, ROWS, COLS, 0.0),
                    VarSlot::fixed(Role::Output, ROWS, COLS, 0.0),
                    VarSlot::fixed(Role::Constant, ROWS, COLS, 0.0),
                    VarSlot::fixed(Role::Parameter, ROWS, COLS, 0.0),
                    VarSlot::fixed(Role::CalculatedParameter, ROWS, COLS, 0.0),
                ],
            ),
            float32s: role_family(vr::FLOAT32_BASE),
            strings: role_family(vr::STRING_BASE),
            binaries: VarPool::new(
                vr::BINARY_BASE,
                vec![
                    VarSlot::fixed(Role::Input, ROWS, COLS, Vec::new()),
                    VarSlot::fixed(Role::Output, ROWS, COLS, Vec::new()),
                    VarSlot::fixed(Role::Output, ROWS, COLS, Vec::new()),
                    VarSlot::fixed(Role::Constant, ROWS, COLS, Vec::new()),
                    VarSlot::fixed(Role::Parameter, ROWS, COLS, Vec::new()),
                    VarSlot::fixed(Role::CalculatedParameter, ROWS, COLS, Vec::new()),
                ],
            ),
        }
    }
}

/// `a ++ b`, byte for byte.
fn concat(a: &CString, b: &CString) -> CString {
    let mut bytes = Vec::with_capacity(a.as_bytes().len() + b.as_bytes().len());
    bytes.extend_from_slice(a.as_bytes());
    bytes.extend_from_slice(b.as_bytes());
    CString::new(bytes).unwrap_or_default()
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

impl UserModel for SimpleArrayTest {
    type LoggingCategory = LogCategory;

    fn update_calculated_parameters(
        &mut self,
        _context: &ModelContext<Self>,
    ) -> Result<Fmi3Res, Fmi3Error> {
        macro_rules! calculated {
            ($pool:expr) => {
                $pool.apply_binop(
                    role::CALCULATED_PARAMETER,
                    role::PARAMETER,
                    role::CONSTANT,
                    |p, c| p.wrapping_mul(*c),
                )
            };
        }
        calculated!(self.uint64s);
        calculated!(self.int64s);
        calculated!(self.uint32s);
        calculated!(self.int32s);
        calculated!(self.uint16s);
        calculated!(self.int16s);
        calculated!(self.uint8s);
        calculated!(self.int8s);
        self.float64s.apply_binop(
            f64_slot::CALCULATED_PARAMETER,
            f64_slot::PARAMETER,
            f64_slot::CONSTANT,
            |p, c| p * c,
        );
        self.float32s.apply_binop(
            role::CALCULATED_PARAMETER,
            role::PARAMETER,
            role::CONSTANT,
            |p, c| p * c,
        );
        self.booleans.apply_binop(
            role::CALCULATED_PARAMETER,
            role::PARAMETER,
            role::CONSTANT,
            |p, c| p ^ c,
        );
        self.strings.apply_binop(
            role::CALCULATED_PARAMETER,
            role::PARAMETER,
            role::CONSTANT,
            concat,
        );
        self.binaries.apply_binop(
            bin_slot::CALCULATED_PARAMETER,
            bin_slot::PARAMETER,
            bin_slot::CONSTANT,
            |p, c| xor_block(p, c),
        );
        Ok(Fmi3Res::OK)
    }

    fn compute_outputs(&mut self, _context: &ModelContext<Self>) -> Result<Fmi3Res, Fmi3Error> {
        macro_rules! output {
            ($pool:expr) => {
                $pool.apply_binop(role::OUTPUT, role::PARAMETER, role::INPUT, |p, i| {
                    p.wrapping_mul(*i)
                })
            };
        }
        output!(self.uint64s);
        output!(self.int64s);
        output!(self.uint32s);
        output!(self.int32s);
        output!(self.uint16s);
        output!(self.int16s);
        output!(self.uint8s);
        output!(self.int8s);
        self.float64s.apply_binop(
            f64_slot::OUTPUT,
            f64_slot::PARAMETER,
            f64_slot::INPUT,
            |p, i| p * i,
        );
        self.float32s
            .apply_binop(role::OUTPUT, role::PARAMETER, role::INPUT, |p, i| p * i);
        self.booleans
            .apply_binop(role::OUTPUT, role::PARAMETER, role::INPUT, |p, i| p ^ i);
        self.strings
            .apply_binop(role::OUTPUT, role::INPUT, role::PARAMETER, concat);
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

impl Model for SimpleArrayTest {
    const MODEL_NAME: &'static str = "SimpleArrayTest";
    const INSTANTIATION_TOKEN: &'static str = "{2a1da14f-7f7e-46e2-b15d-04a9f2032d4f}";

    fn set_start_values(&mut self) {
        macro_rules! numeric_defaults {
            ($pool:expr, $ty:ty) => {{
                $pool.fill(role::INPUT, 1 as $ty);
                $pool.fill(role::OUTPUT, 4 as $ty);
                $pool.fill(role::CONSTANT, 5 as $ty);
                $pool.fill(role::PARAMETER, 4 as $ty);
                $pool.fill(role::CALCULATED_PARAMETER, 20 as $ty);
            }};
        }
        numeric_defaults!(self.uint64s, u64);
        numeric_defaults!(self.int64s, i64);
        numeric_defaults!(self.uint32s, u32);
        numeric_defaults!(self.int32s, i32);
        numeric_defaults!(self.uint16s, u16);
        numeric_defaults!(self.int16s, i16);
        numeric_defaults!(self.uint8s, u8);
        numeric_defaults!(self.int8s, i8);
        numeric_defaults!(self.float32s, f32);

        self.booleans.fill(role::INPUT, true);
        self.booleans.fill(role::OUTPUT, false);
        self.booleans.fill(role::CONSTANT, true);
        self.booleans.fill(role::PARAMETER, true);
        self.booleans.fill(role::CALCULATED_PARAMETER, false);

        self.float64s.fill(f64_slot::TIME, 0.0);
        self.float64s.fill(f64_slot::INPUT, 1.0);
        self.float64s.fill(f64_slot::OUTPUT, 4.0);
        self.float64s.fill(f64_slot::CONSTANT, 5.0);
        self.float64s.fill(f64_slot::PARAMETER, 4.0);
        self.float64s.fill(f64_slot::CALCULATED_PARAMETER, 20.0);

        self.strings.fill(role::INPUT, c"abcd".to_owned());
        self.strings.fill(role::OUTPUT, c"abcdefgh".to_owned());
        self.strings.fill(role::CONSTANT, c"ijkl".to_owned());
        self.strings.fill(role::PARAMETER, c"efgh".to_owned());
        self.strings
            .fill(role::CALCULATED_PARAMETER, c"efghijkl".to_owned());

        self.binaries.fill(bin_slot::INPUT, Vec::new());
        self.binaries.fill(bin_slot::OUTPUT, Vec::new());
        self.binaries.fill(bin_slot::XOR_OUTPUT, Vec::new());
        self.binaries.fill(bin_slot::CONSTANT, vec![0xBE, 0xEF]);
        self.binaries.fill(bin_slot::PARAMETER, vec![0x1D, 0xE4]);
        self.binaries
            .fill(bin_slot::CALCULATED_PARAMETER, vec![0xA3, 0x0B]);
    }
}

fmu_export::impl_var_access!(SimpleArrayTest {
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

fmu_export::export_fmu!(co_simulation: SimpleArrayTest);
