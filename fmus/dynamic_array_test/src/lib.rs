//! `DynamicArrayTest`: a reference test FMU whose Float64 parameter, input
//! and output arrays are sized at runtime by two structural parameters.
//!
//! The structural sizes are only writable inside configuration mode; leaving
//! configuration mode resizes all three arrays to `x · y` elements. Surviving
//! prefix elements keep their values and any growth is zero-filled. The step
//! computation multiplies input and parameter elementwise.

use fmu_export::fmi3::{
    Fmi3Error, Fmi3Res, Model, ModelContext, ModelLoggingCategory, Role, UserModel, VarPool,
    VarSlot,
};

/// Default dimensions after instantiation and reset.
pub const DEFAULT_X_SIZE: u64 = 4;
pub const DEFAULT_Y_SIZE: u64 = 3;

/// Value-reference layout: the UInt64 structural sizes first, then the
/// Float64 range (time, parameter, input, output).
pub mod vr {
    pub const X_SIZE: u32 = 0;
    pub const Y_SIZE: u32 = 1;
    pub const TIME: u32 = 2;
    pub const PARAMETER: u32 = 3;
    pub const INPUT: u32 = 4;
    pub const OUTPUT: u32 = 5;
}

mod u64_slot {
    pub const X_SIZE: usize = 0;
    pub const Y_SIZE: usize = 1;
}

mod f64_slot {
    pub const PARAMETER: usize = 1;
    pub const INPUT: usize = 2;
    pub const OUTPUT: usize = 3;
}

/// Logging categories exposed through `fmi3SetDebugLogging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogCategory {
    /// Tracing of FMI API calls.
    #[default]
    Fmi,
    /// Rejected calls and other diagnostics.
    Error,
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fmi => write!(f, "FMI"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FMI" => Ok(Self::Fmi),
            "ERROR" => Ok(Self::Error),
            _ => Err(format!("Unknown logging category: {s}")),
        }
    }
}

impl ModelLoggingCategory for LogCategory {
    fn all_categories() -> impl Iterator<Item = Self> {
        [Self::Fmi, Self::Error].iter().copied()
    }
    fn trace_category() -> Self {
        Self::Fmi
    }
    fn error_category() -> Self {
        Self::Error
    }
}

pub struct DynamicArrayTest {
    uint64s: VarPool<u64>,
    float64s: VarPool<f64>,
}

impl Default for DynamicArrayTest {
    fn default() -> Self {
        Self {
            uint64s: VarPool::new(
                vr::X_SIZE,
                vec![
                    VarSlot::scalar(Role::Structural, 0),
                    VarSlot::scalar(Role::Structural, 0),
                ],
            ),
            float64s: VarPool::new(
                vr::TIME,
                vec![
                    VarSlot::scalar(Role::Time, 0.0),
                    VarSlot::dynamic(Role::Parameter),
                    VarSlot::dynamic(Role::Input),
                    VarSlot::dynamic(Role::Output),
                ],
            ),
        }
    }
}

impl DynamicArrayTest {
    pub fn x_size(&self) -> u64 {
        *self.uint64s.scalar(u64_slot::X_SIZE)
    }

    pub fn y_size(&self) -> u64 {
        *self.uint64s.scalar(u64_slot::Y_SIZE)
    }
}

impl UserModel for DynamicArrayTest {
    type LoggingCategory = LogCategory;

    fn compute_outputs(&mut self, _context: &ModelContext<Self>) -> Result<Fmi3Res, Fmi3Error> {
        self.float64s.apply_binop(
            f64_slot::OUTPUT,
            f64_slot::INPUT,
            f64_slot::PARAMETER,
            |i, p| i * p,
        );
        Ok(Fmi3Res::OK)
    }

    /// Resize all dynamic arrays to the freshly configured dimensions.
    fn reconfigure(&mut self, context: &ModelContext<Self>) -> Result<Fmi3Res, Fmi3Error> {
        let (x, y) = (self.x_size(), self.y_size());
        let Some(len) = x.checked_mul(y).and_then(|n| usize::try_from(n).ok()) else {
            context.log(
                Fmi3Error::Error,
                LogCategory::Error,
                &format!("requested dimensions {x} x {y} overflow"),
            );
            return Err(Fmi3Error::Error);
        };
        self.float64s.resize_dynamic(len);
        context.log(
            Fmi3Res::OK,
            LogCategory::Fmi,
            &format!("reconfigured arrays to {x} x {y}"),
        );
        Ok(Fmi3Res::OK)
    }
}

impl Model for DynamicArrayTest {
    const MODEL_NAME: &'static str = "DynamicArrayTest";
    const INSTANTIATION_TOKEN: &'static str = "{bd403596-3166-4232-abc9-42f6c0b1e380}";
    const RECONFIGURABLE: bool = true;

    fn set_start_values(&mut self) {
        self.uint64s.set_scalar(u64_slot::X_SIZE, DEFAULT_X_SIZE);
        self.uint64s.set_scalar(u64_slot::Y_SIZE, DEFAULT_Y_SIZE);
        self.float64s.fill(0, 0.0);
        self.float64s
            .resize_dynamic((DEFAULT_X_SIZE * DEFAULT_Y_SIZE) as usize);
        for slot in [f64_slot::PARAMETER, f64_slot::INPUT, f64_slot::OUTPUT] {
            self.float64s.elements_mut(slot).fill(0.0);
        }
    }
}

fmu_export::impl_var_access!(DynamicArrayTest { uint64s, float64s });

fmu_export::export_fmu!(co_simulation: DynamicArrayTest);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_values_allocate_the_default_extent() {
        let mut model = DynamicArrayTest::default();
        model.set_start_values();
        assert_eq!(model.x_size(), 4);
        assert_eq!(model.y_size(), 3);
        assert_eq!(model.float64s.elements(f64_slot::INPUT).len(), 12);
        assert!(model
            .float64s
            .elements(f64_slot::OUTPUT)
            .iter()
            .all(|&v| v == 0.0));
    }

    #[test]
    fn reconfigure_rejects_overflowing_dimensions() {
        let mut model = DynamicArrayTest::default();
        model.set_start_values();
        model.uint64s.set_scalar(u64_slot::X_SIZE, u64::MAX);
        model.uint64s.set_scalar(u64_slot::Y_SIZE, 2);
        let context = ModelContext::new_for_test();
        assert_eq!(model.reconfigure(&context), Err(Fmi3Error::Error));
    }
}
