//! Typed variable storage for exported FMUs.
//!
//! Each FMI scalar type a model declares gets one [`VarPool`]: a contiguous
//! value-reference range with one [`VarSlot`] per declared variable. A slot
//! carries the variable's [`Role`] and [`Extent`], so the same pool type
//! covers plain scalars, fixed-shape arrays and runtime-resizable arrays.
//!
//! The batched read/write entry points validate the *entire* request (VR
//! ranges, total element count, set permissions) before touching any data, so
//! a rejected call leaves the pool unchanged.

/// Causality of a declared variable, as far as the data-exchange layer is
/// concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Input,
    Output,
    Constant,
    Parameter,
    CalculatedParameter,
    /// The independent variable. Read-only; mirrored from the instance clock.
    Time,
    /// Structural size parameter, writable only inside configuration mode.
    Structural,
}

/// Shape of one variable's value block in the flat exchange buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Scalar,
    /// Fixed array, row-major.
    Fixed(usize, usize),
    /// Runtime-sized array. All dynamic slots of a pool share one element
    /// count, changed only through [`VarPool::resize_dynamic`].
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("value reference {0} is out of range for this type")]
    UnknownValueReference(u32),
    #[error("the referenced variables span {expected} values, but {given} were supplied")]
    SizeMismatch { expected: usize, given: usize },
    #[error("value reference {0} is read-only")]
    ReadOnly(u32),
    #[error("value reference {0} is structural and only settable in configuration mode")]
    StructuralOutsideConfigurationMode(u32),
}

/// One declared variable: role, shape, and owned values.
#[derive(Debug, Clone)]
pub struct VarSlot<T> {
    role: Role,
    extent: Extent,
    data: Vec<T>,
}

impl<T: Clone> VarSlot<T> {
    pub fn scalar(role: Role, value: T) -> Self {
        Self {
            role,
            extent: Extent::Scalar,
            data: vec![value],
        }
    }

    pub fn fixed(role: Role, rows: usize, cols: usize, value: T) -> Self {
        Self {
            role,
            extent: Extent::Fixed(rows, cols),
            data: vec![value; rows * cols],
        }
    }

    pub fn dynamic(role: Role) -> Self {
        Self {
            role,
            extent: Extent::Dynamic,
            data: Vec::new(),
        }
    }
}

impl<T> VarSlot<T> {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }
}

/// All variables of one FMI type, owning the contiguous value-reference range
/// `[base, base + slot count)`.
#[derive(Debug, Clone)]
pub struct VarPool<T> {
    base: u32,
    slots: Vec<VarSlot<T>>,
}

impl<T> VarPool<T> {
    pub fn new(base: u32, slots: Vec<VarSlot<T>>) -> Self {
        Self { base, slots }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of declared variables (not elements).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index_of(&self, vr: u32) -> Result<usize, StoreError> {
        vr.checked_sub(self.base)
            .map(|idx| idx as usize)
            .filter(|&idx| idx < self.slots.len())
            .ok_or(StoreError::UnknownValueReference(vr))
    }

    /// Total element count a batch of value references spans, validating
    /// every reference against the declared range.
    pub fn span(&self, vrs: &[u32]) -> Result<usize, StoreError> {
        vrs.iter().try_fold(0usize, |acc, &vr| {
            Ok(acc + self.slots[self.index_of(vr)?].data.len())
        })
    }

    pub fn elements(&self, index: usize) -> &[T] {
        &self.slots[index].data
    }

    pub fn elements_mut(&mut self, index: usize) -> &mut [T] {
        &mut self.slots[index].data
    }

    /// First element of a slot; how scalar-extent variables are read.
    pub fn scalar(&self, index: usize) -> &T {
        &self.slots[index].data[0]
    }

    /// Walk the elements of a validated batch in request order.
    pub fn visit(&self, vrs: &[u32], mut f: impl FnMut(&T)) -> Result<(), StoreError> {
        for &vr in vrs {
            let idx = self.index_of(vr)?;
            self.slots[idx].data.iter().for_each(&mut f);
        }
        Ok(())
    }

    /// `dst = f(src)` elementwise.
    pub fn apply_unop(&mut self, dst: usize, src: usize, f: impl Fn(&T) -> T) {
        let out: Vec<T> = self.slots[src].data.iter().map(f).collect();
        self.slots[dst].data = out;
    }

    /// `dst = f(a, b)` elementwise.
    pub fn apply_binop(&mut self, dst: usize, a: usize, b: usize, f: impl Fn(&T, &T) -> T) {
        let out: Vec<T> = self.slots[a]
            .data
            .iter()
            .zip(&self.slots[b].data)
            .map(|(x, y)| f(x, y))
            .collect();
        self.slots[dst].data = out;
    }
}

impl<T: Clone> VarPool<T> {
    pub fn fill(&mut self, index: usize, value: T) {
        self.slots[index].data.fill(value);
    }

    pub fn set_scalar(&mut self, index: usize, value: T) {
        self.slots[index].data[0] = value;
    }

    /// Resize every dynamic-extent slot to `len` elements. Surviving prefix
    /// elements keep their values; new trailing elements are `T::default()`.
    pub fn resize_dynamic(&mut self, len: usize)
    where
        T: Default,
    {
        for slot in &mut self.slots {
            if slot.extent == Extent::Dynamic {
                slot.data.resize(len, T::default());
            }
        }
    }

    /// Batched read. The whole request is validated against the declared VR
    /// range and the exact total element count before anything is copied.
    pub fn read(&self, vrs: &[u32], out: &mut [T]) -> Result<(), StoreError> {
        let expected = self.span(vrs)?;
        if expected != out.len() {
            return Err(StoreError::SizeMismatch {
                expected,
                given: out.len(),
            });
        }
        let mut j = 0;
        for &vr in vrs {
            let idx = self.index_of(vr)?;
            let data = &self.slots[idx].data;
            out[j..j + data.len()].clone_from_slice(data);
            j += data.len();
        }
        Ok(())
    }

    /// Batched write. Ranges, total element count and per-variable set
    /// permissions are all checked before the first element is stored, so a
    /// rejected batch mutates nothing. Returns whether a parameter-role
    /// variable was written (the caller recomputes calculated parameters).
    pub fn write(
        &mut self,
        vrs: &[u32],
        values: &[T],
        in_configuration_mode: bool,
    ) -> Result<bool, StoreError> {
        let expected = self.span(vrs)?;
        if expected != values.len() {
            return Err(StoreError::SizeMismatch {
                expected,
                given: values.len(),
            });
        }
        for &vr in vrs {
            match self.slots[self.index_of(vr)?].role {
                Role::Time | Role::Output => return Err(StoreError::ReadOnly(vr)),
                Role::Structural if !in_configuration_mode => {
                    return Err(StoreError::StructuralOutsideConfigurationMode(vr))
                }
                _ => {}
            }
        }

        let mut j = 0;
        let mut tuned = false;
        for &vr in vrs {
            let idx = self.index_of(vr)?;
            let slot = &mut self.slots[idx];
            let n = slot.data.len();
            slot.data.clone_from_slice(&values[j..j + n]);
            j += n;
            tuned |= slot.role == Role::Parameter;
        }
        Ok(tuned)
    }
}

impl VarPool<f64> {
    /// Mirror the instance clock into every time-role slot.
    pub fn set_time(&mut self, time: f64) {
        for slot in &mut self.slots {
            if slot.role == Role::Time {
                slot.data.fill(time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> VarPool<f64> {
        VarPool::new(
            10,
            vec![
                VarSlot::scalar(Role::Time, 0.0),
                VarSlot::fixed(Role::Input, 2, 3, 1.0),
                VarSlot::fixed(Role::Output, 2, 3, 4.0),
                VarSlot::fixed(Role::Parameter, 2, 3, 4.0),
            ],
        )
    }

    #[test]
    fn span_counts_elements_per_reference() {
        let p = pool();
        assert_eq!(p.span(&[10]), Ok(1));
        assert_eq!(p.span(&[11, 13]), Ok(12));
        assert_eq!(
            p.span(&[14]),
            Err(StoreError::UnknownValueReference(14))
        );
        assert_eq!(p.span(&[9]), Err(StoreError::UnknownValueReference(9)));
    }

    #[test]
    fn read_rejects_size_mismatch() {
        let p = pool();
        let mut out = [0.0; 5];
        assert_eq!(
            p.read(&[11], &mut out),
            Err(StoreError::SizeMismatch {
                expected: 6,
                given: 5
            })
        );
    }

    #[test]
    fn write_is_all_or_nothing() {
        let mut p = pool();
        // Second reference is out of range; the first variable must keep its
        // previous contents.
        let values = [9.0; 7];
        assert_eq!(
            p.write(&[11, 99], &values, false),
            Err(StoreError::UnknownValueReference(99))
        );
        assert!(p.elements(1).iter().all(|&v| v == 1.0));

        // Read-only target late in the batch also leaves the input untouched.
        let values = [9.0; 12];
        assert_eq!(
            p.write(&[11, 12], &values, false),
            Err(StoreError::ReadOnly(12))
        );
        assert!(p.elements(1).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn write_reports_parameter_updates() {
        let mut p = pool();
        let values = [2.0; 6];
        assert_eq!(p.write(&[11], &values, false), Ok(false));
        assert_eq!(p.write(&[13], &values, false), Ok(true));
        assert!(p.elements(3).iter().all(|&v| v == 2.0));
    }

    #[test]
    fn structural_writes_gated_on_configuration_mode() {
        let mut p = VarPool::new(
            0,
            vec![
                VarSlot::scalar(Role::Structural, 4u64),
                VarSlot::scalar(Role::Structural, 3u64),
            ],
        );
        assert_eq!(
            p.write(&[0], &[2], false),
            Err(StoreError::StructuralOutsideConfigurationMode(0))
        );
        assert_eq!(*p.scalar(0), 4);
        assert_eq!(p.write(&[0], &[2], true), Ok(false));
        assert_eq!(*p.scalar(0), 2);
    }

    #[test]
    fn resize_dynamic_preserves_prefix_and_zero_fills() {
        let mut p = VarPool::new(
            0,
            vec![
                VarSlot::scalar(Role::Structural, 0.0),
                VarSlot::dynamic(Role::Input),
            ],
        );
        p.resize_dynamic(3);
        p.elements_mut(1).copy_from_slice(&[1.0, 2.0, 3.0]);
        p.resize_dynamic(5);
        assert_eq!(p.elements(1), &[1.0, 2.0, 3.0, 0.0, 0.0]);
        p.resize_dynamic(2);
        assert_eq!(p.elements(1), &[1.0, 2.0]);
        // The scalar slot is untouched by reconfiguration.
        assert_eq!(p.elements(0).len(), 1);
    }

    #[test]
    fn time_slots_follow_the_clock() {
        let mut p = pool();
        p.set_time(2.5);
        assert_eq!(*p.scalar(0), 2.5);
        assert!(p.elements(1).iter().all(|&v| v == 1.0));
    }
}
