//! FMI 3.0 export runtime.

pub mod export;
mod instance;
mod store;
mod traits;

// Re-export the raw ABI under the name the wrapper code uses.
pub use fmi3_abi as binding;

pub use instance::{LogMessageFn, ModelContext, ModelInstance, StepResult};
pub use store::{Extent, Role, StoreError, VarPool, VarSlot};
pub use traits::{Model, ModelLoggingCategory, UserModel, VarAccess};

/// State of the instance lifecycle state machine.
///
/// Only the states an exported Co-Simulation test FMU can actually reach are
/// modelled; the Model-Exchange and Scheduled-Execution states of the full
/// standard state machine have no counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Instantiated,
    ConfigurationMode,
    InitializationMode,
    StepMode,
    Terminated,
}

/// Successful FMI status results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fmi3Res {
    /// The call was successful. The output argument values are defined.
    OK,
    /// A non-critical problem was detected, but the computation may continue.
    Warning,
}

/// Failing FMI status results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fmi3Error {
    /// The call was not successful and the FMU is in the same state as before
    /// the call, but the computation may continue.
    #[error("Discard")]
    Discard,
    /// The call failed; the instance is unchanged and the caller may try a
    /// different call, reset, or free the instance.
    #[error("Error")]
    Error,
    /// The FMU instance is unrecoverably broken.
    #[error("Fatal")]
    Fatal,
}

/// Newtype over the raw `fmi3Status` value crossing the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fmi3Status(binding::fmi3Status);

impl Fmi3Status {
    /// Convert to [`Result<Fmi3Res, Fmi3Error>`].
    #[inline]
    pub fn ok(self) -> Result<Fmi3Res, Fmi3Error> {
        match self.0 {
            binding::fmi3Status_fmi3OK => Ok(Fmi3Res::OK),
            binding::fmi3Status_fmi3Warning => Ok(Fmi3Res::Warning),
            binding::fmi3Status_fmi3Discard => Err(Fmi3Error::Discard),
            binding::fmi3Status_fmi3Fatal => Err(Fmi3Error::Fatal),
            _ => Err(Fmi3Error::Error),
        }
    }
}

impl From<Fmi3Res> for Fmi3Status {
    fn from(res: Fmi3Res) -> Self {
        Self(match res {
            Fmi3Res::OK => binding::fmi3Status_fmi3OK,
            Fmi3Res::Warning => binding::fmi3Status_fmi3Warning,
        })
    }
}

impl From<Fmi3Error> for Fmi3Status {
    fn from(err: Fmi3Error) -> Self {
        Self(match err {
            Fmi3Error::Discard => binding::fmi3Status_fmi3Discard,
            Fmi3Error::Error => binding::fmi3Status_fmi3Error,
            Fmi3Error::Fatal => binding::fmi3Status_fmi3Fatal,
        })
    }
}

impl From<Result<Fmi3Res, Fmi3Error>> for Fmi3Status {
    fn from(result: Result<Fmi3Res, Fmi3Error>) -> Self {
        match result {
            Ok(res) => res.into(),
            Err(err) => err.into(),
        }
    }
}

impl From<Fmi3Status> for binding::fmi3Status {
    fn from(status: Fmi3Status) -> Self {
        status.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        let status: Fmi3Status = Fmi3Res::OK.into();
        assert_eq!(binding::fmi3Status::from(status), binding::fmi3Status_fmi3OK);
        assert_eq!(status.ok(), Ok(Fmi3Res::OK));

        let status: Fmi3Status = Fmi3Error::Error.into();
        assert_eq!(
            binding::fmi3Status::from(status),
            binding::fmi3Status_fmi3Error
        );
        assert_eq!(status.ok(), Err(Fmi3Error::Error));
    }
}
