//! ## Architecture
//!
//! The [`export_fmu!`] macro generates the C API surface of an FMI 3.0
//! Co-Simulation FMU for a model type. Most of the generated functions operate
//! on an [`fmi3::binding::fmi3Instance`], which is an opaque pointer to a
//! [`fmi3::ModelInstance`].
//!
//! [`fmi3::ModelInstance`] owns the lifecycle state machine and the batched
//! variable accessors; the model-specific pieces (variable pools, start
//! values, step computation) are supplied through the [`fmi3::Model`] and
//! [`fmi3::UserModel`] traits.

#![deny(clippy::all)]
#![deny(deref_nullptr)]
#![deny(invalid_value)]
#![deny(invalid_from_utf8)]

pub mod fmi3;

// Re-exported for use by the generated code in `export_fmu!`.
#[doc(hidden)]
pub use log;
#[doc(hidden)]
pub use paste;
