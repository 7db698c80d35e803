//! Composed application model shared by the directive language, the
//! expansion engine, and the phase scheduler.
//!
//! Every map in this crate is an [`indexmap::IndexMap`] so authoring order
//! survives composition and serialization. Consumers treat a finished
//! [`ApplicationModel`] as read-mostly: the directive language is the only
//! writer, and it writes during a single composition pass.

pub mod model;
pub mod phases;
pub mod variables;

pub use model::{ApplicationModel, Executable, InputFile, OutputCapture, Workload};
pub use phases::{PhaseDependencies, PhaseGraph};
pub use variables::{EnvironmentAction, EnvironmentVariable, EnvironmentVariables, WorkloadVariable, WorkloadVariables};
