//! # Ramble Application Language
//!
//! Application definitions are written as ordered directive calls. Each
//! call registers a [`BuilderStep`] on an [`ApplicationClass`] without
//! touching any runtime state. Instantiating a class replays its inherited
//! steps, ancestors first, against a fresh [`Application`], producing the
//! workloads, executables, inputs, variables, and phase dependency graph
//! that the expansion engine and phase scheduler consume.
//!
//! ## Usage
//!
//! ```rust
//! use ramble_language::{
//!     ApplicationClass,
//!     directives::{ExecutableArgs, RegisterPhaseArgs, WorkloadArgs, executable, register_phase, workload},
//! };
//!
//! let base = ApplicationClass::builder("base")
//!     .pipelines(["setup", "execute"])
//!     .directive(register_phase(RegisterPhaseArgs::new("make_experiments", "setup").depends_on(["get_inputs"])))
//!     .build();
//!
//! let stream = ApplicationClass::builder("stream")
//!     .inherits(&base)
//!     .directive(executable(ExecutableArgs::new("run", "{exec_name} --arraysize {array_size}")))
//!     .directive(workload(WorkloadArgs::new("standard").executable("run")))
//!     .build();
//!
//! let application = stream.instantiate()?;
//! assert_eq!(application.model().workloads["standard"].executables, vec!["run"]);
//! # Ok::<(), ramble_language::DirectiveError>(())
//! ```
//!
//! ## Architecture
//!
//! - **`step`**: builder steps and their registration sequence numbers
//! - **`definitions`**: singular/plural argument resolution shared by directives
//! - **`directives`**: the six directive factories and their argument structs
//! - **`class`**: application classes, inherited step merging, and composition
//! - **`document`** / **`library`**: YAML/JSON definitions and their inheritance resolution
//! - **`config`**: user configuration for default pipelines

pub mod application;
pub mod class;
pub mod config;
pub mod definitions;
pub mod directives;
pub mod document;
pub mod error;
pub mod library;
pub mod step;

pub use application::Application;
pub use class::{ApplicationClass, ApplicationClassBuilder};
pub use config::LanguageConfig;
pub use definitions::{NameList, merge_definitions, require_definition};
pub use directives::Directive;
pub use document::{ApplicationDocument, parse_application_file, parse_application_str};
pub use error::{DirectiveError, LibraryError, Violation};
pub use library::ApplicationLibrary;
pub use step::{BuilderStep, DirectiveCategory};
