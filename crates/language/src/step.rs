//! Builder steps: the unit a directive registers at definition time.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{application::Application, error::DirectiveError};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// The model container a directive writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveCategory {
    Workloads,
    Executables,
    Inputs,
    WorkloadVariables,
    EnvironmentVariables,
    PhaseDefinitions,
}

impl DirectiveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveCategory::Workloads => "workloads",
            DirectiveCategory::Executables => "executables",
            DirectiveCategory::Inputs => "inputs",
            DirectiveCategory::WorkloadVariables => "workload_variables",
            DirectiveCategory::EnvironmentVariables => "environment_variables",
            DirectiveCategory::PhaseDefinitions => "phase_definitions",
        }
    }
}

impl fmt::Display for DirectiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type StepAction = dyn Fn(&mut Application) -> Result<(), DirectiveError> + Send + Sync;

/// A deferred mutation of an application instance.
///
/// Each step receives a sequence number when it is created. Clones share
/// that number, which is what identifies "the same step" when a class
/// inherits it through more than one path. Two steps built from identical
/// arguments are still distinct.
#[derive(Clone)]
pub struct BuilderStep {
    sequence: u64,
    category: DirectiveCategory,
    directive: &'static str,
    action: Arc<StepAction>,
}

impl BuilderStep {
    pub fn new<F>(category: DirectiveCategory, directive: &'static str, action: F) -> Self
    where
        F: Fn(&mut Application) -> Result<(), DirectiveError> + Send + Sync + 'static,
    {
        Self {
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            category,
            directive,
            action: Arc::new(action),
        }
    }

    /// Registration order across every step created in this process.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn category(&self) -> DirectiveCategory {
        self.category
    }

    /// Name of the directive that produced this step.
    pub fn directive(&self) -> &'static str {
        self.directive
    }

    pub fn apply(&self, application: &mut Application) -> Result<(), DirectiveError> {
        (self.action)(application)
    }
}

impl fmt::Debug for BuilderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderStep")
            .field("sequence", &self.sequence)
            .field("category", &self.category)
            .field("directive", &self.directive)
            .finish_non_exhaustive()
    }
}
