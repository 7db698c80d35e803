//! Phase dependency graph keyed by pipeline.
//!
//! Registrations only ever add edges: re-registering a phase merges the new
//! dependencies into the existing ordered set. The graph may contain cycles
//! or reference phases that were never registered; ordering and cycle
//! detection belong to the scheduler that walks it.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Dependencies of a single phase, in first-seen order.
pub type PhaseDependencies = IndexSet<String>;

/// `pipeline -> phase -> dependencies`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseGraph(IndexMap<String, IndexMap<String, PhaseDependencies>>);

impl PhaseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `phase` in `pipeline`, merging `dependencies` into any
    /// set recorded by an earlier registration.
    ///
    /// Missing pipeline and phase entries are created empty. Dependencies
    /// already present are skipped, so the set never shrinks, never holds
    /// duplicates, and keeps the order in which edges were first declared.
    pub fn register<I, S>(&mut self, pipeline: &str, phase: &str, dependencies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phases = self.0.entry(pipeline.to_string()).or_default();
        let existing = phases.entry(phase.to_string()).or_default();
        for dependency in dependencies {
            existing.insert(dependency.into());
        }
    }

    /// Dependencies recorded for `phase` in `pipeline`, if it was registered.
    pub fn dependencies(&self, pipeline: &str, phase: &str) -> Option<&PhaseDependencies> {
        self.0.get(pipeline).and_then(|phases| phases.get(phase))
    }

    /// All phases of `pipeline` in registration order.
    pub fn phases(&self, pipeline: &str) -> Option<&IndexMap<String, PhaseDependencies>> {
        self.0.get(pipeline)
    }

    /// Pipelines that received at least one registration.
    pub fn pipelines(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, PhaseDependencies>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
