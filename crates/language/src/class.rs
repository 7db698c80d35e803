//! Application classes and the composition engine.
//!
//! A class is defined once: its own builder steps are appended to the
//! merged step lists of its bases, in base order, and the result is cached.
//! Instantiating a class replays that cached list against a fresh
//! [`Application`]. Classes are immutable after [`ApplicationClassBuilder::build`]
//! and may be shared freely across threads.

use std::{collections::HashSet, sync::Arc};

use indexmap::IndexSet;
use tracing::debug;

use crate::{application::Application, error::DirectiveError, step::BuilderStep};

/// A named application type with its inherited, ordered builder steps.
#[derive(Debug)]
pub struct ApplicationClass {
    name: String,
    description: Option<String>,
    bases: Vec<Arc<ApplicationClass>>,
    recognized_pipelines: IndexSet<String>,
    own_steps: Vec<BuilderStep>,
    merged_steps: Vec<BuilderStep>,
}

impl ApplicationClass {
    pub fn builder(name: impl Into<String>) -> ApplicationClassBuilder {
        ApplicationClassBuilder {
            name: name.into(),
            description: None,
            bases: Vec::new(),
            pipelines: None,
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Direct bases in linearization order.
    pub fn bases(&self) -> &[Arc<ApplicationClass>] {
        &self.bases
    }

    pub fn recognized_pipelines(&self) -> &IndexSet<String> {
        &self.recognized_pipelines
    }

    /// Steps declared directly on this class.
    pub fn own_steps(&self) -> &[BuilderStep] {
        &self.own_steps
    }

    /// Every step this class executes, ancestors first, each at most once.
    pub fn merged_steps(&self) -> &[BuilderStep] {
        &self.merged_steps
    }

    /// Composes a new instance by running the merged step list in order.
    ///
    /// The first failing step aborts composition; its error is returned and
    /// the partially built instance is dropped.
    pub fn instantiate(&self) -> Result<Application, DirectiveError> {
        let mut application = Application::new(self.name.clone(), self.recognized_pipelines.clone());
        for step in &self.merged_steps {
            debug!(
                application = %self.name,
                sequence = step.sequence(),
                category = %step.category(),
                directive = step.directive(),
                "executing directive"
            );
            step.apply(&mut application)
                .map_err(|error| error.in_application(&self.name))?;
        }
        Ok(application)
    }
}

/// Collects a class's bases, pipelines, and directives before the merged
/// step list is computed.
#[derive(Debug)]
pub struct ApplicationClassBuilder {
    name: String,
    description: Option<String>,
    bases: Vec<Arc<ApplicationClass>>,
    pipelines: Option<IndexSet<String>>,
    steps: Vec<BuilderStep>,
}

impl ApplicationClassBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a base class. Bases are merged in the order they are added.
    pub fn inherits(mut self, base: &Arc<ApplicationClass>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Declares the pipelines `register_phase` accepts, replacing any
    /// inherited set.
    pub fn pipelines<I, S>(mut self, pipelines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pipelines = Some(pipelines.into_iter().map(Into::into).collect());
        self
    }

    pub fn directive(mut self, step: BuilderStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn directives(mut self, steps: impl IntoIterator<Item = BuilderStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn build(self) -> Arc<ApplicationClass> {
        let merged_steps = merge_steps(&self.bases, &self.steps);
        let recognized_pipelines = self.pipelines.unwrap_or_else(|| {
            self.bases
                .iter()
                .map(|base| &base.recognized_pipelines)
                .find(|pipelines| !pipelines.is_empty())
                .cloned()
                .unwrap_or_default()
        });

        debug!(
            application = %self.name,
            own = self.steps.len(),
            merged = merged_steps.len(),
            "defined application class"
        );

        Arc::new(ApplicationClass {
            name: self.name,
            description: self.description,
            bases: self.bases,
            recognized_pipelines,
            own_steps: self.steps,
            merged_steps,
        })
    }
}

/// Concatenates the bases' merged lists and `own`, keeping the first
/// occurrence of every step sequence number.
fn merge_steps(bases: &[Arc<ApplicationClass>], own: &[BuilderStep]) -> Vec<BuilderStep> {
    let mut seen = HashSet::new();
    bases
        .iter()
        .flat_map(|base| base.merged_steps.iter())
        .chain(own.iter())
        .filter(|step| seen.insert(step.sequence()))
        .cloned()
        .collect()
}
