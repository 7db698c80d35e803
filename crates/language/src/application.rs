//! Composed application instances.

use indexmap::IndexSet;
use ramble_types::ApplicationModel;

/// One composed instance of an application class.
///
/// Created empty by [`crate::ApplicationClass::instantiate`], then mutated
/// by each inherited builder step in order. A failed composition never
/// yields an `Application` to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    name: String,
    recognized_pipelines: IndexSet<String>,
    model: ApplicationModel,
}

impl Application {
    pub(crate) fn new(name: impl Into<String>, recognized_pipelines: IndexSet<String>) -> Self {
        Self {
            name: name.into(),
            recognized_pipelines,
            model: ApplicationModel::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pipelines `register_phase` accepts for this application.
    pub fn recognized_pipelines(&self) -> &IndexSet<String> {
        &self.recognized_pipelines
    }

    pub fn model(&self) -> &ApplicationModel {
        &self.model
    }

    /// Mutable access for builder steps.
    pub fn model_mut(&mut self) -> &mut ApplicationModel {
        &mut self.model
    }

    pub fn into_model(self) -> ApplicationModel {
        self.model
    }
}
