//! `register_phase`: incremental phase dependency registration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{DirectiveError, Violation},
    step::{BuilderStep, DirectiveCategory},
};

const DIRECTIVE: &str = "register_phase";

/// The raw `depends_on` value of a phase registration.
///
/// Kept untyped until composition so a document that passes a scalar or a
/// mapping fails with a definition error naming the application rather
/// than a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependsOn(Value);

impl Default for DependsOn {
    fn default() -> Self {
        DependsOn(Value::Array(Vec::new()))
    }
}

impl DependsOn {
    /// The phase names, or a description of what was found instead of a
    /// list of names.
    pub fn phase_names(&self) -> Result<Vec<String>, String> {
        let Value::Array(items) = &self.0 else {
            return Err(describe(&self.0));
        };
        items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(format!("a list containing {}", describe(other))),
            })
            .collect()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => format!("the boolean {flag}"),
        Value::Number(number) => format!("the number {number}"),
        Value::String(text) => format!("the string \"{text}\""),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    }
}

impl From<Value> for DependsOn {
    fn from(value: Value) -> Self {
        DependsOn(value)
    }
}

impl From<Vec<String>> for DependsOn {
    fn from(names: Vec<String>) -> Self {
        DependsOn(Value::Array(names.into_iter().map(Value::String).collect()))
    }
}

impl From<Vec<&str>> for DependsOn {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().map(str::to_string).collect::<Vec<_>>().into()
    }
}

impl<const N: usize> From<[&str; N]> for DependsOn {
    fn from(names: [&str; N]) -> Self {
        names.to_vec().into()
    }
}

/// Arguments of the `register_phase` directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterPhaseArgs {
    pub name: String,
    pub pipeline: String,
    #[serde(default)]
    pub depends_on: DependsOn,
}

impl RegisterPhaseArgs {
    pub fn new(name: impl Into<String>, pipeline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pipeline: pipeline.into(),
            depends_on: DependsOn::default(),
        }
    }

    pub fn depends_on(mut self, depends_on: impl Into<DependsOn>) -> Self {
        self.depends_on = depends_on.into();
        self
    }
}

/// Registers a phase in one of the application's recognized pipelines.
///
/// Repeated registrations of the same phase only add dependencies, which
/// lets a subclass extend a phase its parent declared.
pub fn register_phase(args: RegisterPhaseArgs) -> BuilderStep {
    BuilderStep::new(DirectiveCategory::PhaseDefinitions, DIRECTIVE, move |application| {
        if !application.recognized_pipelines().contains(&args.pipeline) {
            let available = application.recognized_pipelines().iter().cloned().collect();
            return Err(DirectiveError::new(
                DIRECTIVE,
                Violation::InvalidPipeline {
                    pipeline: args.pipeline.clone(),
                    available,
                },
            )
            .in_application(application.name()));
        }

        let dependencies = args.depends_on.phase_names().map_err(|found| {
            DirectiveError::new(DIRECTIVE, Violation::InvalidDependencies { found }).in_application(application.name())
        })?;

        application
            .model_mut()
            .phase_definitions
            .register(&args.pipeline, &args.name, dependencies);
        Ok(())
    })
}
