//! Directive factories.
//!
//! Each factory takes an explicit argument struct and returns a
//! [`BuilderStep`]; nothing touches an application until the step runs
//! during composition. [`Directive`] is the document form of the same six
//! calls, one variant per directive name.

mod phase;
mod variables;
mod workload;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use phase::{DependsOn, RegisterPhaseArgs, register_phase};
pub use variables::{EnvironmentVariableArgs, WorkloadVariableArgs, environment_variable, workload_variable};
pub use workload::{CommandTemplate, ExecutableArgs, InputFileArgs, WorkloadArgs, executable, input_file, workload};

use crate::step::BuilderStep;

/// A directive invocation as written in an application document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Workload(WorkloadArgs),
    Executable(ExecutableArgs),
    InputFile(InputFileArgs),
    WorkloadVariable(WorkloadVariableArgs),
    EnvironmentVariable(EnvironmentVariableArgs),
    RegisterPhase(RegisterPhaseArgs),
}

impl Directive {
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Workload(_) => "workload",
            Directive::Executable(_) => "executable",
            Directive::InputFile(_) => "input_file",
            Directive::WorkloadVariable(_) => "workload_variable",
            Directive::EnvironmentVariable(_) => "environment_variable",
            Directive::RegisterPhase(_) => "register_phase",
        }
    }

    pub fn into_step(self) -> BuilderStep {
        match self {
            Directive::Workload(args) => workload(args),
            Directive::Executable(args) => executable(args),
            Directive::InputFile(args) => input_file(args),
            Directive::WorkloadVariable(args) => workload_variable(args),
            Directive::EnvironmentVariable(args) => environment_variable(args),
            Directive::RegisterPhase(args) => register_phase(args),
        }
    }
}

/// Accepts strings, numbers, and booleans for string-valued fields so
/// documents may write `default: 10` instead of `default: "10"`.
///
/// YAML already reads a plain `10` as a string. JSON documents do not, so
/// every string-valued directive field goes through this one coercion.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!("expected a scalar value, found {other}"))),
    }
}

struct ScalarString(String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        scalar_string(deserializer).map(ScalarString)
    }
}

/// [`scalar_string`] applied to every item of an optional list.
fn scalar_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<ScalarString>> = Option::deserialize(deserializer)?;
    Ok(items.map(|items| items.into_iter().map(|item| item.0).collect()))
}

/// [`scalar_string`] applied to every value of a mapping.
fn scalar_string_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: IndexMap<String, ScalarString> = IndexMap::deserialize(deserializer)?;
    Ok(entries.into_iter().map(|(name, value)| (name, value.0)).collect())
}
