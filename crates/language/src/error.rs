//! Definition errors raised while registering or composing directives.

use thiserror::Error;

/// An authoring mistake in an application definition.
///
/// The composition engine fills in `application` for errors raised by
/// helpers that do not know which application they run for, so every error
/// that reaches a caller names the directive, the application, and the
/// violated contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Directive {directive}{} {violation}", application_suffix(.application))]
pub struct DirectiveError {
    pub directive: String,
    pub application: Option<String>,
    pub violation: Violation,
}

/// The contract a directive invocation broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("requires one of {singular} or {plural} to be defined")]
    MissingDefinition { singular: String, plural: String },

    #[error("accepts only one of {singular} or {plural}, but both were given")]
    ConflictingDefinition { singular: String, plural: String },

    #[error("resolved an empty list of {plural}")]
    EmptyDefinition { plural: String },

    #[error("was given an invalid pipeline \"{pipeline}\"\nAvailable pipelines are: {}", join_names(.available))]
    InvalidPipeline { pipeline: String, available: Vec<String> },

    #[error("was given an invalid type for the depends_on attribute (expected a list of phase names, found {found})")]
    InvalidDependencies { found: String },
}

/// Failures while assembling or using an application library.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Application {name} is defined more than once")]
    DuplicateApplication { name: String },

    #[error("Application {application} inherits from unknown application {base}")]
    UnknownBase { application: String, base: String },

    #[error("Inheritance cycle detected: {}", join_cycle(.cycle))]
    InheritanceCycle { cycle: Vec<String> },

    #[error("Application {name} is not defined in this library")]
    UnknownApplication { name: String },

    #[error(transparent)]
    Definition(#[from] DirectiveError),
}

fn join_cycle(names: &[String]) -> String {
    names.join(" -> ")
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}

fn application_suffix(application: &Option<String>) -> String {
    match application {
        Some(name) => format!(" in application {name}"),
        None => String::new(),
    }
}

impl DirectiveError {
    pub fn new(directive: impl Into<String>, violation: Violation) -> Self {
        Self {
            directive: directive.into(),
            application: None,
            violation,
        }
    }

    /// Attributes the error to `application` unless it already names one.
    pub fn in_application(mut self, application: &str) -> Self {
        if self.application.is_none() {
            self.application = Some(application.to_string());
        }
        self
    }
}
