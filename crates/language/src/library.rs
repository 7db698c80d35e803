//! A set of application classes built from definition documents.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{
    application::Application,
    class::ApplicationClass,
    config::LanguageConfig,
    document::{ApplicationDocument, parse_application_file},
    error::LibraryError,
};

const DOCUMENT_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Application classes keyed by name, in document order.
#[derive(Debug, Default, Clone)]
pub struct ApplicationLibrary {
    classes: IndexMap<String, Arc<ApplicationClass>>,
}

impl ApplicationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already built class.
    pub fn insert(&mut self, class: Arc<ApplicationClass>) -> Result<(), LibraryError> {
        if self.classes.contains_key(class.name()) {
            return Err(LibraryError::DuplicateApplication {
                name: class.name().to_string(),
            });
        }
        self.classes.insert(class.name().to_string(), class);
        Ok(())
    }

    /// Builds every document into a class, bases before the classes that
    /// inherit from them.
    ///
    /// A base must be defined by one of `documents`. Applications that
    /// neither declare pipelines nor have bases recognize
    /// `config.default_pipelines`.
    pub fn from_documents(documents: Vec<ApplicationDocument>, config: &LanguageConfig) -> Result<Self, LibraryError> {
        let mut by_name: IndexMap<String, ApplicationDocument> = IndexMap::new();
        for document in documents {
            if by_name.contains_key(&document.application) {
                return Err(LibraryError::DuplicateApplication {
                    name: document.application,
                });
            }
            by_name.insert(document.application.clone(), document);
        }

        let mut built: IndexMap<String, Arc<ApplicationClass>> = IndexMap::new();
        for name in by_name.keys() {
            let mut stack = Vec::new();
            define(name, &by_name, config, &mut built, &mut stack)?;
        }

        // Present classes in authoring order rather than definition order.
        let classes = by_name
            .keys()
            .filter_map(|name| built.get(name).map(|class| (name.clone(), Arc::clone(class))))
            .collect();

        Ok(Self { classes })
    }

    /// Loads every definition file found under `paths`.
    ///
    /// Directories are walked recursively in sorted order and only files
    /// with a `.yaml`, `.yml`, or `.json` extension are read.
    pub fn load_paths(paths: &[PathBuf], config: &LanguageConfig) -> Result<Self> {
        let mut files = Vec::new();
        for path in paths {
            collect_definition_files(path, &mut files)?;
        }

        let mut documents = Vec::new();
        for file in &files {
            let mut parsed = parse_application_file(file)?;
            debug!(path = %file.display(), applications = parsed.len(), "parsed application file");
            documents.append(&mut parsed);
        }

        let library = Self::from_documents(documents, config)?;
        info!(files = files.len(), applications = library.len(), "loaded application library");
        Ok(library)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ApplicationClass>> {
        self.classes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<ApplicationClass>> {
        self.classes.values()
    }

    /// Composes a fresh instance of the named application.
    pub fn instantiate(&self, name: &str) -> Result<Application, LibraryError> {
        let class = self.get(name).ok_or_else(|| LibraryError::UnknownApplication {
            name: name.to_string(),
        })?;
        Ok(class.instantiate()?)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn define(
    name: &str,
    documents: &IndexMap<String, ApplicationDocument>,
    config: &LanguageConfig,
    built: &mut IndexMap<String, Arc<ApplicationClass>>,
    stack: &mut Vec<String>,
) -> Result<Arc<ApplicationClass>, LibraryError> {
    if let Some(class) = built.get(name) {
        return Ok(Arc::clone(class));
    }

    if let Some(position) = stack.iter().position(|entry| entry == name) {
        let mut cycle = stack[position..].to_vec();
        cycle.push(name.to_string());
        return Err(LibraryError::InheritanceCycle { cycle });
    }

    // Callers only pass names taken from `documents` or checked against it.
    let Some(document) = documents.get(name) else {
        return Err(LibraryError::UnknownApplication { name: name.to_string() });
    };

    stack.push(name.to_string());
    let mut builder = ApplicationClass::builder(name);
    for base in &document.inherits {
        if !documents.contains_key(base) {
            return Err(LibraryError::UnknownBase {
                application: name.to_string(),
                base: base.clone(),
            });
        }
        let base_class = define(base, documents, config, built, stack)?;
        builder = builder.inherits(&base_class);
    }
    stack.pop();

    if let Some(description) = &document.description {
        builder = builder.description(description.clone());
    }
    if let Some(pipelines) = &document.pipelines {
        builder = builder.pipelines(pipelines.iter().cloned());
    } else if document.inherits.is_empty() {
        builder = builder.pipelines(config.default_pipelines.iter().cloned());
    }

    let class = builder
        .directives(document.directives.iter().cloned().map(|directive| directive.into_step()))
        .build();
    built.insert(name.to_string(), Arc::clone(&class));
    Ok(class)
}

fn collect_definition_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("Failed to read application directory: {}", path.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to list application directory: {}", path.display()))?;
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            collect_definition_files(&entry, files)?;
        } else if entry
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| DOCUMENT_EXTENSIONS.contains(&extension))
        {
            files.push(entry);
        } else {
            debug!(path = %entry.display(), "skipping non-definition file");
        }
    }
    Ok(())
}
