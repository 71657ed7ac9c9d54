use std::path::PathBuf;

use thiserror::Error;

pub type TransformResult<T> = Result<T, TransformError>;

/// Every way a single transform call can abort.
///
/// The first error raised stops the pipeline; fragments generated before it
/// are discarded and no document is produced.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("IO Error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ModuleResolution(#[from] ModuleResolutionError),

    #[error(transparent)]
    ModuleLoad(#[from] ModuleLoadError),

    #[error("Generator type '{type_name}' was not found in module '{module}'")]
    GeneratorTypeNotFound { type_name: String, module: String },

    #[error("Failed to construct generator '{type_name}': {source}")]
    GeneratorConstruction {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Generator '{generator}' failed on '{declaration}': {source}")]
    GeneratorExecution {
        generator: String,
        declaration: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Matching a symbolic reference's owning module against the referenced
/// modules of a project.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleResolutionError {
    #[error("No referenced module matches '{module}'")]
    NotFound { module: String },

    #[error("Generator type path '{path}' does not name a reachable type")]
    Unresolved { path: String },

    #[error("Module name '{module}' is ambiguous between {candidates:?}")]
    Ambiguous {
        module: String,
        candidates: Vec<String>,
    },
}

/// Turning a matched module into a loaded generator module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleLoadError {
    #[error("No generator module is registered under '{module}'")]
    NotRegistered { module: String },

    #[error("Referenced module file {path} does not exist")]
    MissingFile { path: PathBuf },

    #[error("Module '{module}' is already loaded from {loaded}, refusing to load it from {requested}")]
    Conflict {
        module: String,
        loaded: PathBuf,
        requested: PathBuf,
    },
}

impl TransformError {
    pub(crate) fn type_not_found(type_name: impl Into<String>, module: impl Into<String>) -> Self {
        TransformError::GeneratorTypeNotFound {
            type_name: type_name.into(),
            module: module.into(),
        }
    }
}
