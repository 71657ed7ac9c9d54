//! The project hosting an input document.

use std::path::{Path, PathBuf};

use crate::analysis::AnnotationCatalog;
use crate::registry::module_key;

/// An external compiled unit available to analysis, keyed by its file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferencedModule {
    path: PathBuf,
}

impl ReferencedModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension, e.g. `my_gens` for `deps/my_gens.rlib`.
    pub fn simple_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Case-insensitive, folded the same way as registry module names.
    pub fn matches(&self, module_name: &str) -> bool {
        module_key(&self.simple_name()) == module_key(module_name)
    }
}

/// Module name of the input, its referenced modules and the annotation types
/// known to it.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    references: Vec<ReferencedModule>,
    catalog: AnnotationCatalog,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: Vec::new(),
            catalog: AnnotationCatalog::new(),
        }
    }

    pub fn with_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_reference(path);
        self
    }

    pub fn add_reference(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.references.push(ReferencedModule::new(path));
        self
    }

    pub fn with_catalog(mut self, catalog: AnnotationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Record the annotation types declared in `source`, the text of
    /// module `module`.
    pub fn with_annotation_source(mut self, module: &str, source: &str) -> syn::Result<Self> {
        let file = syn::parse_file(source)?;
        self.catalog.add_source(module, &file)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn references(&self) -> &[ReferencedModule] {
        &self.references
    }

    pub fn catalog(&self) -> &AnnotationCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut AnnotationCatalog {
        &mut self.catalog
    }
}
