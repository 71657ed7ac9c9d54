use syn::ItemUse;

use super::SemanticModel;
use crate::error::{TransformError, TransformResult};
use crate::project::Project;
use crate::syntax::{DeclarationWalker, SourceDocument, file_imports};

/// A source document after parsing and analysis, as generators see it.
#[derive(Debug)]
pub struct AnalyzedDocument {
    source: SourceDocument,
    syntax: syn::File,
    model: SemanticModel,
}

impl AnalyzedDocument {
    /// Parse `source` and build its semantic model against `project`.
    pub fn analyze(source: SourceDocument, project: &Project) -> TransformResult<Self> {
        let syntax = source.parse()?;
        let model = SemanticModel::new(project.name(), &syntax, project.catalog()).map_err(
            |source_err| TransformError::Parse {
                path: source.path().to_path_buf(),
                source: source_err,
            },
        )?;
        Ok(Self {
            source,
            syntax,
            model,
        })
    }

    pub fn source(&self) -> &SourceDocument {
        &self.source
    }

    pub fn syntax(&self) -> &syn::File {
        &self.syntax
    }

    pub fn model(&self) -> &SemanticModel {
        &self.model
    }

    pub fn declarations(&self) -> DeclarationWalker<'_> {
        DeclarationWalker::new(&self.syntax)
    }

    /// `use` items at the file root, in source order.
    pub fn file_imports(&self) -> Vec<ItemUse> {
        file_imports(&self.syntax)
    }
}
