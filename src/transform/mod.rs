//! The transform orchestrator.
//!
//! A transform analyzes one input document, walks its declarations, runs the
//! generators bound to each declaration's annotations, and folds their output
//! into a fresh document. Nothing in the input is modified and no state is
//! kept between calls apart from the registry's module cache.
//!
//! ```no_run
//! # async fn run() -> attrgen::error::TransformResult<()> {
//! use std::sync::Arc;
//! use attrgen::prelude::*;
//!
//! let project = Project::new("app").with_reference("target/deps/my_gens.rlib");
//! let registry = Arc::new(GeneratorRegistry::new());
//! let transformer = Transformer::new(project, registry);
//!
//! let input = SourceDocument::from_path("src/models.rs")?;
//! let output = transformer.transform(&input, &LogSink).await?;
//! println!("{}", output.text());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};

pub mod assembly;
pub mod format;
pub mod simplify;

pub use assembly::{GeneratedGroup, HEADER_LINES, assemble, header};

use crate::analysis::AnalyzedDocument;
use crate::cancellation::CancellationToken;
use crate::config::TransformOptions;
use crate::diagnostics::DiagnosticSink;
use crate::discovery::GeneratorDiscovery;
use crate::error::{TransformError, TransformResult};
use crate::project::Project;
use crate::registry::GeneratorRegistry;
use crate::resolver::TypeResolver;
use crate::syntax::SourceDocument;

pub struct Transformer {
    project: Project,
    registry: Arc<GeneratorRegistry>,
    options: TransformOptions,
}

impl Transformer {
    pub fn new(project: Project, registry: Arc<GeneratorRegistry>) -> Self {
        Self {
            project,
            registry,
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform `input`, reporting generator diagnostics to `progress`.
    pub async fn transform(
        &self,
        input: &SourceDocument,
        progress: &dyn DiagnosticSink,
    ) -> TransformResult<OutputDocument> {
        self.transform_with_cancellation(input, progress, CancellationToken::new())
            .await
    }

    /// Transform `input`; every generator invocation receives a child of
    /// `cancellation`.
    ///
    /// The first failure aborts the whole call and no document is returned.
    /// Diagnostics reported before the failure stay in `progress`.
    pub async fn transform_with_cancellation(
        &self,
        input: &SourceDocument,
        progress: &dyn DiagnosticSink,
        cancellation: CancellationToken,
    ) -> TransformResult<OutputDocument> {
        let start = Instant::now();
        let document = AnalyzedDocument::analyze(input.clone(), &self.project)?;
        debug!(
            "Transformer: Analyzed {} in {:?}",
            input.path().display(),
            start.elapsed()
        );

        let imports = document.file_imports();
        let resolver = TypeResolver::new(&self.registry, self.project.references(), &self.options);
        let discovery = GeneratorDiscovery::new(resolver);

        let mut groups = Vec::new();
        let mut invocations = 0usize;
        for declaration in document.declarations() {
            let symbol = document.model().declared_symbol(&declaration);
            for discovered in discovery.find_generators(&symbol)? {
                trace!(
                    "Transformer: Running {} on {}",
                    discovered.identity,
                    declaration.display_path()
                );
                let items = discovered
                    .generator
                    .generate(&declaration, &document, progress, cancellation.child_token())
                    .await
                    .map_err(|source| TransformError::GeneratorExecution {
                        generator: discovered.identity.to_string(),
                        declaration: declaration.display_path(),
                        source,
                    })?;
                invocations += 1;
                groups.push(GeneratedGroup::new(declaration.namespace_chain(), items));
            }
        }

        let generated: usize = groups.iter().map(|g| g.items().len()).sum();
        let mut syntax = assemble(imports, groups);
        if self.options.simplify {
            simplify::simplify(&mut syntax);
        }
        let text = format::render(&syntax, self.options.line_ending);

        debug!(
            "Transformer: Generated {} item(s) from {} invocation(s) in {:?}",
            generated,
            invocations,
            start.elapsed()
        );

        Ok(OutputDocument {
            source_path: input.path().to_path_buf(),
            path: output_path(input.path(), &self.options.output_suffix),
            text,
            syntax,
        })
    }
}

/// `<dir>/<stem>.<suffix>.rs` for an input at `<dir>/<stem>.rs`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}.{suffix}.rs"))
}

/// A generated document, derived from an input document it does not replace.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    source_path: PathBuf,
    path: PathBuf,
    text: String,
    syntax: syn::File,
}

impl OutputDocument {
    /// Path of the input document this was generated from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header and formatted tree.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn syntax(&self) -> &syn::File {
        &self.syntax
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn write(&self) -> TransformResult<()> {
        std::fs::write(&self.path, &self.text).map_err(|source| TransformError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("src/models.rs"), "generated"),
            PathBuf::from("src/models.generated.rs")
        );
        assert_eq!(
            output_path(Path::new("lib.rs"), "g"),
            PathBuf::from("lib.g.rs")
        );
    }
}
