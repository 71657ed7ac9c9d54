//! The contract every generator implementation satisfies.

use async_trait::async_trait;

use crate::analysis::{AnalyzedDocument, AnnotationData};
use crate::cancellation::CancellationToken;
use crate::diagnostics::DiagnosticSink;
use crate::syntax::Declaration;

/// Produces new items from one annotated declaration.
///
/// An instance is built per annotation occurrence from that annotation's
/// data and invoked once. Implementations read the document but never
/// modify it; they may report diagnostics through `progress` regardless of
/// whether they succeed. Returning no items is a valid no-op.
///
/// Syntax trees are not `Send`, so generators run on the calling task.
#[async_trait(?Send)]
pub trait Generator {
    async fn generate(
        &self,
        target: &Declaration,
        document: &AnalyzedDocument,
        progress: &dyn DiagnosticSink,
        cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>>;
}

/// Construction from the raw data of the annotation that bound the generator.
///
/// Implemented by every generator registered with
/// [`GeneratorModule::register`](crate::registry::GeneratorModule::register).
pub trait FromAnnotation: Sized {
    fn from_annotation(data: &AnnotationData) -> anyhow::Result<Self>;
}
