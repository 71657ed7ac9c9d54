//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use attrgen::prelude::*;
//! ```
//!
//! Brings in what a generator author or a host running transforms needs:
//! the plugin traits, the registry, the project model and the transformer.
//! Analysis internals (catalog, semantic model, symbols) stay in
//! [`crate::analysis`].

// Plugin contract
pub use crate::plugin::{FromAnnotation, Generator};
pub use crate::analysis::{AnalyzedDocument, AnnotationData};
pub use crate::syntax::{Declaration, SourceDocument};

// Registration and resolution
pub use crate::identity::GeneratorIdentity;
pub use crate::project::{Project, ReferencedModule};
pub use crate::registry::{GeneratorModule, GeneratorRegistry};

// Running transforms
pub use crate::cancellation::CancellationToken;
pub use crate::config::{LineEnding, ModuleMatchPolicy, TransformOptions};
pub use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSink, LogSink, Severity};
pub use crate::transform::{OutputDocument, Transformer};

// Error handling
pub use crate::error::{TransformError, TransformResult};

pub use attrgen_macros::generator_binding;
pub use async_trait::async_trait;
