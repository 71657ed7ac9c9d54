//! Semantic view of a document: symbols, their annotations and the table
//! binding annotation types to generators.

pub mod annotation;
pub mod catalog;
pub mod document;
pub mod model;
pub(crate) mod paths;
pub mod symbol;

pub use annotation::{Annotation, AnnotationData};
pub use catalog::{AnnotationCatalog, AnnotationType, BINDING_ATTRIBUTE, is_binding_attribute};
pub use document::AnalyzedDocument;
pub use model::SemanticModel;
pub use symbol::{Symbol, SymbolKind};
