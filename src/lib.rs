//! # attrgen
//!
//! Attribute-driven code generation over Rust syntax trees.
//!
//! A transform reads a source file, finds declarations carrying attributes
//! whose annotation type is bound to a generator, runs those generators and
//! writes a new file holding only the generated items, the original file's
//! imports and a fixed auto-generated header.
//!
//! ## Features
//!
//! - **Declarative bindings**: `#[generator_binding(...)]` on an annotation
//!   type names its generator, by string or by type path
//! - **Explicit registry**: generators are registered per module up front and
//!   modules are loaded once
//! - **Scope preservation**: output for a declaration inside `mod` blocks is
//!   wrapped in the same modules with their imports
//! - **Post-processing**: `prettyplease` formatting and optional path
//!   simplification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use attrgen::prelude::*;
//!
//! // Annotation types, usually from a shared crate
//! let project = Project::new("app")
//!     .with_reference("target/deps/my_gens.rlib")
//!     .with_annotation_source("my_attrs", r#"
//!         #[generator_binding(my_gens::Builder)]
//!         pub struct Build;
//!     "#)?;
//!
//! let mut registry = GeneratorRegistry::new();
//! registry.module("my_gens").register::<Builder>("Builder");
//!
//! let output = Transformer::new(project, Arc::new(registry))
//!     .transform(&SourceDocument::from_path("src/models.rs")?, &LogSink)
//!     .await?;
//! output.write()?;
//! ```

pub mod analysis;
pub mod cancellation;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod identity;
pub mod plugin;
pub mod prelude;
pub mod project;
pub mod registry;
pub mod resolver;
pub mod syntax;
pub mod transform;

pub use attrgen_macros::generator_binding;

// Generators build their output with these
pub use proc_macro2;
pub use quote;
pub use syn;
