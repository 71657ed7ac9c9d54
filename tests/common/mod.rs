// Common test generators, fixtures and helpers

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use attrgen::prelude::*;
use attrgen::proc_macro2::Span;
use attrgen::syn::{self, Ident, parse_quote};
use heck::ToUpperCamelCase;

/// Annotation types of the `my_attrs` crate used throughout the tests.
pub const ANNOTATIONS: &str = r#"
    #[generator_binding(my_gens::outer::Duplicator)]
    pub struct Duplicate;

    #[generator_binding(my_gens::Gen)]
    pub struct Gen;

    #[generator_binding("Pair, my_gens")]
    pub struct Pair;

    #[generator_binding("Reporter")]
    pub struct Report;

    #[generator_binding(my_gens::Failing)]
    pub struct Fail;

    #[generator_binding(my_gens::Unconstructible)]
    pub struct Broken;

    #[generator_binding(my_gens::Qualified)]
    pub struct Qualify;

    #[generator_binding(my_gens::Empty)]
    pub struct Nothing;

    #[generator_binding(my_gens::CancelProbe)]
    pub struct Probe;

    #[generator_binding(missing_gens::Ghost)]
    pub struct Ghost;

    pub struct Unbound;
"#;

pub const GENERATOR_MODULE: &str = "deps/my_gens.rlib";

fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

/// `pub struct <Target><Suffix>;`, suffix from `#[Duplicate("suffix")]`.
pub struct Duplicator {
    suffix: String,
}

impl FromAnnotation for Duplicator {
    fn from_annotation(data: &AnnotationData) -> anyhow::Result<Self> {
        let suffix = data.string_arg().unwrap_or_else(|| "copy".to_string());
        Ok(Self {
            suffix: suffix.to_upper_camel_case(),
        })
    }
}

#[async_trait(?Send)]
impl Generator for Duplicator {
    async fn generate(
        &self,
        target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        let name = ident(&format!("{}{}", target.name(), self.suffix));
        Ok(vec![parse_quote!(pub struct #name;)])
    }
}

/// A single `pub fn M() {}`.
pub struct MethodGen;

impl FromAnnotation for MethodGen {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for MethodGen {
    async fn generate(
        &self,
        _target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        Ok(vec![parse_quote! {
            #[allow(non_snake_case)]
            pub fn M() {}
        }])
    }
}

/// `pub struct X;` and `pub struct Y;`.
pub struct PairGen;

impl FromAnnotation for PairGen {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for PairGen {
    async fn generate(
        &self,
        _target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        Ok(vec![parse_quote!(pub struct X;), parse_quote!(pub struct Y;)])
    }
}

/// Reports an info diagnostic at the target, then emits a marker const.
pub struct Reporter;

impl FromAnnotation for Reporter {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for Reporter {
    async fn generate(
        &self,
        target: &Declaration,
        _document: &AnalyzedDocument,
        progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        progress.report(
            Diagnostic::info("GEN001", format!("generating for {}", target.name()))
                .at(target.span()),
        );
        Ok(vec![parse_quote!(pub const REPORTED: bool = true;)])
    }
}

/// Reports a warning, then fails.
pub struct Failing;

impl FromAnnotation for Failing {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for Failing {
    async fn generate(
        &self,
        target: &Declaration,
        _document: &AnalyzedDocument,
        progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        progress.report(Diagnostic::warning("GEN002", "about to fail"));
        anyhow::bail!("cannot generate for {}", target.name())
    }
}

/// Never constructible.
pub struct Unconstructible;

impl FromAnnotation for Unconstructible {
    fn from_annotation(data: &AnnotationData) -> anyhow::Result<Self> {
        anyhow::bail!("{} carries no usable arguments", data.name())
    }
}

#[async_trait(?Send)]
impl Generator for Unconstructible {
    async fn generate(
        &self,
        _target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        Ok(Vec::new())
    }
}

/// Emits fully-qualified standard library paths.
pub struct Qualified;

impl FromAnnotation for Qualified {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for Qualified {
    async fn generate(
        &self,
        target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        let name = ident(&format!("{}_names", target.name().to_lowercase()));
        Ok(vec![parse_quote! {
            pub fn #name() -> ::std::vec::Vec<::std::string::String> {
                ::std::vec::Vec::new()
            }
        }])
    }
}

/// Emits nothing.
pub struct Empty;

impl FromAnnotation for Empty {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for Empty {
    async fn generate(
        &self,
        _target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        _cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        Ok(Vec::new())
    }
}

/// Records whether its cancellation token was already cancelled.
pub struct CancelProbe;

impl FromAnnotation for CancelProbe {
    fn from_annotation(_data: &AnnotationData) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait(?Send)]
impl Generator for CancelProbe {
    async fn generate(
        &self,
        _target: &Declaration,
        _document: &AnalyzedDocument,
        _progress: &dyn DiagnosticSink,
        cancellation: CancellationToken,
    ) -> anyhow::Result<Vec<syn::Item>> {
        let cancelled = cancellation.is_cancelled();
        Ok(vec![parse_quote!(pub const CANCELLED: bool = #cancelled;)])
    }
}

/// Every sample generator under module `my_gens`.
pub fn registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    registry
        .module("my_gens")
        .register::<Duplicator>("outer.Duplicator")
        .register::<MethodGen>("Gen")
        .register::<PairGen>("Pair")
        .register::<Reporter>("Reporter")
        .register::<Failing>("Failing")
        .register::<Unconstructible>("Unconstructible")
        .register::<Qualified>("Qualified")
        .register::<Empty>("Empty")
        .register::<CancelProbe>("CancelProbe");
    registry
}

/// Project `app` referencing `my_gens` and knowing the `my_attrs` annotations.
pub fn project() -> Project {
    project_with_references(&[GENERATOR_MODULE])
}

pub fn project_with_references(references: &[&str]) -> Project {
    let mut project = Project::new("app")
        .with_annotation_source("my_attrs", ANNOTATIONS)
        .expect("annotation source parses");
    for reference in references {
        project.add_reference(PathBuf::from(reference));
    }
    project
}

pub fn transformer() -> Transformer {
    Transformer::new(project(), Arc::new(registry()))
}

pub fn source(text: &str) -> SourceDocument {
    SourceDocument::new("src/models.rs", text)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Output text with the header removed.
pub fn body(output: &OutputDocument) -> &str {
    let header = attrgen::transform::header(LineEnding::Native.as_str());
    output.text().strip_prefix(header.as_str()).unwrap_or(output.text())
}

/// Token-level rendering of a tree, for comparison against `parse_quote!`.
pub fn tokens(file: &syn::File) -> String {
    attrgen::quote::ToTokens::to_token_stream(file).to_string()
}
