//! Turns a generator identity into a constructed generator instance.

use std::sync::Arc;

use log::{trace, warn};

use crate::analysis::AnnotationData;
use crate::config::{ModuleMatchPolicy, TransformOptions};
use crate::error::{ModuleLoadError, ModuleResolutionError, TransformError, TransformResult};
use crate::identity::{GeneratorIdentity, LiteralName, TypeReference};
use crate::plugin::Generator;
use crate::project::ReferencedModule;
use crate::registry::{GeneratorModule, GeneratorRegistry};

/// Module name reported when a literal name without a module part matches
/// no registered module.
const ANY_MODULE: &str = "*";

pub struct TypeResolver<'a> {
    registry: &'a GeneratorRegistry,
    modules: &'a [ReferencedModule],
    options: &'a TransformOptions,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        registry: &'a GeneratorRegistry,
        modules: &'a [ReferencedModule],
        options: &'a TransformOptions,
    ) -> Self {
        Self {
            registry,
            modules,
            options,
        }
    }

    /// Resolve `identity` and construct a generator from `data`, the raw data
    /// of the annotation that named it.
    ///
    /// Only symbolic references are matched against the referenced modules;
    /// literal names go straight to the registry.
    pub fn resolve(
        &self,
        identity: &GeneratorIdentity,
        data: &AnnotationData,
    ) -> TransformResult<Box<dyn Generator>> {
        let (module, type_name) = match identity {
            GeneratorIdentity::Name(literal) => self.load_literal(&LiteralName::parse(literal))?,
            GeneratorIdentity::Reference(reference) => self.load_reference(reference)?,
            GeneratorIdentity::Unresolved(path) => {
                return Err(ModuleResolutionError::Unresolved { path: path.clone() }.into());
            }
        };
        trace!(
            "TypeResolver: Constructing {type_name} from module {}",
            module.name()
        );
        module.instantiate(&type_name, data)
    }

    fn load_literal(&self, literal: &LiteralName) -> TransformResult<(Arc<GeneratorModule>, String)> {
        let module = match &literal.module {
            Some(module) => self.registry.load(module, None)?,
            None => {
                let name = self.module_declaring(&literal.type_name)?;
                self.registry.load(&name, None)?
            }
        };
        Ok((module, literal.type_name.clone()))
    }

    /// The single registered module declaring `type_name`.
    fn module_declaring(&self, type_name: &str) -> TransformResult<String> {
        let declaring = self.registry.find_type(type_name);
        match declaring.as_slice() {
            [] => Err(TransformError::type_not_found(type_name, ANY_MODULE)),
            [only] => Ok(only.to_string()),
            [first, ..] => match self.options.module_match {
                ModuleMatchPolicy::FirstMatch => {
                    warn!("TypeResolver: {type_name} is declared by {declaring:?}, using {first}");
                    Ok(first.to_string())
                }
                ModuleMatchPolicy::Strict => Err(ModuleResolutionError::Ambiguous {
                    module: type_name.to_string(),
                    candidates: declaring.iter().map(|m| m.to_string()).collect(),
                }
                .into()),
            },
        }
    }

    fn load_reference(
        &self,
        reference: &TypeReference,
    ) -> TransformResult<(Arc<GeneratorModule>, String)> {
        let referenced = self.match_module(reference.module_name())?;
        if self.options.verify_module_files && !referenced.path().exists() {
            return Err(ModuleLoadError::MissingFile {
                path: referenced.path().to_path_buf(),
            }
            .into());
        }
        let module = self
            .registry
            .load(&referenced.simple_name(), Some(referenced.path()))?;
        Ok((module, reference.dotted_name()))
    }

    /// The referenced module whose simple name matches `module_name`,
    /// ignoring case.
    pub fn match_module(&self, module_name: &str) -> Result<&'a ReferencedModule, ModuleResolutionError> {
        let matching: Vec<&ReferencedModule> = self
            .modules
            .iter()
            .filter(|m| m.matches(module_name))
            .collect();

        match matching.as_slice() {
            [] => Err(ModuleResolutionError::NotFound {
                module: module_name.to_string(),
            }),
            [only] => Ok(*only),
            [first, ..] => match self.options.module_match {
                ModuleMatchPolicy::FirstMatch => {
                    warn!(
                        "TypeResolver: {} referenced modules match {module_name}, using {}",
                        matching.len(),
                        first.path().display()
                    );
                    Ok(*first)
                }
                ModuleMatchPolicy::Strict => Err(ModuleResolutionError::Ambiguous {
                    module: module_name.to_string(),
                    candidates: matching
                        .iter()
                        .map(|m| m.path().display().to_string())
                        .collect(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalyzedDocument;
    use crate::cancellation::CancellationToken;
    use crate::diagnostics::DiagnosticSink;
    use crate::plugin::FromAnnotation;
    use crate::syntax::Declaration;
    use async_trait::async_trait;
    use syn::parse_quote;

    struct Named(String);

    #[async_trait(?Send)]
    impl Generator for Named {
        async fn generate(
            &self,
            _target: &Declaration,
            _document: &AnalyzedDocument,
            _progress: &dyn DiagnosticSink,
            _cancellation: CancellationToken,
        ) -> anyhow::Result<Vec<syn::Item>> {
            let ident = syn::Ident::new(&self.0, proc_macro2::Span::call_site());
            Ok(vec![parse_quote!(struct #ident;)])
        }
    }

    impl FromAnnotation for Named {
        fn from_annotation(data: &AnnotationData) -> anyhow::Result<Self> {
            Ok(Named(data.name()))
        }
    }

    fn registry() -> GeneratorRegistry {
        let mut registry = GeneratorRegistry::new();
        registry.module("gens").register::<Named>("Outer.Inner");
        registry.module("gens").register::<Named>("Shared");
        registry.module("more_gens").register::<Named>("Shared");
        registry
    }

    fn data() -> AnnotationData {
        AnnotationData::new(parse_quote!(#[Mark]))
    }

    #[test]
    fn test_literal_never_touches_modules() {
        let registry = registry();
        let options = TransformOptions::default();
        let resolver = TypeResolver::new(&registry, &[], &options);

        let identity = GeneratorIdentity::Name("Outer.Inner, gens".into());
        assert!(resolver.resolve(&identity, &data()).is_ok());

        let identity = GeneratorIdentity::Name("Outer.Inner".into());
        assert!(resolver.resolve(&identity, &data()).is_ok());
    }

    #[test]
    fn test_literal_without_module_must_be_unique() {
        let registry = registry();
        let strict = TransformOptions::default();
        let resolver = TypeResolver::new(&registry, &[], &strict);
        let identity = GeneratorIdentity::Name("Shared".into());
        assert!(matches!(
            resolver.resolve(&identity, &data()),
            Err(TransformError::ModuleResolution(ModuleResolutionError::Ambiguous { .. }))
        ));

        let lenient = TransformOptions::builder()
            .module_match(ModuleMatchPolicy::FirstMatch)
            .build();
        let resolver = TypeResolver::new(&registry, &[], &lenient);
        assert!(resolver.resolve(&identity, &data()).is_ok());

        let missing = GeneratorIdentity::Name("Nowhere".into());
        assert!(matches!(
            resolver.resolve(&missing, &data()),
            Err(TransformError::GeneratorTypeNotFound { .. })
        ));
    }

    #[test]
    fn test_reference_resolution() {
        let registry = registry();
        let options = TransformOptions::default();
        let modules = vec![ReferencedModule::new("deps/GENS.rlib")];
        let resolver = TypeResolver::new(&registry, &modules, &options);

        let reference = TypeReference::new("gens", &["Outer", "Inner"]).unwrap();
        assert!(resolver.resolve(&reference.into(), &data()).is_ok());

        let absent = TypeReference::new("absent", &["Gen"]).unwrap();
        assert!(matches!(
            resolver.resolve(&absent.into(), &data()),
            Err(TransformError::ModuleResolution(ModuleResolutionError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_ambiguous_referenced_modules() {
        let registry = registry();
        let modules = vec![
            ReferencedModule::new("a/gens.rlib"),
            ReferencedModule::new("b/gens.rlib"),
        ];
        let strict = TransformOptions::default();
        let resolver = TypeResolver::new(&registry, &modules, &strict);
        assert_eq!(
            resolver.match_module("gens").unwrap_err(),
            ModuleResolutionError::Ambiguous {
                module: "gens".into(),
                candidates: vec!["a/gens.rlib".into(), "b/gens.rlib".into()],
            }
        );

        let lenient = TransformOptions::builder()
            .module_match(ModuleMatchPolicy::FirstMatch)
            .build();
        let resolver = TypeResolver::new(&registry, &modules, &lenient);
        assert_eq!(
            resolver.match_module("gens").unwrap().path(),
            std::path::Path::new("a/gens.rlib")
        );
    }
}
