//! Explicit registration of generator implementations.
//!
//! A generator module is the runtime counterpart of a referenced module: a
//! named set of factories keyed by dotted type name. Modules are registered
//! up front and loaded at most once per registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace};

use crate::analysis::AnnotationData;
use crate::error::{ModuleLoadError, TransformError, TransformResult};
use crate::plugin::{FromAnnotation, Generator};

pub type GeneratorFactory =
    Arc<dyn Fn(&AnnotationData) -> anyhow::Result<Box<dyn Generator>> + Send + Sync>;

#[derive(Clone)]
pub struct GeneratorModule {
    name: String,
    factories: BTreeMap<String, GeneratorFactory>,
}

impl fmt::Debug for GeneratorModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorModule")
            .field("name", &self.name)
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl GeneratorModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factories: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `G` under its dotted type name, e.g. `outer.Duplicator`.
    pub fn register<G>(&mut self, type_name: impl Into<String>) -> &mut Self
    where
        G: Generator + FromAnnotation + 'static,
    {
        self.register_factory(type_name, |data| {
            Ok(Box::new(G::from_annotation(data)?) as Box<dyn Generator>)
        })
    }

    pub fn register_factory<F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&AnnotationData) -> anyhow::Result<Box<dyn Generator>> + Send + Sync + 'static,
    {
        self.factories.insert(type_name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Construct a fresh generator of `type_name` from `data`.
    pub fn instantiate(
        &self,
        type_name: &str,
        data: &AnnotationData,
    ) -> TransformResult<Box<dyn Generator>> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| TransformError::type_not_found(type_name, &self.name))?;
        factory(data).map_err(|source| TransformError::GeneratorConstruction {
            type_name: format!("{}, {}", type_name, self.name),
            source,
        })
    }
}

#[derive(Debug, Clone)]
struct LoadedModule {
    path: Option<PathBuf>,
    module: Arc<GeneratorModule>,
}

#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    modules: BTreeMap<String, Arc<GeneratorModule>>,
    loaded: RwLock<HashMap<String, LoadedModule>>,
}

/// Case-folded module name; every module name comparison goes through this.
pub(crate) fn module_key(name: &str) -> String {
    name.to_lowercase()
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The module registered under `name`, created empty if absent.
    pub fn module(&mut self, name: &str) -> &mut GeneratorModule {
        let entry = self
            .modules
            .entry(module_key(name))
            .or_insert_with(|| Arc::new(GeneratorModule::new(name)));
        Arc::make_mut(entry)
    }

    pub fn add_module(&mut self, module: GeneratorModule) -> &mut Self {
        self.modules
            .insert(module_key(&module.name), Arc::new(module));
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.modules.contains_key(&module_key(name))
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.values().map(|m| m.name())
    }

    /// Load the module named `name`, optionally backed by the referenced
    /// module file at `path`.
    ///
    /// The first successful load is cached and reused. A later load that
    /// names a different file for the same module is refused.
    pub fn load(
        &self,
        name: &str,
        path: Option<&Path>,
    ) -> Result<Arc<GeneratorModule>, ModuleLoadError> {
        let key = module_key(name);
        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = loaded.get_mut(&key) {
            match (&entry.path, path) {
                (Some(existing), Some(requested)) if existing != requested => {
                    return Err(ModuleLoadError::Conflict {
                        module: name.to_string(),
                        loaded: existing.clone(),
                        requested: requested.to_path_buf(),
                    });
                }
                (None, Some(requested)) => entry.path = Some(requested.to_path_buf()),
                _ => {}
            }
            trace!("GeneratorRegistry: Reusing loaded module {name}");
            return Ok(Arc::clone(&entry.module));
        }

        let module = self
            .modules
            .get(&key)
            .cloned()
            .ok_or_else(|| ModuleLoadError::NotRegistered {
                module: name.to_string(),
            })?;
        loaded.insert(
            key,
            LoadedModule {
                path: path.map(Path::to_path_buf),
                module: Arc::clone(&module),
            },
        );
        debug!(
            "GeneratorRegistry: Loaded module {} ({} generator type(s))",
            module.name(),
            module.factories.len()
        );
        Ok(module)
    }

    /// Registered modules declaring `type_name`, in name order.
    pub fn find_type(&self, type_name: &str) -> Vec<&str> {
        self.modules
            .values()
            .filter(|m| m.contains(type_name))
            .map(|m| m.name())
            .collect()
    }

    /// Names of every module loaded so far.
    pub fn loaded_modules(&self) -> Vec<String> {
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = loaded.values().map(|l| l.module.name.clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalyzedDocument;
    use crate::cancellation::CancellationToken;
    use crate::diagnostics::DiagnosticSink;
    use crate::syntax::Declaration;
    use async_trait::async_trait;
    use syn::parse_quote;

    struct Noop;

    #[async_trait(?Send)]
    impl Generator for Noop {
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

    impl FromAnnotation for Noop {
        fn from_annotation(data: &AnnotationData) -> anyhow::Result<Self> {
            anyhow::ensure!(data.name() != "Broken", "broken annotation");
            Ok(Noop)
        }
    }

    fn registry() -> GeneratorRegistry {
        let mut registry = GeneratorRegistry::new();
        registry.module("My_Gens").register::<Noop>("outer.Noop");
        registry
    }

    #[test]
    fn test_load_is_case_insensitive_and_cached() {
        let registry = registry();
        let first = registry.load("my_gens", None).unwrap();
        let second = registry.load("MY_GENS", None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.loaded_modules(), vec!["My_Gens"]);

        let mut registry = GeneratorRegistry::new();
        registry.module("Générateurs").register::<Noop>("Noop");
        assert!(registry.load("GÉNÉRATEURS", None).is_ok());
    }

    #[test]
    fn test_load_conflict_and_unregistered() {
        let registry = registry();
        registry
            .load("my_gens", Some(Path::new("a/my_gens.rlib")))
            .unwrap();
        registry
            .load("my_gens", Some(Path::new("a/my_gens.rlib")))
            .unwrap();
        assert!(matches!(
            registry.load("my_gens", Some(Path::new("b/my_gens.rlib"))),
            Err(ModuleLoadError::Conflict { .. })
        ));
        assert_eq!(
            registry.load("absent", None).unwrap_err(),
            ModuleLoadError::NotRegistered {
                module: "absent".into()
            }
        );
    }

    #[test]
    fn test_concurrent_loads_from_different_paths() {
        let registry = registry();
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["a/my_gens.rlib", "b/my_gens.rlib"]
                .into_iter()
                .map(|path| {
                    let registry = &registry;
                    scope.spawn(move || registry.load("my_gens", Some(Path::new(path))))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(ModuleLoadError::Conflict { .. })))
        );
    }

    #[test]
    fn test_instantiate() {
        let registry = registry();
        let module = registry.load("my_gens", None).unwrap();
        assert!(module.instantiate("outer.Noop", &AnnotationData::new(parse_quote!(#[Fine]))).is_ok());
        assert!(matches!(
            module.instantiate("outer.Noop", &AnnotationData::new(parse_quote!(#[Broken]))),
            Err(TransformError::GeneratorConstruction { .. })
        ));
        assert!(matches!(
            module.instantiate("Noop", &AnnotationData::new(parse_quote!(#[Fine]))),
            Err(TransformError::GeneratorTypeNotFound { .. })
        ));
        assert_eq!(registry.find_type("outer.Noop"), vec!["My_Gens"]);
    }
}
