//! The annotation lookup table.
//!
//! Built once from annotation sources (and the input document itself), it
//! maps every known annotation type to the generator its
//! `#[generator_binding(...)]` attribute names, so discovery never has to
//! re-inspect annotation types per call.

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use log::{debug, warn};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{Attribute, Meta, Token};

use super::paths::{PathContext, candidates, segments};
use crate::identity::{GeneratorIdentity, TypeReference};
use crate::syntax::{ImportEntry, flatten_uses};

/// Name of the attribute that binds an annotation type to its generator.
pub const BINDING_ATTRIBUTE: &str = "generator_binding";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationType {
    path: Vec<String>,
    binding: Option<GeneratorIdentity>,
}

impl AnnotationType {
    pub fn new(path: Vec<String>, binding: Option<GeneratorIdentity>) -> Self {
        Self { path, binding }
    }

    /// Module-qualified path, module first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn module(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    pub fn simple_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn binding(&self) -> Option<&GeneratorIdentity> {
        self.binding.as_ref()
    }

    pub fn qualified_name(&self) -> String {
        self.path.join("::")
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationCatalog {
    types: BTreeMap<Vec<String>, Rc<AnnotationType>>,
}

impl AnnotationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type; the first registration of a path wins.
    pub fn insert(&mut self, annotation_type: AnnotationType) -> Rc<AnnotationType> {
        let key = annotation_type.path.clone();
        if let Some(existing) = self.types.get(&key) {
            if existing.binding != annotation_type.binding {
                warn!(
                    "AnnotationCatalog: Ignoring second definition of {}",
                    annotation_type.qualified_name()
                );
            }
            return Rc::clone(existing);
        }
        let annotation_type = Rc::new(annotation_type);
        self.types.insert(key, Rc::clone(&annotation_type));
        annotation_type
    }

    /// Register `module::path::Name` programmatically.
    pub fn register(
        &mut self,
        qualified_name: &str,
        binding: impl Into<GeneratorIdentity>,
    ) -> Rc<AnnotationType> {
        let path = qualified_name
            .split("::")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self.insert(AnnotationType::new(path, Some(binding.into())))
    }

    /// Scan `file`, declared as module `module`, for annotation types.
    ///
    /// Every struct, enum and union reachable through inline modules is
    /// recorded; those carrying `#[generator_binding(...)]` get a binding.
    /// Returns the number of newly recorded types.
    pub fn add_source(&mut self, module: &str, file: &syn::File) -> syn::Result<usize> {
        let mut declared = HashSet::new();
        collect_declared(module, &file.items, &mut Vec::new(), &mut declared);

        let mut scanner = AnnotationScanner {
            module,
            namespace: Vec::new(),
            imports: vec![flatten_uses(&file.items)],
            declared: &declared,
            found: Vec::new(),
            errors: None,
        };
        scanner.visit_file(file);
        if let Some(errors) = scanner.errors {
            return Err(errors);
        }

        let before = self.types.len();
        for annotation_type in scanner.found {
            self.insert(annotation_type);
        }
        let added = self.types.len() - before;
        debug!("AnnotationCatalog: Recorded {added} annotation type(s) from {module}");
        Ok(added)
    }

    pub fn get(&self, path: &[String]) -> Option<&Rc<AnnotationType>> {
        self.types.get(path)
    }

    /// First candidate path that names a known annotation type.
    pub fn lookup(&self, candidates: &[Vec<String>]) -> Option<Rc<AnnotationType>> {
        candidates
            .iter()
            .find_map(|candidate| self.types.get(candidate))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationType> {
        self.types.values().map(Rc::as_ref)
    }

    pub fn bound_types(&self) -> impl Iterator<Item = &AnnotationType> {
        self.iter().filter(|t| t.binding.is_some())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

pub fn is_binding_attribute(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|s| s.ident == BINDING_ATTRIBUTE)
}

/// Qualified paths of every type and inline module declared in `items`.
fn collect_declared(
    module: &str,
    items: &[syn::Item],
    namespace: &mut Vec<String>,
    out: &mut HashSet<Vec<String>>,
) {
    for item in items {
        let Some(name) = crate::syntax::item_name(item) else {
            continue;
        };
        if matches!(item, syn::Item::Impl(_)) {
            continue;
        }
        let mut path = vec![module.to_string()];
        path.extend(namespace.iter().cloned());
        path.push(name.clone());
        out.insert(path);

        if let syn::Item::Mod(m) = item
            && let Some((_, content)) = &m.content
        {
            namespace.push(name);
            collect_declared(module, content, namespace, out);
            namespace.pop();
        }
    }
}

/// Argument of `#[generator_binding(...)]`.
enum BindingArg {
    Name(syn::LitStr),
    Type(syn::Path),
}

impl Parse for BindingArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(syn::LitStr) {
            Ok(BindingArg::Name(input.parse()?))
        } else {
            Ok(BindingArg::Type(input.parse()?))
        }
    }
}

struct AnnotationScanner<'a> {
    module: &'a str,
    namespace: Vec<String>,
    imports: Vec<Vec<ImportEntry>>,
    declared: &'a HashSet<Vec<String>>,
    found: Vec<AnnotationType>,
    errors: Option<syn::Error>,
}

impl AnnotationScanner<'_> {
    fn record(&mut self, ident: &syn::Ident, attrs: &[Attribute]) {
        let mut path = vec![self.module.to_string()];
        path.extend(self.namespace.iter().cloned());
        path.push(ident.to_string());

        match self.binding(attrs) {
            Ok(binding) => self.found.push(AnnotationType::new(path, binding)),
            Err(e) => match &mut self.errors {
                Some(errors) => errors.combine(e),
                None => self.errors = Some(e),
            },
        }
    }

    fn binding(&self, attrs: &[Attribute]) -> syn::Result<Option<GeneratorIdentity>> {
        let mut bindings = attrs.iter().filter(|a| is_binding_attribute(a));
        let Some(attr) = bindings.next() else {
            return Ok(None);
        };
        if bindings.next().is_some() {
            warn!("AnnotationCatalog: Multiple {BINDING_ATTRIBUTE} attributes, using the first");
        }

        let first = match &attr.meta {
            Meta::List(list) => list
                .parse_args_with(Punctuated::<BindingArg, Token![,]>::parse_terminated)?
                .into_iter()
                .next(),
            Meta::NameValue(nv) => Some(syn::parse2::<BindingArg>(quote::ToTokens::to_token_stream(
                &nv.value,
            ))?),
            Meta::Path(_) => None,
        };

        match first {
            Some(BindingArg::Name(name)) => Ok(Some(GeneratorIdentity::Name(name.value()))),
            Some(BindingArg::Type(path)) => Ok(Some(self.reference(&path))),
            None => Err(syn::Error::new_spanned(
                attr,
                "generator_binding expects a generator name or a generator type path",
            )),
        }
    }

    /// Resolve a generator type path to a symbolic reference. A candidate in
    /// this module must be declared here; anything else is taken as external.
    ///
    /// A path naming nothing is kept as written and fails only when resolved.
    fn reference(&self, path: &syn::Path) -> GeneratorIdentity {
        let imports = self.imports.last().map(Vec::as_slice).unwrap_or_default();
        let ctx = PathContext {
            module: self.module,
            namespace: &self.namespace,
            imports,
        };
        let found = candidates(path, &ctx)
            .into_iter()
            .find(|c| c.first().map(String::as_str) != Some(self.module) || self.declared.contains(c))
            .and_then(|c| TypeReference::new(&c[0], &c[1..]));
        match found {
            Some(reference) => reference.into(),
            None => {
                let written = segments(path).join("::");
                warn!("AnnotationCatalog: Cannot resolve generator type path {written} in {}", self.module);
                GeneratorIdentity::Unresolved(written)
            }
        }
    }
}

impl<'ast> Visit<'ast> for AnnotationScanner<'_> {
    fn visit_item_struct(&mut self, item: &'ast syn::ItemStruct) {
        self.record(&item.ident, &item.attrs);
    }

    fn visit_item_enum(&mut self, item: &'ast syn::ItemEnum) {
        self.record(&item.ident, &item.attrs);
    }

    fn visit_item_union(&mut self, item: &'ast syn::ItemUnion) {
        self.record(&item.ident, &item.attrs);
    }

    fn visit_item_mod(&mut self, item: &'ast syn::ItemMod) {
        let Some((_, content)) = &item.content else {
            return;
        };
        self.namespace.push(item.ident.to_string());
        self.imports.push(flatten_uses(content));
        for nested in content {
            self.visit_item(nested);
        }
        self.imports.pop();
        self.namespace.pop();
    }

    // Types declared in bodies or containers are not nameable annotation types.
    fn visit_item_fn(&mut self, _: &'ast syn::ItemFn) {}
    fn visit_item_impl(&mut self, _: &'ast syn::ItemImpl) {}
    fn visit_item_trait(&mut self, _: &'ast syn::ItemTrait) {}
    fn visit_item_const(&mut self, _: &'ast syn::ItemConst) {}
    fn visit_item_static(&mut self, _: &'ast syn::ItemStatic) {}
}
