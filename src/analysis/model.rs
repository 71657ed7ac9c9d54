use std::rc::Rc;

use syn::Attribute;

use super::catalog::{AnnotationCatalog, AnnotationType};
use super::paths::{PathContext, candidates};
use super::{Annotation, AnnotationData, Symbol, SymbolKind};
use crate::syntax::{Declaration, DeclarationNode, ImportEntry, flatten_use, flatten_uses};

/// Symbol-resolution service for one analyzed document.
#[derive(Debug, Clone)]
pub struct SemanticModel {
    module: String,
    catalog: AnnotationCatalog,
    root_imports: Vec<ImportEntry>,
}

impl SemanticModel {
    /// Build the model for `file`, declared as module `module`. Annotation
    /// types declared in the file itself join a copy of `catalog`.
    pub fn new(module: &str, file: &syn::File, catalog: &AnnotationCatalog) -> syn::Result<Self> {
        let mut catalog = catalog.clone();
        catalog.add_source(module, file)?;
        Ok(Self {
            module: module.to_string(),
            catalog,
            root_imports: flatten_uses(&file.items),
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn catalog(&self) -> &AnnotationCatalog {
        &self.catalog
    }

    /// The symbol `declaration` declares, with its annotations resolved.
    pub fn declared_symbol(&self, declaration: &Declaration) -> Symbol {
        let mut containing = Symbol::module(&self.module);
        for scope in declaration.namespaces() {
            containing = Rc::new(Symbol::nested(
                scope.name(),
                SymbolKind::Namespace,
                containing,
            ));
        }
        if let Some(container) = declaration.container() {
            containing = Rc::new(Symbol::nested(
                container.name.as_str(),
                SymbolKind::Type,
                containing,
            ));
        }

        let annotations = declaration
            .attrs()
            .iter()
            .map(|attr| self.annotation(declaration, attr))
            .collect();
        Symbol::nested(declaration.name(), declared_kind(declaration), containing)
            .with_annotations(annotations)
    }

    fn annotation(&self, declaration: &Declaration, attr: &Attribute) -> Annotation {
        let annotation_type = self.resolve_annotation_type(declaration, attr.path());
        Annotation::new(annotation_type, AnnotationData::new(attr.clone()))
    }

    /// Resolve an attribute path written at `declaration` to an annotation
    /// type. Scopes are tried innermost first, ending at the file root.
    ///
    /// A bare name that no visible import supplies may still match exactly
    /// one bound type; a qualified or imported name never falls back.
    pub fn resolve_annotation_type(
        &self,
        declaration: &Declaration,
        path: &syn::Path,
    ) -> Option<Rc<AnnotationType>> {
        let namespace = declaration.namespace_path();
        let scopes = declaration.namespaces();
        let mut imported = false;

        for depth in (0..=scopes.len()).rev() {
            let scope_imports;
            let imports = match depth.checked_sub(1) {
                Some(index) => {
                    scope_imports = scopes[index]
                        .imports
                        .iter()
                        .flat_map(flatten_use)
                        .collect::<Vec<_>>();
                    &scope_imports
                }
                None => &self.root_imports,
            };
            let ctx = PathContext {
                module: &self.module,
                namespace: &namespace[..depth],
                imports,
            };
            if let Some(found) = self.catalog.lookup(&candidates(path, &ctx)) {
                return Some(found);
            }
            imported |= supplies_name(imports, path);
        }

        if imported || path.leading_colon.is_some() || path.segments.len() != 1 {
            return None;
        }
        self.unique_simple_name(path)
    }

    fn unique_simple_name(&self, path: &syn::Path) -> Option<Rc<AnnotationType>> {
        let name = path.segments.last()?.ident.to_string();
        let mut matches = self
            .catalog
            .iter()
            .filter(|t| t.binding().is_some() && t.simple_name() == name);
        let found = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        self.catalog.get(found.path()).cloned()
    }
}

/// Whether a named import binds the first segment of `path`.
fn supplies_name(imports: &[ImportEntry], path: &syn::Path) -> bool {
    let Some(first) = path.segments.first() else {
        return false;
    };
    imports.iter().any(|import| match import {
        ImportEntry::Named { binding, .. } => first.ident == binding.as_str(),
        ImportEntry::Glob { .. } => false,
    })
}

fn declared_kind(declaration: &Declaration) -> SymbolKind {
    match declaration.node() {
        DeclarationNode::Item(item) => match item {
            syn::Item::Mod(_) => SymbolKind::Namespace,
            syn::Item::Struct(_)
            | syn::Item::Enum(_)
            | syn::Item::Union(_)
            | syn::Item::Trait(_)
            | syn::Item::TraitAlias(_)
            | syn::Item::Type(_)
            | syn::Item::Impl(_) => SymbolKind::Type,
            _ => SymbolKind::Member,
        },
        DeclarationNode::ImplItem(syn::ImplItem::Type(_))
        | DeclarationNode::TraitItem(syn::TraitItem::Type(_)) => SymbolKind::Type,
        _ => SymbolKind::Member,
    }
}
