//! Syntax-level view of an input document: the source text, its
//! declarations and the namespace scopes they sit in.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use proc_macro2::Span;
use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{Attribute, ImplItem, Item, ItemUse, TraitItem};

use crate::error::{TransformError, TransformResult};

pub mod imports;
pub mod walker;

pub use imports::{ImportEntry, flatten_use, flatten_uses};
pub use walker::DeclarationWalker;

/// An input document: where it came from and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> TransformResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parse(&self) -> TransformResult<syn::File> {
        syn::parse_file(&self.text).map_err(|source| TransformError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// One inline `mod` level enclosing a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceScope {
    pub ident: syn::Ident,
    pub vis: syn::Visibility,
    /// `use` items declared directly inside this module
    pub imports: Vec<ItemUse>,
}

impl NamespaceScope {
    pub fn from_item_mod(item: &syn::ItemMod) -> Self {
        let imports = item
            .content
            .iter()
            .flat_map(|(_, items)| items)
            .filter_map(|item| match item {
                Item::Use(u) => Some(u.clone()),
                _ => None,
            })
            .collect();
        Self {
            ident: item.ident.clone(),
            vis: item.vis.clone(),
            imports,
        }
    }

    pub fn name(&self) -> String {
        self.ident.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Impl,
    Trait,
}

/// The `impl` block or `trait` a member declaration belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationNode {
    Item(Item),
    ImplItem(ImplItem),
    TraitItem(TraitItem),
}

/// A declaration reached by descending through the root, inline modules and
/// type containers, together with where it sits.
#[derive(Debug, Clone)]
pub struct Declaration {
    node: DeclarationNode,
    namespaces: Rc<Vec<NamespaceScope>>,
    container: Option<Rc<Container>>,
}

impl Declaration {
    pub(crate) fn new(
        node: DeclarationNode,
        namespaces: Rc<Vec<NamespaceScope>>,
        container: Option<Rc<Container>>,
    ) -> Self {
        Self {
            node,
            namespaces,
            container,
        }
    }

    pub fn node(&self) -> &DeclarationNode {
        &self.node
    }

    /// The declaration as a top-level item, if it is one.
    pub fn item(&self) -> Option<&Item> {
        match &self.node {
            DeclarationNode::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn attrs(&self) -> &[Attribute] {
        match &self.node {
            DeclarationNode::Item(item) => item_attrs(item),
            DeclarationNode::ImplItem(item) => impl_item_attrs(item),
            DeclarationNode::TraitItem(item) => trait_item_attrs(item),
        }
    }

    pub fn name(&self) -> String {
        match &self.node {
            DeclarationNode::Item(item) => item_name(item).unwrap_or_default(),
            DeclarationNode::ImplItem(item) => impl_item_name(item).unwrap_or_default(),
            DeclarationNode::TraitItem(item) => trait_item_name(item).unwrap_or_default(),
        }
    }

    pub fn span(&self) -> Span {
        match &self.node {
            DeclarationNode::Item(item) => item.span(),
            DeclarationNode::ImplItem(item) => item.span(),
            DeclarationNode::TraitItem(item) => item.span(),
        }
    }

    /// Enclosing inline modules, outermost first.
    pub fn namespaces(&self) -> &[NamespaceScope] {
        &self.namespaces
    }

    pub(crate) fn namespace_chain(&self) -> Rc<Vec<NamespaceScope>> {
        Rc::clone(&self.namespaces)
    }

    pub fn nearest_namespace(&self) -> Option<&NamespaceScope> {
        self.namespaces.last()
    }

    pub fn namespace_path(&self) -> Vec<String> {
        self.namespaces.iter().map(NamespaceScope::name).collect()
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_deref()
    }

    /// `ns::Container::name`, for messages.
    pub fn display_path(&self) -> String {
        let mut parts = self.namespace_path();
        if let Some(container) = &self.container {
            parts.push(container.name.clone());
        }
        parts.push(self.name());
        parts.join("::")
    }
}

/// The `use` items at the root of `file`.
pub fn file_imports(file: &syn::File) -> Vec<ItemUse> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Use(u) => Some(u.clone()),
            _ => None,
        })
        .collect()
}

/// Whether `item` declares a named program entity. Imports, `extern crate`,
/// foreign blocks, bare macro invocations and verbatim tokens do not.
pub fn is_declaration(item: &Item) -> bool {
    match item {
        Item::Use(_) | Item::ExternCrate(_) | Item::ForeignMod(_) | Item::Verbatim(_) => false,
        Item::Macro(m) => m.ident.is_some(),
        _ => true,
    }
}

pub fn item_name(item: &Item) -> Option<String> {
    let ident = match item {
        Item::Const(i) => &i.ident,
        Item::Enum(i) => &i.ident,
        Item::ExternCrate(i) => &i.ident,
        Item::Fn(i) => &i.sig.ident,
        Item::Macro(i) => i.ident.as_ref()?,
        Item::Mod(i) => &i.ident,
        Item::Static(i) => &i.ident,
        Item::Struct(i) => &i.ident,
        Item::Trait(i) => &i.ident,
        Item::TraitAlias(i) => &i.ident,
        Item::Type(i) => &i.ident,
        Item::Union(i) => &i.ident,
        Item::Impl(i) => return Some(type_name(&i.self_ty)),
        _ => return None,
    };
    Some(ident.to_string())
}

fn impl_item_name(item: &ImplItem) -> Option<String> {
    match item {
        ImplItem::Const(i) => Some(i.ident.to_string()),
        ImplItem::Fn(i) => Some(i.sig.ident.to_string()),
        ImplItem::Type(i) => Some(i.ident.to_string()),
        _ => None,
    }
}

fn trait_item_name(item: &TraitItem) -> Option<String> {
    match item {
        TraitItem::Const(i) => Some(i.ident.to_string()),
        TraitItem::Fn(i) => Some(i.sig.ident.to_string()),
        TraitItem::Type(i) => Some(i.ident.to_string()),
        _ => None,
    }
}

/// Last path segment of a type, or its tokens for anything that is not a path.
pub fn type_name(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(p) => p
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_default(),
        syn::Type::Reference(r) => type_name(&r.elem),
        other => other.to_token_stream().to_string(),
    }
}

pub fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Const(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::ExternCrate(i) => &i.attrs,
        Item::Fn(i) => &i.attrs,
        Item::ForeignMod(i) => &i.attrs,
        Item::Impl(i) => &i.attrs,
        Item::Macro(i) => &i.attrs,
        Item::Mod(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        Item::Trait(i) => &i.attrs,
        Item::TraitAlias(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        Item::Union(i) => &i.attrs,
        Item::Use(i) => &i.attrs,
        _ => &[],
    }
}

fn impl_item_attrs(item: &ImplItem) -> &[Attribute] {
    match item {
        ImplItem::Const(i) => &i.attrs,
        ImplItem::Fn(i) => &i.attrs,
        ImplItem::Type(i) => &i.attrs,
        ImplItem::Macro(i) => &i.attrs,
        _ => &[],
    }
}

fn trait_item_attrs(item: &TraitItem) -> &[Attribute] {
    match item {
        TraitItem::Const(i) => &i.attrs,
        TraitItem::Fn(i) => &i.attrs,
        TraitItem::Type(i) => &i.attrs,
        TraitItem::Macro(i) => &i.attrs,
        _ => &[],
    }
}
