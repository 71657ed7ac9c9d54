//! Folding generated groups into the output tree.

use std::rc::Rc;

use syn::{Item, ItemUse};

use crate::syntax::NamespaceScope;

/// Comment lines placed above every generated document.
pub const HEADER_LINES: [&str; 8] = [
    "// ------------------------------------------------------------------------------",
    "// <auto-generated>",
    "//     This code was generated by a tool.",
    "//  ",
    "//     Changes to this file may cause incorrect behavior and will be lost if",
    "//     the code is regenerated.",
    "// </auto-generated>",
    "// ------------------------------------------------------------------------------",
];

/// The header joined with `newline`, including the final line break.
pub fn header(newline: &str) -> String {
    let mut out = String::new();
    for line in HEADER_LINES {
        out.push_str(line);
        out.push_str(newline);
    }
    out
}

/// Items one generator produced for one declaration, and the namespace chain
/// of that declaration.
#[derive(Debug, Clone)]
pub struct GeneratedGroup {
    namespaces: Rc<Vec<NamespaceScope>>,
    items: Vec<Item>,
}

impl GeneratedGroup {
    pub fn new(namespaces: Rc<Vec<NamespaceScope>>, items: Vec<Item>) -> Self {
        Self { namespaces, items }
    }

    pub fn namespaces(&self) -> &[NamespaceScope] {
        &self.namespaces
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

enum Entry {
    Item(Item),
    Module(ModuleNode),
}

struct ModuleNode {
    scope: NamespaceScope,
    entries: Vec<Entry>,
}

/// Place `items` under `chain`, reusing a module already opened for the
/// same name at each level.
fn insert(entries: &mut Vec<Entry>, chain: &[NamespaceScope], items: Vec<Item>) {
    let Some((first, rest)) = chain.split_first() else {
        entries.extend(items.into_iter().map(Entry::Item));
        return;
    };

    let existing = entries
        .iter()
        .position(|entry| matches!(entry, Entry::Module(m) if m.scope.ident == first.ident));
    let index = existing.unwrap_or_else(|| {
        entries.push(Entry::Module(ModuleNode {
            scope: first.clone(),
            entries: Vec::new(),
        }));
        entries.len() - 1
    });
    if let Entry::Module(child) = &mut entries[index] {
        insert(&mut child.entries, rest, items);
    }
}

fn into_items(entries: Vec<Entry>) -> Vec<Item> {
    entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Item(item) => item,
            Entry::Module(module) => module.into_item_mod(),
        })
        .collect()
}

impl ModuleNode {
    fn into_item_mod(self) -> Item {
        let NamespaceScope { ident, vis, imports } = self.scope;
        let mut content: Vec<Item> = imports.into_iter().map(Item::Use).collect();
        content.extend(into_items(self.entries));
        Item::Mod(syn::ItemMod {
            attrs: Vec::new(),
            vis,
            unsafety: None,
            mod_token: Default::default(),
            ident,
            content: Some((Default::default(), content)),
            semi: None,
        })
    }
}

/// Build the output tree: the carried-over root imports followed by every
/// group, in order.
///
/// A group from a declaration inside inline modules is wrapped in the same
/// module chain, each level bringing its own `use` items. Groups sharing a
/// chain land in one wrapper placed where that chain first appears; empty
/// groups contribute nothing.
pub fn assemble(imports: Vec<ItemUse>, groups: impl IntoIterator<Item = GeneratedGroup>) -> syn::File {
    let mut entries = Vec::new();
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        insert(&mut entries, &group.namespaces, group.items);
    }

    let mut items: Vec<Item> = imports.into_iter().map(Item::Use).collect();
    items.extend(into_items(entries));
    syn::File {
        shebang: None,
        attrs: Vec::new(),
        items,
    }
}
