//! Flattening of `use` trees into the names they bring into scope.

use syn::{Item, ItemUse, UseTree};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportEntry {
    /// `use a::b::C;` or `use a::b::C as D;`, where `binding` is `C` or `D`
    Named { path: Vec<String>, binding: String },
    /// `use a::b::*;`
    Glob { prefix: Vec<String> },
}

impl ImportEntry {
    /// Expand `segments` through this import, if the import can supply the
    /// first segment. Glob imports always offer a candidate.
    pub fn expand(&self, segments: &[String]) -> Option<Vec<String>> {
        let (first, rest) = segments.split_first()?;
        match self {
            ImportEntry::Named { path, binding } if binding == first => {
                Some(path.iter().chain(rest).cloned().collect())
            }
            ImportEntry::Named { .. } => None,
            ImportEntry::Glob { prefix } => Some(prefix.iter().chain(segments).cloned().collect()),
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, ImportEntry::Glob { .. })
    }
}

/// All entries of one `use` item, in source order. Underscore imports
/// (`use Trait as _;`) bind no name and are dropped.
pub fn flatten_use(item: &ItemUse) -> Vec<ImportEntry> {
    let mut entries = Vec::new();
    walk(&item.tree, &mut Vec::new(), &mut entries);
    entries
}

/// Entries of every `use` item in `items`.
pub fn flatten_uses<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<ImportEntry> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Item::Use(item_use) => Some(flatten_use(item_use)),
            _ => None,
        })
        .flatten()
        .collect()
}

fn walk(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Vec<ImportEntry>) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            walk(&p.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(n) if n.ident == "self" => {
            if let Some(last) = prefix.last() {
                out.push(ImportEntry::Named {
                    path: prefix.clone(),
                    binding: last.clone(),
                });
            }
        }
        UseTree::Name(n) => {
            let name = n.ident.to_string();
            let mut path = prefix.clone();
            path.push(name.clone());
            out.push(ImportEntry::Named {
                path,
                binding: name,
            });
        }
        UseTree::Rename(r) => {
            if r.rename == "_" {
                return;
            }
            let mut path = prefix.clone();
            if r.ident != "self" {
                path.push(r.ident.to_string());
            }
            out.push(ImportEntry::Named {
                path,
                binding: r.rename.to_string(),
            });
        }
        UseTree::Glob(_) => out.push(ImportEntry::Glob {
            prefix: prefix.clone(),
        }),
        UseTree::Group(g) => {
            for tree in &g.items {
                walk(tree, prefix, out);
            }
        }
    }
}
