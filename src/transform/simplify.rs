//! Shortening of fully-qualified paths in the output tree.
//!
//! A path is shortened when a `use` item of the scope it sits in, or the
//! standard prelude, already names a prefix of it. Paths inside `use` items,
//! attributes, visibilities and qualified-self paths are left untouched.

use std::collections::HashSet;

use syn::visit_mut::{self, VisitMut};
use syn::{Ident, Item, Path, PathSegment};

use crate::syntax::{ImportEntry, flatten_uses, item_name};

/// Names every Rust 2021 module gets from the prelude, with the paths they
/// abbreviate. `std`, `core` and `alloc` roots are all accepted.
const PRELUDE: &[(&str, &[&str])] = &[
    ("Option", &["option", "Option"]),
    ("Some", &["option", "Option", "Some"]),
    ("None", &["option", "Option", "None"]),
    ("Result", &["result", "Result"]),
    ("Ok", &["result", "Result", "Ok"]),
    ("Err", &["result", "Result", "Err"]),
    ("String", &["string", "String"]),
    ("ToString", &["string", "ToString"]),
    ("Vec", &["vec", "Vec"]),
    ("Box", &["boxed", "Box"]),
    ("Clone", &["clone", "Clone"]),
    ("Copy", &["marker", "Copy"]),
    ("Send", &["marker", "Send"]),
    ("Sync", &["marker", "Sync"]),
    ("Sized", &["marker", "Sized"]),
    ("Default", &["default", "Default"]),
    ("Drop", &["ops", "Drop"]),
    ("Fn", &["ops", "Fn"]),
    ("FnMut", &["ops", "FnMut"]),
    ("FnOnce", &["ops", "FnOnce"]),
    ("From", &["convert", "From"]),
    ("Into", &["convert", "Into"]),
    ("TryFrom", &["convert", "TryFrom"]),
    ("TryInto", &["convert", "TryInto"]),
    ("AsRef", &["convert", "AsRef"]),
    ("AsMut", &["convert", "AsMut"]),
    ("PartialEq", &["cmp", "PartialEq"]),
    ("Eq", &["cmp", "Eq"]),
    ("PartialOrd", &["cmp", "PartialOrd"]),
    ("Ord", &["cmp", "Ord"]),
    ("Iterator", &["iter", "Iterator"]),
    ("IntoIterator", &["iter", "IntoIterator"]),
    ("Extend", &["iter", "Extend"]),
    ("FromIterator", &["iter", "FromIterator"]),
    ("DoubleEndedIterator", &["iter", "DoubleEndedIterator"]),
    ("ExactSizeIterator", &["iter", "ExactSizeIterator"]),
    ("ToOwned", &["borrow", "ToOwned"]),
];

const PRELUDE_ROOTS: [&str; 3] = ["std", "core", "alloc"];

/// Shorten qualified paths throughout `file` in place.
pub fn simplify(file: &mut syn::File) {
    let mut simplifier = Simplifier {
        scopes: vec![Scope::of(&file.items)],
        skip_next: false,
    };
    simplifier.visit_file_mut(file);
}

struct Scope {
    imports: Vec<ImportEntry>,
    /// Names declared by items of this scope
    locals: HashSet<String>,
}

impl Scope {
    fn of(items: &[Item]) -> Self {
        Self {
            imports: flatten_uses(items),
            locals: items
                .iter()
                .filter(|item| !matches!(item, Item::Use(_) | Item::Impl(_)))
                .filter_map(item_name)
                .collect(),
        }
    }

    /// Whether `name` already refers to something other than `path` here.
    fn is_taken(&self, name: &str, path: &[String]) -> bool {
        self.locals.contains(name)
            || self.imports.iter().any(|import| match import {
                ImportEntry::Named { path: p, binding } => binding == name && p != path,
                ImportEntry::Glob { .. } => false,
            })
    }

    /// Length of the prefix of `full` to drop and the name replacing it.
    /// At most `droppable` leading segments may go.
    fn shorten(&self, full: &[String], droppable: usize) -> Option<(usize, String)> {
        let mut best: Option<(usize, String)> = None;
        let mut consider = |drop: usize, name: &str| {
            if drop <= droppable && best.as_ref().is_none_or(|(d, _)| drop > *d) {
                best = Some((drop, name.to_string()));
            }
        };

        for import in &self.imports {
            match import {
                ImportEntry::Named { path, binding } => {
                    if path.len() > 1 && full.len() >= path.len() && full.starts_with(path) {
                        consider(path.len() - 1, binding);
                    }
                }
                ImportEntry::Glob { prefix } => {
                    if full.len() > prefix.len()
                        && full.starts_with(prefix)
                        && !self.is_taken(&full[prefix.len()], &full[..=prefix.len()])
                    {
                        consider(prefix.len(), &full[prefix.len()]);
                    }
                }
            }
        }

        for (name, tail) in prelude_matches(full) {
            if !self.is_taken(name, &full[..=tail]) {
                consider(tail, name);
            }
        }

        best.filter(|(drop, _)| *drop > 0)
    }
}

/// Prelude names abbreviating a prefix of `full`, each with the index of
/// the segment it replaces.
fn prelude_matches(full: &[String]) -> impl Iterator<Item = (&'static str, usize)> + '_ {
    let rest: &[String] = match full.split_first() {
        Some((root, rest)) if PRELUDE_ROOTS.contains(&root.as_str()) => rest,
        _ => &[],
    };
    PRELUDE.iter().filter_map(move |(name, path)| {
        let matches = !rest.is_empty()
            && rest.len() >= path.len()
            && rest.iter().zip(path.iter()).all(|(a, b)| a == b);
        matches.then_some((*name, path.len()))
    })
}

struct Simplifier {
    scopes: Vec<Scope>,
    skip_next: bool,
}

impl Simplifier {
    fn shorten(&self, path: &mut Path) {
        if path.segments.len() < 2 {
            return;
        }
        let Some(scope) = self.scopes.last() else {
            return;
        };
        let full: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        // Segments carrying generic arguments cannot be dropped.
        let droppable = path
            .segments
            .iter()
            .take_while(|s| s.arguments.is_none())
            .count();
        let Some((drop, name)) = scope.shorten(&full, droppable) else {
            return;
        };

        let mut kept: Vec<PathSegment> = path.segments.iter().skip(drop).cloned().collect();
        if let Some(first) = kept.first_mut() {
            first.ident = Ident::new(&name, first.ident.span());
        }
        path.leading_colon = None;
        path.segments = kept.into_iter().collect();
    }
}

impl VisitMut for Simplifier {
    fn visit_path_mut(&mut self, path: &mut Path) {
        if !std::mem::take(&mut self.skip_next) {
            self.shorten(path);
        }
        visit_mut::visit_path_mut(self, path);
    }

    fn visit_item_mod_mut(&mut self, item: &mut syn::ItemMod) {
        let Some((_, content)) = &mut item.content else {
            return;
        };
        self.scopes.push(Scope::of(content));
        for nested in content.iter_mut() {
            self.visit_item_mut(nested);
        }
        self.scopes.pop();
    }

    fn visit_type_path_mut(&mut self, node: &mut syn::TypePath) {
        if let Some(qself) = &mut node.qself {
            self.visit_qself_mut(qself);
            self.skip_next = true;
        }
        self.visit_path_mut(&mut node.path);
    }

    fn visit_expr_path_mut(&mut self, node: &mut syn::ExprPath) {
        if let Some(qself) = &mut node.qself {
            self.visit_qself_mut(qself);
            self.skip_next = true;
        }
        self.visit_path_mut(&mut node.path);
    }

    fn visit_expr_struct_mut(&mut self, node: &mut syn::ExprStruct) {
        if node.qself.is_none() {
            visit_mut::visit_expr_struct_mut(self, node);
        }
    }

    fn visit_pat_struct_mut(&mut self, node: &mut syn::PatStruct) {
        if node.qself.is_none() {
            visit_mut::visit_pat_struct_mut(self, node);
        }
    }

    fn visit_pat_tuple_struct_mut(&mut self, node: &mut syn::PatTupleStruct) {
        if node.qself.is_none() {
            visit_mut::visit_pat_tuple_struct_mut(self, node);
        }
    }

    fn visit_item_use_mut(&mut self, _: &mut syn::ItemUse) {}
    fn visit_attribute_mut(&mut self, _: &mut syn::Attribute) {}
    fn visit_visibility_mut(&mut self, _: &mut syn::Visibility) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::parse_quote;

    fn simplified(mut file: syn::File) -> String {
        simplify(&mut file);
        file.to_token_stream().to_string()
    }

    fn tokens(file: syn::File) -> String {
        file.to_token_stream().to_string()
    }

    #[test]
    fn test_named_import_and_prelude() {
        let input: syn::File = parse_quote! {
            use std::fmt;
            fn show(v: ::std::vec::Vec<std::string::String>) -> std::fmt::Result {
                std::option::Option::Some(1);
                Ok(())
            }
        };
        let expected: syn::File = parse_quote! {
            use std::fmt;
            fn show(v: Vec<String>) -> fmt::Result {
                Some(1);
                Ok(())
            }
        };
        assert_eq!(simplified(input), tokens(expected));
    }

    #[test]
    fn test_glob_and_shadowing() {
        let input: syn::File = parse_quote! {
            use std::collections::*;
            struct Option;
            fn build() -> std::collections::HashMap<u8, u8> {
                let _ = std::option::Option::<u8>::None;
                std::collections::HashMap::new()
            }
        };
        let expected: syn::File = parse_quote! {
            use std::collections::*;
            struct Option;
            fn build() -> HashMap<u8, u8> {
                let _ = std::option::Option::<u8>::None;
                HashMap::new()
            }
        };
        assert_eq!(simplified(input), tokens(expected));
    }

    #[test]
    fn test_module_scope_uses_own_imports() {
        let input: syn::File = parse_quote! {
            use a::Thing;
            mod inner {
                use b::Other;
                fn f(x: a::Thing, y: b::Other) {}
            }
        };
        let expected: syn::File = parse_quote! {
            use a::Thing;
            mod inner {
                use b::Other;
                fn f(x: a::Thing, y: Other) {}
            }
        };
        assert_eq!(simplified(input), tokens(expected));
    }

    #[test]
    fn test_qualified_self_is_untouched() {
        let input: syn::File = parse_quote! {
            use std::iter::Iterator;
            type Item = <Vec<u8> as std::iter::IntoIterator>::Item;
        };
        let expected = input.clone();
        assert_eq!(simplified(input), tokens(expected));
    }
}
