//! Resolution of written paths to module-qualified candidates.
//!
//! A qualified path always starts with a module name, e.g.
//! `["my_attrs", "outer", "Duplicate"]`.

use crate::syntax::ImportEntry;

/// Where a path was written.
pub(crate) struct PathContext<'a> {
    pub module: &'a str,
    pub namespace: &'a [String],
    /// Imports visible in the innermost scope only
    pub imports: &'a [ImportEntry],
}

pub(crate) fn segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

/// Every qualified path `path` may denote, most specific first: keyword
/// relative paths, named imports, the current namespace, glob imports, then
/// the first segment taken as a module name.
pub(crate) fn candidates(path: &syn::Path, ctx: &PathContext<'_>) -> Vec<Vec<String>> {
    candidates_for(&segments(path), path.leading_colon.is_some(), ctx)
}

pub(crate) fn candidates_for(
    segments: &[String],
    absolute: bool,
    ctx: &PathContext<'_>,
) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = Vec::new();
    let Some(first) = segments.first() else {
        return out;
    };

    if absolute {
        if segments.len() > 1 {
            out.push(segments.to_vec());
        }
        return out;
    }
    if is_keyword(first) {
        out.extend(normalize_keyword(segments, ctx));
        return out;
    }

    for import in ctx.imports.iter().filter(|i| !i.is_glob()) {
        if let Some(expanded) = import.expand(segments) {
            out.extend(normalize_import(expanded, ctx));
        }
    }

    let mut local = vec![ctx.module.to_string()];
    local.extend_from_slice(ctx.namespace);
    local.extend_from_slice(segments);
    out.push(local);

    for import in ctx.imports.iter().filter(|i| i.is_glob()) {
        if let Some(expanded) = import.expand(segments) {
            out.extend(normalize_import(expanded, ctx));
        }
    }

    if segments.len() > 1 {
        out.push(segments.to_vec());
    }

    let mut seen = std::collections::HashSet::new();
    out.retain(|candidate| seen.insert(candidate.clone()));
    out
}

fn is_keyword(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// `crate::a`, `self::a`, `super::super::a` against the current namespace.
/// `None` when `super` climbs past the module root.
fn normalize_keyword(segments: &[String], ctx: &PathContext<'_>) -> Option<Vec<String>> {
    let mut resolved = vec![ctx.module.to_string()];
    match segments.first().map(String::as_str) {
        Some("crate") => resolved.extend_from_slice(&segments[1..]),
        Some("self") => {
            resolved.extend_from_slice(ctx.namespace);
            resolved.extend_from_slice(&segments[1..]);
        }
        Some("super") => {
            let climbs = segments.iter().take_while(|s| *s == "super").count();
            let depth = ctx.namespace.len().checked_sub(climbs)?;
            resolved.extend_from_slice(&ctx.namespace[..depth]);
            resolved.extend_from_slice(&segments[climbs..]);
        }
        _ => return None,
    }
    (resolved.len() > 1).then_some(resolved)
}

/// An expanded import path is keyword-relative, relative to the current
/// namespace, or rooted at an external module.
fn normalize_import(expanded: Vec<String>, ctx: &PathContext<'_>) -> Vec<Vec<String>> {
    match expanded.first() {
        Some(first) if is_keyword(first) => normalize_keyword(&expanded, ctx).into_iter().collect(),
        Some(_) => {
            let mut local = vec![ctx.module.to_string()];
            local.extend_from_slice(ctx.namespace);
            local.extend_from_slice(&expanded);
            if expanded.len() > 1 {
                vec![local, expanded]
            } else {
                vec![local]
            }
        }
        None => Vec::new(),
    }
}
