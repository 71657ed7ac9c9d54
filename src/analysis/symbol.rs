use std::fmt;
use std::rc::Rc;

use strum::Display;

use super::Annotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SymbolKind {
    Module,
    Namespace,
    Type,
    Member,
}

/// Semantic identity of a declaration (or of a referenced type): its name,
/// its attached annotations and the chain of entities containing it, ending
/// at a module.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
    containing: Option<Rc<Symbol>>,
    annotations: Vec<Annotation>,
}

impl Symbol {
    pub fn module(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            kind: SymbolKind::Module,
            containing: None,
            annotations: Vec::new(),
        })
    }

    pub fn nested(name: impl Into<String>, kind: SymbolKind, containing: Rc<Symbol>) -> Self {
        Self {
            name: name.into(),
            kind,
            containing: Some(containing),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn containing_symbol(&self) -> Option<&Rc<Symbol>> {
        self.containing.as_ref()
    }

    /// Annotations in declaration order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// This symbol followed by every containing symbol, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Symbol> {
        std::iter::successors(Some(self), |s| s.containing.as_deref())
    }

    /// The module this symbol belongs to (itself for a module symbol).
    pub fn containing_module(&self) -> Option<&Symbol> {
        self.ancestors().find(|s| s.kind == SymbolKind::Module)
    }

    /// Names from the outermost non-module ancestor down to this symbol.
    pub fn qualified_name(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .ancestors()
            .take_while(|s| s.kind != SymbolKind::Module)
            .map(|s| s.name.clone())
            .collect();
        names.reverse();
        names
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(module) = self.containing_module() {
            parts.push(module.name.clone());
        }
        parts.extend(self.qualified_name());
        write!(f, "{}", parts.join("::"))
    }
}
