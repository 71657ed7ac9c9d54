//! How a generator-binding annotation names its generator.

use std::fmt;
use std::rc::Rc;

use derive_more::From;

use crate::analysis::{Symbol, SymbolKind};

/// A generator named either by a literal string or by a symbolic type
/// reference that still has to be matched against the referenced modules.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum GeneratorIdentity {
    /// `"Outer.Inner, module"`, or `"Outer.Inner"` to search every module
    Name(String),
    Reference(TypeReference),
    /// A generator type path that names no reachable type, as written
    #[from(ignore)]
    Unresolved(String),
}

impl fmt::Display for GeneratorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorIdentity::Name(name) | GeneratorIdentity::Unresolved(name) => f.write_str(name),
            GeneratorIdentity::Reference(reference) => {
                write!(f, "{}, {}", reference.dotted_name(), reference.module_name())
            }
        }
    }
}

/// Analyzer's view of a generator type: a symbol whose containing chain ends
/// at the module that owns it.
#[derive(Debug, Clone)]
pub struct TypeReference {
    symbol: Rc<Symbol>,
}

impl TypeReference {
    pub fn from_symbol(symbol: Rc<Symbol>) -> Self {
        Self { symbol }
    }

    /// Build the chain `module -> path[..n-1] (namespaces) -> path[n-1] (type)`.
    ///
    /// Returns `None` for an empty path.
    pub fn new<S: AsRef<str>>(module: &str, path: &[S]) -> Option<Self> {
        let (last, parents) = path.split_last()?;
        let mut containing = Symbol::module(module);
        for name in parents {
            containing = Rc::new(Symbol::nested(
                name.as_ref(),
                SymbolKind::Namespace,
                containing,
            ));
        }
        Some(Self::from_symbol(Rc::new(Symbol::nested(
            last.as_ref(),
            SymbolKind::Type,
            containing,
        ))))
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Simple name of the owning module.
    pub fn module_name(&self) -> &str {
        self.symbol
            .containing_module()
            .map(Symbol::name)
            .unwrap_or_default()
    }

    /// Fully-qualified name inside the module, levels joined by `.`.
    ///
    /// Walks from the type itself up to (not including) the module, prefixing
    /// each ancestor, so `my_gens::Outer::Inner` becomes `Outer.Inner`.
    pub fn dotted_name(&self) -> String {
        let mut name = self.symbol.name().to_string();
        let mut current = self.symbol.containing_symbol();
        while let Some(symbol) = current {
            if symbol.kind() == SymbolKind::Module {
                break;
            }
            name = format!("{}.{}", symbol.name(), name);
            current = symbol.containing_symbol();
        }
        name
    }
}

impl PartialEq for TypeReference {
    fn eq(&self, other: &Self) -> bool {
        self.module_name() == other.module_name() && self.dotted_name() == other.dotted_name()
    }
}

impl Eq for TypeReference {}

/// A literal generator name split into its dotted type name and optional
/// module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralName {
    pub type_name: String,
    pub module: Option<String>,
}

impl LiteralName {
    /// Split `"Outer.Inner, module"` at the first comma. Whitespace around both
    /// parts is ignored; an empty module part counts as absent.
    pub fn parse(literal: &str) -> Self {
        let (type_name, module) = match literal.split_once(',') {
            Some((type_name, module)) => (type_name, Some(module.trim())),
            None => (literal, None),
        };
        Self {
            type_name: type_name.trim().to_string(),
            module: module.filter(|m| !m.is_empty()).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_nested_dotted_name() {
        let reference = TypeReference::new("M", &["Outer", "Inner"]).unwrap();
        assert_eq!(reference.dotted_name(), "Outer.Inner");
        assert_eq!(reference.module_name(), "M");
        assert_eq!(
            GeneratorIdentity::from(reference).to_string(),
            "Outer.Inner, M"
        );
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(TypeReference::new::<&str>("M", &[]).is_none());
    }

    #[test]
    fn test_literal_parse() {
        assert_eq!(
            LiteralName::parse(" outer.Gen ,  my_gens "),
            LiteralName {
                type_name: "outer.Gen".into(),
                module: Some("my_gens".into())
            }
        );
        assert_eq!(
            LiteralName::parse("Gen"),
            LiteralName {
                type_name: "Gen".into(),
                module: None
            }
        );
        assert_eq!(LiteralName::parse("Gen,").module, None);
    }

    quickcheck! {
        fn prop_dotted_name_reassembles_outer_to_inner(parts: Vec<u8>) -> bool {
            // Derive identifier-like names from arbitrary bytes.
            let names: Vec<String> = parts.iter().map(|b| format!("N{b}")).collect();
            match TypeReference::new("module", &names) {
                None => names.is_empty(),
                Some(reference) => reference.dotted_name() == names.join("."),
            }
        }
    }
}
