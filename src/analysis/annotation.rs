use std::rc::Rc;

use proc_macro2::{Span, TokenStream};
use syn::parse::{Parse, Parser};
use syn::spanned::Spanned;
use syn::{Attribute, Meta};

use super::catalog::AnnotationType;
use crate::identity::GeneratorIdentity;

/// A metadata annotation attached to a symbol: the attribute as written plus
/// the annotation type it resolved to, if any.
#[derive(Debug, Clone)]
pub struct Annotation {
    annotation_type: Option<Rc<AnnotationType>>,
    data: AnnotationData,
}

impl Annotation {
    pub fn new(annotation_type: Option<Rc<AnnotationType>>, data: AnnotationData) -> Self {
        Self {
            annotation_type,
            data,
        }
    }

    pub fn annotation_type(&self) -> Option<&AnnotationType> {
        self.annotation_type.as_deref()
    }

    /// Generator named by the annotation type's binding, if it has one.
    pub fn binding(&self) -> Option<&GeneratorIdentity> {
        self.annotation_type()?.binding()
    }

    pub fn data(&self) -> &AnnotationData {
        &self.data
    }
}

/// The raw data of an annotation occurrence, handed to a generator's
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationData {
    attribute: Attribute,
}

impl AnnotationData {
    pub fn new(attribute: Attribute) -> Self {
        Self { attribute }
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn path(&self) -> &syn::Path {
        self.attribute.path()
    }

    /// Last segment of the attribute path, e.g. `Duplicate` for
    /// `#[my_attrs::Duplicate]`.
    pub fn name(&self) -> String {
        self.path()
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_default()
    }

    pub fn span(&self) -> Span {
        self.attribute.span()
    }

    /// `#[Name]` with no arguments.
    pub fn is_marker(&self) -> bool {
        matches!(self.attribute.meta, Meta::Path(_))
    }

    /// Tokens inside the parentheses of `#[Name(...)]`, or the value of
    /// `#[Name = value]`. Empty for a marker.
    pub fn args(&self) -> TokenStream {
        match &self.attribute.meta {
            Meta::Path(_) => TokenStream::new(),
            Meta::List(list) => list.tokens.clone(),
            Meta::NameValue(nv) => quote::ToTokens::to_token_stream(&nv.value),
        }
    }

    pub fn parse_args<T: Parse>(&self) -> syn::Result<T> {
        self.parse_args_with(T::parse)
    }

    pub fn parse_args_with<P: Parser>(&self, parser: P) -> syn::Result<P::Output> {
        parser.parse2(self.args())
    }

    /// First argument when it is a string literal, e.g. `"Copy"` in
    /// `#[Duplicate("Copy")]`.
    pub fn string_arg(&self) -> Option<String> {
        let args = self
            .parse_args_with(
                syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated,
            )
            .ok()?;
        match args.first()? {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Some(s.value()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_marker_and_args() {
        let marker = AnnotationData::new(parse_quote!(#[Serializable]));
        assert!(marker.is_marker());
        assert!(marker.args().is_empty());
        assert_eq!(marker.name(), "Serializable");

        let list = AnnotationData::new(parse_quote!(#[attrs::Duplicate("Copy", 2)]));
        assert!(!list.is_marker());
        assert_eq!(list.name(), "Duplicate");
        assert_eq!(list.string_arg().as_deref(), Some("Copy"));

        let value = AnnotationData::new(parse_quote!(#[Suffix = "Copy"]));
        let lit: syn::LitStr = value.parse_args().unwrap();
        assert_eq!(lit.value(), "Copy");
    }

    #[test]
    fn test_unbound_annotation() {
        let annotation = Annotation::new(None, AnnotationData::new(parse_quote!(#[derive(Debug)])));
        assert!(annotation.annotation_type().is_none());
        assert!(annotation.binding().is_none());
    }
}
