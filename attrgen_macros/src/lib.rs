use proc_macro::TokenStream;
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::{Item, LitStr, Token};

/// First argument of `#[generator_binding(...)]`.
enum Binding {
    Name(LitStr),
    Type(syn::Path),
}

impl Parse for Binding {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            Ok(Binding::Name(input.parse()?))
        } else {
            Ok(Binding::Type(input.parse()?))
        }
    }
}

fn validate(args: proc_macro2::TokenStream, item: &Item) -> syn::Result<()> {
    let span = proc_macro2::Span::call_site();
    let bindings = Punctuated::<Binding, Token![,]>::parse_terminated.parse2(args)?;
    match bindings.first() {
        None => Err(syn::Error::new(
            span,
            "expected a generator name like \"Outer.Inner, module\" or a generator type path",
        )),
        Some(Binding::Name(name)) => {
            let value = name.value();
            let type_name = value.split(',').next().unwrap_or_default().trim();
            if type_name.is_empty() {
                Err(syn::Error::new(name.span(), "generator name is empty"))
            } else {
                Ok(())
            }
        }
        Some(Binding::Type(path)) => match path.segments.iter().find(|s| !s.arguments.is_none()) {
            Some(segment) => Err(syn::Error::new(
                segment.ident.span(),
                "generator type path must not carry generic arguments",
            )),
            None => Ok(()),
        },
    }?;

    match item {
        Item::Struct(_) | Item::Enum(_) | Item::Union(_) => Ok(()),
        _ => Err(syn::Error::new(
            span,
            "generator_binding can only be placed on a struct, enum or union",
        )),
    }
}

/// Binds an annotation type to the generator that handles it.
///
/// The attribute itself expands to nothing: the annotated type is emitted
/// unchanged. It is read by the transform pipeline when the annotation
/// type's source is scanned.
///
/// # Forms
///
/// - `#[generator_binding("Outer.Inner, module")]` - literal dotted type name
///   and generator module; the module part may be omitted to search every
///   registered module
/// - `#[generator_binding(module::Outer::Inner)]` - type path resolved like
///   any other path in the declaring file
///
/// Only the first argument is used.
///
/// # Examples
///
/// ```
/// use attrgen_macros::generator_binding;
///
/// #[generator_binding("Builder, my_gens")]
/// pub struct Build;
/// ```
#[proc_macro_attribute]
pub fn generator_binding(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = match syn::parse::<Item>(input.clone()) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };
    match validate(args.into(), &item) {
        Ok(()) => input,
        Err(e) => {
            let mut out = proc_macro2::TokenStream::from(input);
            out.extend(e.to_compile_error());
            out.into()
        }
    }
}
