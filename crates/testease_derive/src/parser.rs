//! Attribute arguments and method-shape analysis.

use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{
    Attribute, FnArg, GenericArgument, LitBool, LitStr, Meta, Path, PathArguments, ReturnType, Signature, Token, Type,
};

// ============================================================================
// Marker arguments
// ============================================================================

/// `name = "..."`, `skip`, `skip = true|false`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkerArgs {
    pub name: Option<String>,
    pub skip: bool,
}

impl MarkerArgs {
    pub fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            self.name = Some(lit.value());
            Ok(())
        } else if meta.path.is_ident("skip") {
            if meta.input.peek(Token![=]) {
                let lit: LitBool = meta.value()?.parse()?;
                self.skip = lit.value;
            } else {
                self.skip = true;
            }
            Ok(())
        } else {
            Err(meta.error("unsupported test argument, expected `name = \"...\"` or `skip`"))
        }
    }

    /// Parse the marker carried by an inner `#[test]` / `#[test(...)]` attribute.
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut args = MarkerArgs::default();
        match &attr.meta {
            Meta::Path(_) => {}
            Meta::List(_) => attr.parse_nested_meta(|meta| args.parse_meta(meta))?,
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(nv, "expected `#[test]` or `#[test(name = \"...\", skip)]`"));
            }
        }
        Ok(args)
    }
}

/// Whether `attr` is a test marker inside a fixture block: `#[test]` or `#[testease::test]`.
pub fn is_test_attribute(attr: &Attribute) -> bool {
    let path = attr.path();
    path.is_ident("test")
        || (path.segments.len() == 2 && path.segments[0].ident == "testease" && path.segments[1].ident == "test")
}

/// `factory = path` or `try_factory = path`
#[derive(Debug, Default, Clone)]
pub struct FixtureArgs {
    pub factory: Option<Factory>,
}

#[derive(Debug, Clone)]
pub enum Factory {
    /// `fn() -> Self`
    Infallible(Path),
    /// `fn() -> Result<Self, testease::Failure>`
    Fallible(Path),
}

impl FixtureArgs {
    pub fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let fallible = if meta.path.is_ident("factory") {
            false
        } else if meta.path.is_ident("try_factory") {
            true
        } else {
            return Err(meta.error("unsupported fixture argument, expected `factory = path` or `try_factory = path`"));
        };
        if self.factory.is_some() {
            return Err(meta.error("only one factory may be given"));
        }
        let path: Path = meta.value()?.parse()?;
        self.factory = Some(if fallible {
            Factory::Fallible(path)
        } else {
            Factory::Infallible(path)
        });
        Ok(())
    }
}

// ============================================================================
// Method shape
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    None,
    Ref,
    RefMut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    Unit,
    Outcome,
    Value(String),
}

/// What the registration needs to know about a test function's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub receiver: Receiver,
    /// Parameter type spellings, receiver excluded.
    pub params: Vec<String>,
    pub returns: ReturnShape,
}

impl Shape {
    /// Analyse `sig`. Shapes that cannot be referenced as a plain function pointer at all
    /// (async, generic, `self` by value) are compile errors; anything else is recorded.
    pub fn analyse(sig: &Signature) -> syn::Result<Self> {
        if let Some(asyncness) = &sig.asyncness {
            return Err(syn::Error::new(asyncness.span(), "test functions may not be `async`"));
        }
        if !sig.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(&sig.generics, "test functions may not be generic"));
        }
        if let Some(variadic) = &sig.variadic {
            return Err(syn::Error::new_spanned(variadic, "test functions may not be variadic"));
        }

        let mut receiver = Receiver::None;
        let mut params = Vec::new();
        for input in &sig.inputs {
            match input {
                FnArg::Receiver(recv) => {
                    receiver = match (&recv.reference, &recv.mutability) {
                        (Some(_), None) => Receiver::Ref,
                        (Some(_), Some(_)) => Receiver::RefMut,
                        (None, _) => {
                            return Err(syn::Error::new_spanned(
                                recv,
                                "test methods take `&self` or `&mut self`, not `self`",
                            ));
                        }
                    };
                    if recv.colon_token.is_some() {
                        return Err(syn::Error::new_spanned(
                            recv,
                            "test methods take `&self` or `&mut self`, not a typed receiver",
                        ));
                    }
                }
                FnArg::Typed(pat) => params.push(type_spelling(&pat.ty)),
            }
        }

        Ok(Shape {
            receiver,
            params,
            returns: return_shape(&sig.output),
        })
    }

    pub fn is_invocable(&self) -> bool {
        self.params.is_empty() && !matches!(self.returns, ReturnShape::Value(_))
    }
}

fn return_shape(output: &ReturnType) -> ReturnShape {
    let ty = match output {
        ReturnType::Default => return ReturnShape::Unit,
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    match ty {
        Type::Tuple(tuple) if tuple.elems.is_empty() => ReturnShape::Unit,
        Type::Paren(inner) => return_shape(&ReturnType::Type(Default::default(), inner.elem.clone())),
        Type::Path(path) if path.qself.is_none() && is_outcome(&path.path) => ReturnShape::Outcome,
        other => ReturnShape::Value(type_spelling(other)),
    }
}

/// `Outcome`, or `Result<(), Failure>` spelled with any path prefix.
fn is_outcome(path: &Path) -> bool {
    let Some(last) = path.segments.last() else {
        return false;
    };
    if last.ident == "Outcome" {
        return matches!(last.arguments, PathArguments::None);
    }
    if last.ident != "Result" {
        return false;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return false;
    };
    let mut args = args.args.iter();
    let ok_is_unit = matches!(args.next(), Some(GenericArgument::Type(Type::Tuple(t))) if t.elems.is_empty());
    let err_is_failure = matches!(
        args.next(),
        Some(GenericArgument::Type(Type::Path(p))) if p.path.segments.last().is_some_and(|s| s.ident == "Failure")
    );
    ok_is_unit && err_is_failure && args.next().is_none()
}

/// Compact source spelling of a type (`Vec<String>`, `&str`).
pub fn type_spelling(ty: &Type) -> String {
    quote!(#ty)
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}
