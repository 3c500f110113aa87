//! Attribute macros for the testease harness.
//!
//! - `#[testease::test]`: marks a free function as a test. Associated functions are registered
//!   through `#[testease::fixture]` on their impl block.
//! - `#[testease::fixture]`: marks an inherent `impl` block; every method inside carrying
//!   `#[test]` is registered. Methods taking `&self` / `&mut self` run on a fresh instance built
//!   by `Default::default()`, by `factory = path` or by the fallible `try_factory = path`.
//!
//! Both accept the marker arguments `name = "..."` and `skip` / `skip = true|false`.
//!
//! Methods whose shape the runner cannot invoke (parameters, a non-unit return) are still
//! registered, with their recorded signature, so the runner reports a contract violation for
//! them. Shapes that cannot be referenced as a function pointer at all (async, generic, `self`
//! by value) are rejected here.
//!
//! # Example
//! ```ignore
//! #[derive(Default)]
//! struct Sample;
//!
//! #[testease::fixture]
//! impl Sample {
//!     #[test(name = "Example of Assert.Equal")]
//!     fn example(&self) -> Outcome {
//!         assert::equal(2, 1 + 1)
//!     }
//! }
//!
//! #[testease::test(skip)]
//! fn not_yet() {}
//! ```

mod codegen;
mod parser;

use proc_macro::TokenStream;
use quote::quote;
use syn::{ImplItem, ItemFn, ItemImpl, Type, parse_macro_input};

use codegen::{Callee, Registration};
use parser::{FixtureArgs, MarkerArgs, Receiver, Shape, is_test_attribute};

/// Marks a function as a test.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut marker = MarkerArgs::default();
    let marker_parser = syn::meta::parser(|meta| marker.parse_meta(meta));
    parse_macro_input!(attr with marker_parser);

    let item = parse_macro_input!(item as ItemFn);
    expand_test(&item, &marker)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Registers the `#[test]` methods of an inherent `impl` block.
#[proc_macro_attribute]
pub fn fixture(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = FixtureArgs::default();
    let args_parser = syn::meta::parser(|meta| args.parse_meta(meta));
    parse_macro_input!(attr with args_parser);

    let item = parse_macro_input!(item as ItemImpl);
    expand_fixture(item, &args)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(item: &ItemFn, marker: &MarkerArgs) -> syn::Result<proc_macro2::TokenStream> {
    let shape = Shape::analyse(&item.sig)?;
    if shape.receiver != Receiver::None {
        return Err(syn::Error::new_spanned(
            &item.sig,
            "methods with a receiver are registered through `#[testease::fixture]` on their impl block",
        ));
    }

    let registration = Registration {
        ident: &item.sig.ident,
        callee: Callee::Free,
        shape: &shape,
        marker,
    }
    .expand(&quote!());

    let allow = (!shape.is_invocable()).then(|| quote!(#[allow(dead_code)]));
    Ok(quote! {
        #allow
        #item
        #registration
    })
}

fn expand_fixture(mut item: ItemImpl, args: &FixtureArgs) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`#[testease::fixture]` applies to inherent impl blocks only",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "fixture types may not be generic",
        ));
    }

    let self_ty = item.self_ty.as_ref().clone();
    let owner = owner_name(&self_ty);
    let factory = codegen::factory(&self_ty, args.factory.as_ref());

    let mut registrations = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let Some(index) = method.attrs.iter().position(is_test_attribute) else {
            continue;
        };
        let attr = method.attrs.remove(index);
        let marker = MarkerArgs::from_attribute(&attr)?;
        let shape = Shape::analyse(&method.sig)?;
        if !shape.is_invocable() {
            method.attrs.push(syn::parse_quote!(#[allow(dead_code)]));
        }

        let registration = Registration {
            ident: &method.sig.ident,
            callee: Callee::Member {
                self_ty: &self_ty,
                owner: owner.clone(),
            },
            shape: &shape,
            marker: &marker,
        };
        registrations.push(registration.expand(&factory));
    }

    Ok(quote! {
        #item
        #(#registrations)*
    })
}

/// Last path segment of the fixture type (`Sample` for `crate::demo::Sample`).
fn owner_name(ty: &Type) -> String {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_else(|| parser::type_spelling(ty)),
        other => parser::type_spelling(other),
    }
}
