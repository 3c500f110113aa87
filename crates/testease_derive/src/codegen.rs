//! Registration code generation.
//!
//! Every marked function gets a `const _: () = { ... };` block next to it holding a call shim
//! and an `inventory::submit!` of its `TestEntry`. Source positions are taken from the function
//! name's span so discovery can order tests by where they are written.

use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{Ident, Type};

use crate::parser::{Factory, MarkerArgs, Receiver, ReturnShape, Shape};

/// How the registered method is reached.
pub enum Callee<'a> {
    /// A free function in the current module.
    Free,
    /// A method or associated function of `self_ty`.
    Member { self_ty: &'a Type, owner: String },
}

pub struct Registration<'a> {
    pub ident: &'a Ident,
    pub callee: Callee<'a>,
    pub shape: &'a Shape,
    pub marker: &'a MarkerArgs,
}

impl Registration<'_> {
    pub fn expand(&self, factory: &TokenStream) -> TokenStream {
        let span = self.ident.span();
        let name = self.ident.to_string();
        let target = self.target();
        let signature = signature(self.shape);
        let marker = marker(self.marker);
        let owner = match &self.callee {
            Callee::Free => quote!(),
            Callee::Member { owner, .. } => quote! {
                .owned_by(::core::concat!(::core::module_path!(), "::", #owner))
            },
        };
        let location = quote_spanned! {span=> .at(::core::file!(), ::core::line!()) };
        let shims = self.shims(factory);

        quote! {
            const _: () = {
                #shims

                ::testease::inventory::submit! {
                    ::testease::TestEntry::new(
                        ::testease::TestMethod::new(::core::module_path!(), #name, #target)
                            #owner
                            .with_signature(#signature)
                            #location,
                        #marker,
                    )
                }
            };
        }
    }

    fn target(&self) -> TokenStream {
        if !self.shape.is_invocable() {
            return quote!(::testease::Target::Unbound);
        }
        let shim = shim_ident(self.ident);
        match self.shape.receiver {
            Receiver::None => quote!(::testease::Target::Free(#shim)),
            Receiver::Ref | Receiver::RefMut => quote! {
                ::testease::Target::Instance {
                    factory: ::core::option::Option::Some(__testease_factory),
                    call: #shim,
                }
            },
        }
    }

    fn shims(&self, factory: &TokenStream) -> TokenStream {
        if !self.shape.is_invocable() {
            return quote!();
        }
        let ident = self.ident;
        let shim = shim_ident(ident);
        match (&self.callee, self.shape.receiver) {
            (Callee::Free, _) => quote! {
                fn #shim() -> ::testease::Outcome {
                    ::testease::IntoOutcome::into_outcome(#ident())
                }
            },
            (Callee::Member { self_ty, .. }, Receiver::None) => quote! {
                fn #shim() -> ::testease::Outcome {
                    ::testease::IntoOutcome::into_outcome(<#self_ty>::#ident())
                }
            },
            (Callee::Member { self_ty, .. }, Receiver::Ref | Receiver::RefMut) => quote! {
                #factory

                fn #shim(instance: &mut dyn ::core::any::Any) -> ::testease::Outcome {
                    let fixture = instance
                        .downcast_mut::<#self_ty>()
                        .ok_or_else(|| ::testease::ContractViolation::fixture_type(::core::stringify!(#self_ty)))?;
                    ::testease::IntoOutcome::into_outcome(fixture.#ident())
                }
            },
        }
    }
}

fn shim_ident(ident: &Ident) -> Ident {
    format_ident!("__testease_call_{}", ident)
}

fn signature(shape: &Shape) -> TokenStream {
    let params = &shape.params;
    let returns = match &shape.returns {
        ReturnShape::Unit => quote!(::testease::Returns::Unit),
        ReturnShape::Outcome => quote!(::testease::Returns::Outcome),
        ReturnShape::Value(ty) => quote!(::testease::Returns::Value(#ty)),
    };
    quote!(::testease::Signature::new(&[#(#params),*], #returns))
}

fn marker(args: &MarkerArgs) -> TokenStream {
    let name = args
        .name
        .as_ref()
        .map(|name| quote!(.named(#name)))
        .unwrap_or_default();
    let skip = args.skip;
    quote!(::testease::TestMarker::new() #name .skipped(#skip))
}

/// `fn __testease_factory() -> Result<Box<dyn Any>, Failure>` for a fixture type.
pub fn factory(self_ty: &Type, factory: Option<&Factory>) -> TokenStream {
    let body = match factory {
        Some(Factory::Infallible(path)) => quote! {
            ::core::result::Result::Ok(::std::boxed::Box::new(#path()) as ::std::boxed::Box<dyn ::core::any::Any>)
        },
        Some(Factory::Fallible(path)) => quote! {
            #path().map(|fixture| ::std::boxed::Box::new(fixture) as ::std::boxed::Box<dyn ::core::any::Any>)
        },
        None => quote! {
            #[allow(unused_imports)]
            use ::testease::descriptor::probe::{ViaDefault as _, ViaMissing as _};
            (&::testease::descriptor::probe::Probe::<#self_ty>::new()).construct()
        },
    };
    quote! {
        fn __testease_factory()
            -> ::core::result::Result<::std::boxed::Box<dyn ::core::any::Any>, ::testease::Failure>
        {
            #body
        }
    }
}
