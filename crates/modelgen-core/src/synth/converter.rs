use crate::{error::Error, naming::converter_ident, source::SourceType, synth::GeneratedTypeSpec};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Ident, Visibility};

///
/// ConverterSpec
///
/// `to_<model>(self)` on the source type, whose body is a single struct
/// expression forwarding every model field by name, plus a `From` impl that
/// delegates to it.
///

#[derive(Clone, Debug)]
pub struct ConverterSpec {
    pub ident: Ident,
    pub vis: Visibility,
    pub source: Ident,
    pub model: Ident,
    pub forwards: Vec<Forward>,
}

impl ConverterSpec {
    pub fn new(source: &SourceType, model: &GeneratedTypeSpec) -> Result<Self, Error> {
        if model.fields.is_empty() {
            return Err(Error::EmptyModel {
                dto: source.qualified_name(),
                model: model.name(),
                span: source.span(),
            });
        }

        let forwards = model
            .fields
            .iter()
            .map(|field| Forward {
                field: field.ident.clone(),
                access: field.access.clone(),
            })
            .collect();

        Ok(Self {
            ident: converter_ident(&model.ident),
            vis: model.vis.clone(),
            source: source.ident.clone(),
            model: model.ident.clone(),
            forwards,
        })
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }
}

impl ToTokens for ConverterSpec {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self {
            ident,
            vis,
            source,
            model,
            forwards,
        } = self;

        let receiver = quote!(self);
        let inits = forwards.iter().map(|forward| forward.init(&receiver));

        tokens.extend(quote! {
            impl #source {
                #[must_use]
                #[allow(clippy::wrong_self_convention)]
                #vis fn #ident(self) -> #model {
                    #model { #(#inits),* }
                }
            }

            impl ::core::convert::From<#source> for #model {
                fn from(source: #source) -> Self {
                    source.#ident()
                }
            }
        });
    }
}

///
/// Forward
///

#[derive(Clone, Debug)]
pub struct Forward {
    pub field: Ident,
    pub access: Vec<Ident>,
}

impl Forward {
    fn init(&self, receiver: &TokenStream) -> TokenStream {
        let field = &self.field;
        let path = &self.access;

        quote!(#field: #receiver #(.#path)* .#field)
    }
}

///
/// TESTS
///
