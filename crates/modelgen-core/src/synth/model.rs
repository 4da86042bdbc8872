use crate::{
    collect::{Modifiers, PropertyDescriptor},
    error::Error,
    source::SourceType,
};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Ident, Path, Type, Visibility};

///
/// GeneratedTypeSpec
///
/// The model struct: one field per collected property, same order, type and
/// modifiers carried over verbatim, plus a `new` taking every field.
///

#[derive(Clone, Debug)]
pub struct GeneratedTypeSpec {
    pub ident: Ident,
    pub vis: Visibility,
    pub derives: Vec<Path>,
    pub fields: Vec<ModelField>,

    /// Qualified name of the declaration this was generated from.
    pub origin: String,
}

impl GeneratedTypeSpec {
    pub fn new(
        ident: Ident,
        source: &SourceType,
        properties: &[PropertyDescriptor],
    ) -> Result<Self, Error> {
        if properties.is_empty() {
            return Err(Error::EmptyModel {
                dto: source.qualified_name(),
                model: ident.to_string(),
                span: source.span(),
            });
        }

        let fields = properties.iter().map(ModelField::from).collect();

        Ok(Self {
            ident,
            vis: source.vis.clone(),
            derives: source.args.derive.clone(),
            fields,
            origin: source.qualified_name(),
        })
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    pub fn field_names(&self) -> impl Iterator<Item = String> + '_ {
        self.fields.iter().map(|field| field.ident.to_string())
    }
}

impl ToTokens for GeneratedTypeSpec {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self {
            ident,
            vis,
            derives,
            fields,
            origin,
        } = self;

        let doc = format!(" Model generated from `{origin}`.");
        let derive_attr = if derives.is_empty() {
            quote!()
        } else {
            quote!(#[derive(#(#derives),*)])
        };

        let defs = fields.iter().map(ModelField::definition);
        let params = fields.iter().map(|field| {
            let (ident, ty) = (&field.ident, &field.ty);
            quote!(#ident: #ty)
        });
        let names = fields.iter().map(|field| &field.ident);

        tokens.extend(quote! {
            #[doc = #doc]
            #derive_attr
            #vis struct #ident {
                #(#defs),*
            }

            impl #ident {
                #[must_use]
                #[allow(clippy::too_many_arguments)]
                #vis fn new(#(#params),*) -> Self {
                    Self { #(#names),* }
                }
            }
        });
    }
}

///
/// ModelField
///

#[derive(Clone, Debug)]
pub struct ModelField {
    pub ident: Ident,
    pub ty: Type,
    pub modifiers: Modifiers,

    /// Path through base fields on the source side.
    pub access: Vec<Ident>,
}

impl ModelField {
    fn definition(&self) -> TokenStream {
        let Self {
            ident,
            ty,
            modifiers,
            ..
        } = self;
        let Modifiers { vis, docs } = modifiers;

        quote! {
            #(#docs)*
            #vis #ident: #ty
        }
    }
}

impl From<&PropertyDescriptor> for ModelField {
    fn from(prop: &PropertyDescriptor) -> Self {
        Self {
            ident: prop.ident.clone(),
            ty: prop.ty.clone(),
            modifiers: prop.modifiers.clone(),
            access: prop.access.clone(),
        }
    }
}

///
/// TESTS
///
