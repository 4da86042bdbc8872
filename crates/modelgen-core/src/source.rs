use crate::{
    error::Error,
    marker::{MemberMarkers, ModelArgs},
};
use proc_macro2::Span;
use std::path::{Path as FsPath, PathBuf};
use syn::{
    Attribute, Data, DeriveInput, Fields, Generics, Ident, ImplItem, ItemImpl, ItemStruct, Type,
    Visibility, spanned::Spanned,
};

///
/// SourceType
///
/// A marked declaration as handed over by a host. Read-only once built; the
/// generator never mutates it.
///

#[derive(Clone, Debug)]
pub struct SourceType {
    pub ident: Ident,
    pub vis: Visibility,

    /// Module path segments (`["crate", "dto"]`), empty when the host cannot
    /// tell where the declaration lives.
    pub namespace: Vec<String>,

    /// File the declaration was read from.
    pub origin: Option<PathBuf>,

    pub args: ModelArgs,
    pub members: Vec<Member>,
}

impl SourceType {
    /// Build from a derive input.
    pub fn from_derive_input(input: &DeriveInput, args: ModelArgs) -> Result<Self, Error> {
        match &input.data {
            Data::Struct(data) => Self::from_parts(
                &input.ident,
                &input.vis,
                &input.generics,
                &data.fields,
                args,
            ),
            Data::Enum(data) => Err(Error::structural(
                data.enum_token.span,
                "models can only be generated from structs with named fields, found an enum",
            )),
            Data::Union(data) => Err(Error::structural(
                data.union_token.span,
                "models can only be generated from structs with named fields, found a union",
            )),
        }
    }

    /// Build from a parsed struct item.
    pub fn from_item_struct(item: &ItemStruct, args: ModelArgs) -> Result<Self, Error> {
        Self::from_parts(&item.ident, &item.vis, &item.generics, &item.fields, args)
    }

    fn from_parts(
        ident: &Ident,
        vis: &Visibility,
        generics: &Generics,
        fields: &Fields,
        args: ModelArgs,
    ) -> Result<Self, Error> {
        if !generics.params.is_empty() || generics.where_clause.is_some() {
            return Err(Error::structural(
                generics.span(),
                format!("'{ident}' is generic; models can only be generated from concrete structs"),
            ));
        }

        let members = match fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|field| {
                    let ident = field
                        .ident
                        .clone()
                        .ok_or_else(|| Error::structural(field.span(), "unnamed field"))?;

                    Ok(Member::Property(PropertyDecl {
                        markers: MemberMarkers::from_attrs(&field.attrs)?,
                        docs: doc_attrs(&field.attrs),
                        vis: field.vis.clone(),
                        ty: field.ty.clone(),
                        ident,
                    }))
                })
                .collect::<Result<Vec<_>, Error>>()?,
            Fields::Unnamed(unnamed) => {
                return Err(Error::structural(
                    unnamed.span(),
                    format!(
                        "'{ident}' is a tuple struct; fields must be named to be forwarded by name"
                    ),
                ));
            }
            Fields::Unit => Vec::new(),
        };

        Ok(Self {
            ident: ident.clone(),
            vis: vis.clone(),
            namespace: Vec::new(),
            origin: None,
            args,
            members,
        })
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: Vec<String>) -> Self {
        self.namespace = namespace;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Record the associated items of an inherent impl block as members.
    pub fn absorb_impl(&mut self, item: &ItemImpl) {
        for impl_item in &item.items {
            let member = match impl_item {
                ImplItem::Fn(func) => Member::Function(FunctionDecl {
                    ident: func.sig.ident.clone(),
                }),
                other => Member::Other(other.span()),
            };
            self.members.push(member);
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// `crate::dto::TestDto`, or just `TestDto` without a namespace.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name()
        } else {
            format!("{}::{}", self.namespace.join("::"), self.ident)
        }
    }

    #[must_use]
    pub fn namespace_name(&self) -> String {
        self.namespace.join("::")
    }

    #[must_use]
    pub fn origin(&self) -> Option<&FsPath> {
        self.origin.as_deref()
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.ident.span()
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Property(prop) => Some(prop),
            Member::Function(_) | Member::Other(_) => None,
        })
    }
}

///
/// Member
///

#[derive(Clone, Debug)]
pub enum Member {
    Property(PropertyDecl),
    Function(FunctionDecl),
    Other(Span),
}

///
/// PropertyDecl
///

#[derive(Clone, Debug)]
pub struct PropertyDecl {
    pub ident: Ident,
    pub ty: Type,
    pub vis: Visibility,
    pub docs: Vec<Attribute>,
    pub markers: MemberMarkers,
}

///
/// FunctionDecl
///

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub ident: Ident,
}

fn doc_attrs(attrs: &[Attribute]) -> Vec<Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .cloned()
        .collect()
}

///
/// TESTS
///
