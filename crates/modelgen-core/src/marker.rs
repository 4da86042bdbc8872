//! Marker surface read by the generator.
//!
//! A type-level marker requests generation and optionally overrides the
//! generated name; member-level markers exclude a field or mark it as the
//! embedded parent level of the struct.

use crate::error::Error;
use darling::{FromMeta, ast::NestedMeta, util::PathList};
use proc_macro2::TokenStream;
use syn::{Attribute, Fields, Meta, Path, spanned::Spanned};

/// Attribute macro that marks a struct for build-script generation.
pub const GENERATE_ATTR: &str = "dto_to_model";

/// Helper attribute carrying arguments for `#[derive(DtoToModel)]`.
pub const DERIVE_ARGS_ATTR: &str = "dto_model";

/// Field marker: leave this property out of the model.
pub const IGNORE_ATTR: &str = "ignore_in_model";

/// Field marker: splice the fields of this embedded struct into the model.
pub const BASE_ATTR: &str = "model_base";

/// Derive macro name that generates inline.
pub const DERIVE_NAME: &str = "DtoToModel";

///
/// ModelArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct ModelArgs {
    /// Explicit name of the generated type. Empty means derive it.
    #[darling(default)]
    pub name: Option<String>,

    /// Extra derives placed on the generated type.
    #[darling(default, with = parse_derives)]
    pub derive: Vec<Path>,
}

impl ModelArgs {
    /// Parse the argument list of an attribute macro invocation.
    pub fn from_tokens(tokens: TokenStream) -> Result<Self, Error> {
        if tokens.is_empty() {
            return Ok(Self::default());
        }

        let items = NestedMeta::parse_meta_list(tokens)?;

        Ok(Self::from_list(&items)?)
    }

    /// Parse a marker attribute; a bare `#[marker]` yields the defaults.
    pub fn from_attribute(attr: &Attribute) -> Result<Self, Error> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            Meta::List(list) => Self::from_tokens(list.tokens.clone()),
            Meta::NameValue(nv) => Err(Error::configuration(
                nv.span(),
                format!(
                    "expected `#[{}]` or `#[{}(name = \"..\")]`",
                    marker_name(&attr.meta),
                    marker_name(&attr.meta)
                ),
            )),
        }
    }

    /// Find and parse the attribute named `marker`. A repeated marker is a
    /// configuration error.
    pub fn from_attrs(attrs: &[Attribute], marker: &str) -> Result<Option<Self>, Error> {
        let mut found = attrs.iter().filter(|attr| is_marker(attr, marker));
        let Some(first) = found.next() else {
            return Ok(None);
        };

        if let Some(second) = found.next() {
            return Err(Error::configuration(
                second.span(),
                format!("duplicate `#[{}]` attribute", marker_name(&second.meta)),
            ));
        }

        Self::from_attribute(first).map(Some)
    }

    /// The explicit name, if one was given and is non-empty.
    #[must_use]
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Append `defaults` to the derive list, skipping paths already present.
    #[must_use]
    pub fn with_default_derives(mut self, defaults: &[Path]) -> Self {
        for path in defaults {
            let key = path_key(path);
            if !self.derive.iter().any(|existing| path_key(existing) == key) {
                self.derive.push(path.clone());
            }
        }

        self
    }
}

///
/// MemberMarkers
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemberMarkers {
    pub ignored: bool,
    pub base: bool,
}

impl MemberMarkers {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self, Error> {
        let mut markers = Self::default();

        for attr in attrs {
            if is_marker(attr, IGNORE_ATTR) {
                expect_bare(attr)?;
                markers.ignored = true;
            } else if is_marker(attr, BASE_ATTR) {
                expect_bare(attr)?;
                markers.base = true;
            }
        }

        Ok(markers)
    }
}

/// True when the attribute path ends in `name` (`x` or `crate_name::x`).
#[must_use]
pub fn is_marker(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// True when a `#[derive(..)]` on the item lists `name`.
#[must_use]
pub fn derives(attrs: &[Attribute], name: &str) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(
                syn::punctuated::Punctuated::<Path, syn::Token![,]>::parse_terminated,
            )
            .ok()
        })
        .any(|paths| {
            paths
                .iter()
                .any(|path| path.segments.last().is_some_and(|s| s.ident == name))
        })
}

/// Remove member markers so the item compiles without derive helpers.
pub fn strip_member_markers(fields: &mut Fields) {
    for field in fields.iter_mut() {
        field
            .attrs
            .retain(|attr| !is_marker(attr, IGNORE_ATTR) && !is_marker(attr, BASE_ATTR));
    }
}

fn parse_derives(meta: &Meta) -> darling::Result<Vec<Path>> {
    PathList::from_meta(meta).map(|list| list.iter().cloned().collect())
}

fn expect_bare(attr: &Attribute) -> Result<(), Error> {
    match &attr.meta {
        Meta::Path(_) => Ok(()),
        meta => Err(Error::configuration(
            meta.span(),
            format!("`#[{}]` takes no arguments", marker_name(meta)),
        )),
    }
}

fn marker_name(meta: &Meta) -> String {
    meta.path()
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default()
}

fn path_key(path: &Path) -> String {
    quote::quote!(#path).to_string()
}

///
/// TESTS
///
