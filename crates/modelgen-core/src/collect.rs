use crate::{
    diag::Diagnostics,
    error::Error,
    source::{Member, PropertyDecl, SourceType},
};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use std::collections::BTreeMap;
use syn::{Attribute, Ident, Type, Visibility};

///
/// TypeUniverse
///
/// Resolves the struct embedded by a `#[model_base]` field. Hosts that only
/// see one declaration at a time use [`NoUniverse`].
///

pub trait TypeUniverse {
    fn resolve_base(&self, ty: &Type, from: &SourceType) -> Result<&SourceType, Error>;
}

///
/// NoUniverse
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoUniverse;

impl TypeUniverse for NoUniverse {
    fn resolve_base(&self, ty: &Type, from: &SourceType) -> Result<&SourceType, Error> {
        Err(Error::UnresolvedBase {
            dto: from.qualified_name(),
            base: ty.to_token_stream().to_string(),
            reason: "base structs are only visible to build-script generation".to_string(),
            span: syn::spanned::Spanned::span(ty),
        })
    }
}

///
/// Modifiers
/// carried verbatim from the source field
///

#[derive(Clone, Debug)]
pub struct Modifiers {
    pub vis: Visibility,
    pub docs: Vec<Attribute>,
}

///
/// PropertyDescriptor
///

#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    pub ident: Ident,
    pub ty: Type,
    pub modifiers: Modifiers,

    /// Base fields walked to reach this property; empty for own fields.
    pub access: Vec<Ident>,
}

impl PropertyDescriptor {
    fn new(prop: &PropertyDecl, access: &[Ident]) -> Self {
        Self {
            ident: prop.ident.clone(),
            ty: prop.ty.clone(),
            modifiers: Modifiers {
                vis: prop.vis.clone(),
                docs: prop.docs.clone(),
            },
            access: access.to_vec(),
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// Token rendering of the type; two properties are the same field when
    /// their names and type keys match.
    #[must_use]
    pub fn type_key(&self) -> String {
        self.ty.to_token_stream().to_string()
    }

    /// `receiver.base.ident`
    #[must_use]
    pub fn access_expr(&self, receiver: &TokenStream) -> TokenStream {
        let ident = &self.ident;
        let path = &self.access;

        quote!(#receiver #(.#path)* .#ident)
    }
}

/// Collect the properties of `source`, base levels included, in declaration
/// order. Excluded properties never appear. A name seen again with the same
/// type is merged into its first occurrence; with a different type it is an
/// error.
pub fn collect_properties(
    source: &SourceType,
    universe: &dyn TypeUniverse,
    diag: &mut dyn Diagnostics,
) -> Result<Vec<PropertyDescriptor>, Error> {
    let mut collector = Collector {
        root: source,
        universe,
        diag,
        chain: Vec::new(),
        index: BTreeMap::new(),
        out: Vec::new(),
    };
    collector.visit(source, &[])?;

    Ok(collector.out)
}

///
/// Collector
///

struct Collector<'a> {
    root: &'a SourceType,
    universe: &'a dyn TypeUniverse,
    diag: &'a mut dyn Diagnostics,
    chain: Vec<String>,
    index: BTreeMap<String, usize>,
    out: Vec<PropertyDescriptor>,
}

impl Collector<'_> {
    fn visit(&mut self, decl: &SourceType, access: &[Ident]) -> Result<(), Error> {
        self.chain.push(decl.qualified_name());

        for member in &decl.members {
            let prop = match member {
                Member::Property(prop) => prop,
                Member::Function(_) | Member::Other(_) => continue,
            };

            if prop.markers.ignored {
                self.diag.info(
                    &self.root.qualified_name(),
                    &format!("property '{}' is ignored", prop.ident),
                );
            } else if prop.markers.base {
                self.visit_base(decl, prop, access)?;
            } else {
                self.insert(PropertyDescriptor::new(prop, access))?;
            }
        }

        self.chain.pop();

        Ok(())
    }

    fn visit_base(
        &mut self,
        decl: &SourceType,
        prop: &PropertyDecl,
        access: &[Ident],
    ) -> Result<(), Error> {
        let base = self.universe.resolve_base(&prop.ty, decl)?;
        let base_name = base.qualified_name();

        if self.chain.contains(&base_name) {
            let mut chain = self.chain.clone();
            chain.push(base_name);

            return Err(Error::CyclicBase {
                dto: self.root.qualified_name(),
                chain: chain.join(" -> "),
                span: prop.ident.span(),
            });
        }

        let mut path = access.to_vec();
        path.push(prop.ident.clone());

        let before = self.out.len();
        self.visit(base, &path)?;
        if self.out.len() == before {
            self.diag.warn(
                &self.root.qualified_name(),
                &format!("base '{base_name}' adds no properties"),
            );
        }

        Ok(())
    }

    fn insert(&mut self, descriptor: PropertyDescriptor) -> Result<(), Error> {
        let name = descriptor.name();

        if let Some(&at) = self.index.get(&name) {
            let existing = &self.out[at];
            if existing.type_key() != descriptor.type_key() {
                return Err(Error::PropertyConflict {
                    dto: self.root.qualified_name(),
                    name,
                    first: existing.type_key(),
                    second: descriptor.type_key(),
                    span: descriptor.ident.span(),
                });
            }

            self.diag.debug(
                &self.root.qualified_name(),
                &format!("property '{name}' appears on several levels; keeping the first"),
            );

            return Ok(());
        }

        self.index.insert(name, self.out.len());
        self.out.push(descriptor);

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diag::DiagnosticLog, marker::ModelArgs};
    use proptest::prelude::*;
    use syn::{ItemStruct, parse_quote};

    fn source(item: ItemStruct) -> SourceType {
        SourceType::from_item_struct(&item, ModelArgs::default()).unwrap()
    }

    struct Bases(Vec<SourceType>);

    impl TypeUniverse for Bases {
        fn resolve_base(&self, ty: &Type, from: &SourceType) -> Result<&SourceType, Error> {
            let written = ty.to_token_stream().to_string();
            self.0
                .iter()
                .find(|candidate| candidate.name() == written)
                .ok_or_else(|| Error::UnresolvedBase {
                    dto: from.name(),
                    base: written,
                    reason: "unknown".to_string(),
                    span: proc_macro2::Span::call_site(),
                })
        }
    }

    fn names(props: &[PropertyDescriptor]) -> Vec<String> {
        props.iter().map(PropertyDescriptor::name).collect()
    }

    #[test]
    fn collects_in_declaration_order() {
        let src = source(parse_quote! {
            pub struct TestDto { pub id: String, pub name: String, pub surname: String }
        });
        let props = collect_properties(&src, &NoUniverse, &mut DiagnosticLog::new()).unwrap();

        assert_eq!(names(&props), vec!["id", "name", "surname"]);
    }

    #[test]
    fn ignored_properties_are_skipped_and_reported() {
        let src = source(parse_quote! {
            pub struct TestDto {
                #[ignore_in_model]
                pub id: String,
                pub name: String,
                pub surname: String,
            }
        });
        let mut log = DiagnosticLog::new();
        let props = collect_properties(&src, &NoUniverse, &mut log).unwrap();

        assert_eq!(names(&props), vec!["name", "surname"]);
        assert!(log.contains("'id' is ignored"));
    }

    #[test]
    fn all_ignored_collects_nothing() {
        let src = source(parse_quote! {
            pub struct TestDto { #[ignore_in_model] pub id: String }
        });
        let props = collect_properties(&src, &NoUniverse, &mut DiagnosticLog::new()).unwrap();

        assert!(props.is_empty());
    }

    #[test]
    fn base_fields_are_spliced_in_place() {
        let base = source(parse_quote! {
            pub struct Audit { pub created_by: String, #[ignore_in_model] pub secret: String }
        });
        let src = source(parse_quote! {
            pub struct InvoiceDto {
                pub id: String,
                #[model_base]
                pub audit: Audit,
                pub total: u64,
            }
        });
        let props =
            collect_properties(&src, &Bases(vec![base]), &mut DiagnosticLog::new()).unwrap();

        assert_eq!(names(&props), vec!["id", "created_by", "total"]);
        assert_eq!(
            props[1].access_expr(&quote!(self)).to_string(),
            quote!(self.audit.created_by).to_string()
        );
    }

    #[test]
    fn nested_bases_extend_the_access_path() {
        let root = source(parse_quote!(pub struct Root { pub tenant: String }));
        let mid = source(parse_quote! {
            pub struct Mid { #[model_base] pub root: Root, pub level: u8 }
        });
        let src = source(parse_quote! {
            pub struct LeafDto { #[model_base] pub mid: Mid }
        });
        let props =
            collect_properties(&src, &Bases(vec![root, mid]), &mut DiagnosticLog::new()).unwrap();

        assert_eq!(names(&props), vec!["tenant", "level"]);
        assert_eq!(
            props[0].access_expr(&quote!(source)).to_string(),
            quote!(source.mid.root.tenant).to_string()
        );
    }

    #[test]
    fn same_name_and_type_across_levels_is_merged() {
        let base = source(parse_quote!(pub struct Base { pub id: String, pub extra: u8 }));
        let src = source(parse_quote! {
            pub struct TestDto { pub id: String, #[model_base] pub base: Base }
        });
        let props =
            collect_properties(&src, &Bases(vec![base]), &mut DiagnosticLog::new()).unwrap();

        assert_eq!(names(&props), vec!["id", "extra"]);
        assert!(props[0].access.is_empty());
    }

    #[test]
    fn same_name_different_type_is_rejected() {
        let base = source(parse_quote!(pub struct Base { pub id: u64 }));
        let src = source(parse_quote! {
            pub struct TestDto { pub id: String, #[model_base] pub base: Base }
        });
        let err =
            collect_properties(&src, &Bases(vec![base]), &mut DiagnosticLog::new()).unwrap_err();

        assert!(matches!(err, Error::PropertyConflict { ref name, .. } if name == "id"));
    }

    #[test]
    fn cyclic_base_chain_is_rejected() {
        let a = source(parse_quote!(pub struct A { #[model_base] pub b: B }));
        let b = source(parse_quote!(pub struct B { #[model_base] pub a: A }));
        let src = source(parse_quote!(pub struct TestDto { #[model_base] pub a: A }));
        let err = collect_properties(&src, &Bases(vec![a, b]), &mut DiagnosticLog::new())
            .unwrap_err();

        assert!(matches!(err, Error::CyclicBase { .. }));
    }

    #[test]
    fn base_without_universe_is_rejected() {
        let src = source(parse_quote!(pub struct TestDto { #[model_base] pub base: Base }));
        let err = collect_properties(&src, &NoUniverse, &mut DiagnosticLog::new()).unwrap_err();

        assert!(matches!(err, Error::UnresolvedBase { .. }));
    }

    #[test]
    fn ignored_base_drops_the_whole_level() {
        let src = source(parse_quote! {
            pub struct TestDto {
                pub id: String,
                #[ignore_in_model]
                #[model_base]
                pub base: Base,
            }
        });
        let props = collect_properties(&src, &NoUniverse, &mut DiagnosticLog::new()).unwrap();

        assert_eq!(names(&props), vec!["id"]);
    }

    proptest! {
        #[test]
        fn excluded_properties_never_survive(mask in proptest::collection::vec(any::<bool>(), 1..8)) {
            let fields = mask.iter().enumerate().map(|(i, ignored)| {
                let ident = quote::format_ident!("field_{i}");
                if *ignored {
                    quote!(#[ignore_in_model] pub #ident: String)
                } else {
                    quote!(pub #ident: u32)
                }
            });
            let item: ItemStruct = parse_quote!(pub struct TestDto { #(#fields),* });
            let props = collect_properties(&source(item), &NoUniverse, &mut DiagnosticLog::new()).unwrap();

            let expected: Vec<String> = mask
                .iter()
                .enumerate()
                .filter(|(_, ignored)| !**ignored)
                .map(|(i, _)| format!("field_{i}"))
                .collect();
            prop_assert_eq!(names(&props), expected);
        }
    }
}
