use modelgen_core::{
    Error,
    marker::{DERIVE_NAME, GENERATE_ATTR, ModelArgs, derives, is_marker, strip_member_markers},
    naming::model_ident,
    source::SourceType,
};
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Item, spanned::Spanned};

// dto_to_model
// validates eagerly so mistakes surface at the marked struct rather than in
// the build script output
pub fn dto_to_model(args: TokenStream, input: TokenStream) -> TokenStream {
    match expand(args, input) {
        Ok(tokens) => tokens,
        Err(err) => err.into_compile_error(),
    }
}

fn expand(args: TokenStream, input: TokenStream) -> Result<TokenStream, Error> {
    let args = ModelArgs::from_tokens(args)?;

    let mut item = match syn::parse2::<Item>(input)? {
        Item::Struct(item) => item,
        other => {
            return Err(Error::structural(
                other.span(),
                "#[dto_to_model] can only mark structs with named fields",
            ));
        }
    };

    if let Some(repeat) = item.attrs.iter().find(|attr| is_marker(attr, GENERATE_ATTR)) {
        return Err(Error::configuration(
            repeat.span(),
            "duplicate `#[dto_to_model]` attribute",
        ));
    }

    if derives(&item.attrs, DERIVE_NAME) {
        return Err(Error::configuration(
            item.ident.span(),
            "#[dto_to_model] and #[derive(DtoToModel)] both generate a model; use only one",
        ));
    }

    let source = SourceType::from_item_struct(&item, args)?;
    model_ident(&source)?;

    strip_member_markers(&mut item.fields);

    Ok(item.into_token_stream())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn passes_the_struct_through_without_field_markers() {
        let out = dto_to_model(
            quote!(),
            quote! {
                pub struct TestDto {
                    #[ignore_in_model]
                    pub id: String,
                    pub name: String,
                }
            },
        );

        let expected = quote! {
            pub struct TestDto {
                pub id: String,
                pub name: String,
            }
        };
        assert_eq!(out.to_string(), expected.to_string());
    }

    #[test]
    fn rejects_enums() {
        let out = dto_to_model(quote!(), quote!(pub enum TestDto { A }));

        assert!(out.to_string().contains("can only mark structs"));
    }

    #[test]
    fn rejects_invalid_names() {
        let out = dto_to_model(
            quote!(name = "not a name"),
            quote!(pub struct TestDto { pub id: String }),
        );

        assert!(out.to_string().contains("not a valid Rust identifier"));
    }

    #[test]
    fn rejects_double_generation() {
        let out = dto_to_model(
            quote!(),
            quote! {
                #[derive(DtoToModel)]
                pub struct TestDto { pub id: String }
            },
        );

        assert!(out.to_string().contains("use only one"));
    }

    #[test]
    fn rejects_a_repeated_marker() {
        let out = dto_to_model(
            quote!(name = "First"),
            quote! {
                #[dto_to_model(name = "Second")]
                pub struct TestDto { pub id: String }
            },
        );

        assert!(out.to_string().contains("duplicate"));
    }
}
