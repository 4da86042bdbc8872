use modelgen_core::{
    Error,
    collect::NoUniverse,
    diag::TracingDiagnostics,
    marker::{DERIVE_ARGS_ATTR, ModelArgs},
    source::SourceType,
    synth::generate,
};
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::DeriveInput;

// derive_dto_to_model
pub fn derive_dto_to_model(input: TokenStream) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(err) => err.into_compile_error(),
    }
}

fn expand(input: TokenStream) -> Result<TokenStream, Error> {
    let input: DeriveInput = syn::parse2(input)?;
    let args = ModelArgs::from_attrs(&input.attrs, DERIVE_ARGS_ATTR)?.unwrap_or_default();
    let source = SourceType::from_derive_input(&input, args)?;

    let pair = generate(&source, &NoUniverse, &mut TracingDiagnostics)?;

    Ok(pair.into_token_stream())
}

///
/// TESTS
///
