mod converter;
mod model;

pub use converter::{ConverterSpec, Forward};
pub use model::{GeneratedTypeSpec, ModelField};

use crate::{
    collect::{TypeUniverse, collect_properties},
    diag::Diagnostics,
    error::Error,
    naming::model_ident,
    source::SourceType,
};
use proc_macro2::TokenStream;
use quote::ToTokens;

///
/// GeneratedPair
/// the model and its converter, generated together
///

#[derive(Clone, Debug)]
pub struct GeneratedPair {
    pub model: GeneratedTypeSpec,
    pub converter: ConverterSpec,
}

impl ToTokens for GeneratedPair {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.model.to_tokens(tokens);
        self.converter.to_tokens(tokens);
    }
}

/// Run the whole per-declaration pipeline.
pub fn generate(
    source: &SourceType,
    universe: &dyn TypeUniverse,
    diag: &mut dyn Diagnostics,
) -> Result<GeneratedPair, Error> {
    let subject = source.qualified_name();

    let properties = collect_properties(source, universe, diag)?;
    let ident = model_ident(source)?;

    diag.info(
        &subject,
        &format!("generating {ident} with {} field(s)", properties.len()),
    );
    let model = GeneratedTypeSpec::new(ident, source, &properties)?;
    let converter = ConverterSpec::new(source, &model)?;
    diag.debug(&subject, &format!("converter {}", converter.name()));

    Ok(GeneratedPair { model, converter })
}

///
/// TESTS
///
