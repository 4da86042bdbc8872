use crate::{error::Error, source::SourceType};
use convert_case::{Case, Casing};
use quote::format_ident;
use syn::{Ident, ext::IdentExt};

/// Substring replaced in source names when deriving a model name.
pub const DTO_MARKER: &str = "Dto";

/// Replacement for [`DTO_MARKER`], or suffix when it is absent.
pub const MODEL_SUFFIX: &str = "Model";

/// Resolve the generated type name.
///
/// An explicit non-empty name wins. Otherwise the first `Dto` in the source
/// name becomes `Model`, even inside a longer token (`DtoX` -> `ModelX`), and
/// names without `Dto` get `Model` appended.
#[must_use]
pub fn resolve_model_name(explicit: Option<&str>, source_name: &str) -> String {
    match explicit {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if source_name.contains(DTO_MARKER) => source_name.replacen(DTO_MARKER, MODEL_SUFFIX, 1),
        _ => format!("{source_name}{MODEL_SUFFIX}"),
    }
}

/// Resolve and validate the model identifier for `source`.
pub fn model_ident(source: &SourceType) -> Result<Ident, Error> {
    let source_name = source.ident.unraw().to_string();
    let name = resolve_model_name(source.args.explicit_name(), &source_name);

    let mut ident: Ident = syn::parse_str(&name).map_err(|_| {
        Error::configuration(
            source.span(),
            format!("model name '{name}' for '{source_name}' is not a valid Rust identifier"),
        )
    })?;

    if ident.unraw() == source_name {
        return Err(Error::configuration(
            source.span(),
            format!("model name '{name}' is the same as its source type"),
        ));
    }

    ident.set_span(source.span());

    Ok(ident)
}

/// `TestModel` -> `to_test_model`.
#[must_use]
pub fn converter_ident(model: &Ident) -> Ident {
    let snake = model.unraw().to_string().to_case(Case::Snake);
    let mut ident = format_ident!("to_{snake}");
    ident.set_span(model.span());

    ident
}

///
/// TESTS
///
