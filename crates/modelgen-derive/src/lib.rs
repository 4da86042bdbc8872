use proc_macro::TokenStream;

mod generate;
mod mark;

/// Generate a model twin and its converter next to the annotated struct.
///
/// The converter consumes the struct and moves each field into the model,
/// so the struct must not implement `Drop` (E0509). The build script
/// rejects a marked struct with a `Drop` impl; a derive cannot see impls
/// and leaves the error to rustc.
///
/// ```ignore
/// #[derive(DtoToModel)]
/// #[dto_model(name = "MyModel", derive(Debug, Clone))]
/// pub struct TestDto {
///     pub id: String,
///     #[ignore_in_model]
///     pub secret: String,
/// }
/// ```
#[proc_macro_derive(DtoToModel, attributes(dto_model, ignore_in_model, model_base))]
pub fn derive_dto_to_model(input: TokenStream) -> TokenStream {
    generate::derive_dto_to_model(input.into()).into()
}

/// Mark a struct for build-script generation.
///
/// The struct is passed through unchanged apart from its field markers; the
/// model itself is written by `modelgen-build` and pulled in with
/// `include_models!`.
#[proc_macro_attribute]
pub fn dto_to_model(args: TokenStream, input: TokenStream) -> TokenStream {
    mark::dto_to_model(args.into(), input.into()).into()
}
