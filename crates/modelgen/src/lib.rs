//! ## Crate layout
//! - `core`: the host-neutral generator (collection, naming, synthesis, driver).
//! - `macros`: `#[derive(DtoToModel)]` and the `#[dto_to_model]` marker.
//! - `build`: the build-script host (feature `build`).
//!
//! Two ways to get a model twin for a DTO:
//!
//! ```rust,ignore
//! // inline, from the derive
//! #[derive(modelgen::DtoToModel)]
//! #[dto_model(derive(Debug, Clone))]
//! pub struct UserDto {
//!     pub id: u64,
//!     #[ignore_in_model]
//!     pub password: String,
//! }
//!
//! // or from a build script that scans the whole crate
//! #[modelgen::dto_to_model]
//! pub struct InvoiceDto {
//!     pub id: u64,
//!     #[model_base]
//!     pub audit: crate::audit::Audit,
//! }
//!
//! modelgen::include_models!("invoice.rs");
//! ```

pub use modelgen_core as core;
pub use modelgen_derive as macros;

#[cfg(feature = "build")]
pub use modelgen_build as build;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use modelgen_derive::{DtoToModel, dto_to_model};

/// Include the models a build script generated for one source file.
///
/// The path is the originating file relative to the scanned source
/// directory, and the macro must be invoked inside that file's module so
/// the converters can reach private fields.
#[macro_export]
macro_rules! include_models {
    ($path:literal) => {
        include!(concat!(env!("OUT_DIR"), "/modelgen/", $path));
    };
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{DtoToModel, dto_to_model};
}
