//! ## Crate layout
//! - `marker`: the marker surface (`#[dto_to_model]`, `#[ignore_in_model]`, ...).
//! - `source`: host-neutral view of a marked declaration and its members.
//! - `collect`: property collection across the base chain.
//! - `naming`: model and converter name resolution.
//! - `synth`: model type and converter synthesis.
//! - `driver`: grouping by originating file and artifact emission.
//! - `diag`: the diagnostics sink threaded through every stage.
//!
//! Hosts (the derive macro, the build-script generator) translate their own
//! symbol representation into [`source::SourceType`] and drive either
//! [`synth::generate`] for a single declaration or [`driver::Driver`] for a
//! whole compilation unit.

pub mod collect;
pub mod diag;
pub mod driver;
pub mod error;
pub mod marker;
pub mod naming;
pub mod source;
pub mod synth;

pub use error::{Error, ErrorKind};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        collect::{NoUniverse, PropertyDescriptor, TypeUniverse, collect_properties},
        diag::{Diagnostic, DiagnosticLog, Diagnostics, Level, TracingDiagnostics},
        driver::{Artifact, ArtifactScope, Driver, Emitter, Grouping, RunSummary, SymbolSource},
        error::{Error, ErrorKind},
        marker::{MemberMarkers, ModelArgs},
        naming::{converter_ident, model_ident, resolve_model_name},
        source::{Member, SourceType},
        synth::{ConverterSpec, GeneratedPair, GeneratedTypeSpec, generate},
    };
}
