use proc_macro2::{Span, TokenStream};
use thiserror::Error as ThisError;

///
/// ErrorKind
///
/// Coarse classification used by hosts to decide how loudly to fail.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A marker or resolved name is unusable.
    Configuration,

    /// The declaration cannot be processed at all (wrong item kind,
    /// unresolvable base, missing originating file, ...).
    Structural,

    /// Processing reached a point whose precondition does not hold.
    Precondition,
}

///
/// Error
///
/// Every variant is fatal: either for the declaration being processed or,
/// inside the driver, for the whole pass.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{message}")]
    Configuration { message: String, span: Span },

    #[error("{message}")]
    Structural { message: String, span: Span },

    #[error("cannot generate '{model}' from '{dto}': no properties are left to carry over")]
    EmptyModel {
        dto: String,
        model: String,
        span: Span,
    },

    #[error(
        "property '{name}' of '{dto}' is declared as '{first}' and as '{second}' along its base chain"
    )]
    PropertyConflict {
        dto: String,
        name: String,
        first: String,
        second: String,
        span: Span,
    },

    #[error("base '{base}' of '{dto}' cannot be resolved: {reason}")]
    UnresolvedBase {
        dto: String,
        base: String,
        reason: String,
        span: Span,
    },

    #[error("base chain of '{dto}' is cyclic: {chain}")]
    CyclicBase {
        dto: String,
        chain: String,
        span: Span,
    },

    #[error("model '{model}' in '{namespace}' is generated by both '{first}' and '{second}'")]
    DuplicateModel {
        model: String,
        namespace: String,
        first: String,
        second: String,
        span: Span,
    },

    #[error("cannot locate the originating source file of '{dto}'")]
    MissingSource { dto: String, span: Span },

    #[error(transparent)]
    Darling(#[from] darling::Error),
}

impl Error {
    pub fn configuration(span: Span, message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            span,
        }
    }

    pub fn structural(span: Span, message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
            span,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } | Self::DuplicateModel { .. } | Self::Darling(_) => {
                ErrorKind::Configuration
            }
            Self::Structural { .. }
            | Self::UnresolvedBase { .. }
            | Self::CyclicBase { .. }
            | Self::PropertyConflict { .. }
            | Self::MissingSource { .. } => ErrorKind::Structural,
            Self::EmptyModel { .. } => ErrorKind::Precondition,
        }
    }

    /// Span of the offending tokens, `call_site` when none is known.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Configuration { span, .. }
            | Self::Structural { span, .. }
            | Self::EmptyModel { span, .. }
            | Self::PropertyConflict { span, .. }
            | Self::UnresolvedBase { span, .. }
            | Self::CyclicBase { span, .. }
            | Self::DuplicateModel { span, .. }
            | Self::MissingSource { span, .. } => *span,
            Self::Darling(err) => err.span(),
        }
    }

    /// Render as `compile_error!` tokens for proc-macro hosts.
    #[must_use]
    pub fn into_compile_error(self) -> TokenStream {
        match self {
            Self::Darling(err) => err.write_errors(),
            other => syn::Error::new(other.span(), other.to_string()).to_compile_error(),
        }
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Self::configuration(err.span(), err.to_string())
    }
}

///
/// TESTS
///
