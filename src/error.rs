//! Error types for zentinel-transforms.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for transformation lookup and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Unknown transformation name.
    #[error("invalid transformation name: t:{name}")]
    UnknownTransformation {
        /// The requested (unknown) transformation name.
        name: String,
    },

    /// A transformation could not decode its input.
    #[error("{transformation}: {message}")]
    Decode {
        /// Directive name of the failing transformation.
        transformation: &'static str,
        /// Error message.
        message: String,
    },

    /// A process-wide registry was already installed.
    #[error("transformation registry already installed")]
    RegistryInstalled,
}

impl Error {
    /// Create an unknown transformation error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownTransformation { name: name.into() }
    }

    /// Create a decode error for the named transformation.
    pub fn decode(transformation: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            transformation,
            message: message.into(),
        }
    }
}
