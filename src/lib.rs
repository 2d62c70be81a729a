//! # zentinel-transforms
//!
//! The transformation library of the zentinel ModSecurity engine.
//!
//! Rules normalize variable values with a chain of transformations
//! (`t:urlDecode,t:lowercase,...`) before an operator sees them. This crate
//! provides every built-in transformation as a byte-oriented function, a
//! case-insensitive name registry, and the pipeline that runs a rule's chain.
//!
//! ## Quick Start
//!
//! ```
//! use zentinel_transforms::TransformationPipeline;
//!
//! let pipeline = TransformationPipeline::from_names(&["urlDecode", "lowercase"])?;
//! let out = pipeline.apply(b"SELECT%20*%20FROM");
//! assert_eq!(out.value(), b"select * from");
//! assert!(out.is_changed());
//! # Ok::<(), zentinel_transforms::Error>(())
//! ```
//!
//! Single transformations can be called directly or resolved by name:
//!
//! ```
//! use zentinel_transforms::transformations;
//!
//! let css_decode = transformations::get("cssDecode")?;
//! assert_eq!(css_decode(b"\\3c script")?.value(), b"<script");
//! assert_eq!(transformations::length(b"hello")?.value(), b"5");
//! # Ok::<(), zentinel_transforms::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod bytes;
pub mod error;
pub mod random;
pub mod transformations;

// Re-export main types at crate root
pub use error::{Error, Result};
pub use random::{audit_boundary, random_string};
pub use transformations::{Registry, TransformFn, TransformationPipeline, Transformed};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
