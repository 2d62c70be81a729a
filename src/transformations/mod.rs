//! Transformation functions for ModSecurity.
//!
//! Every transformation has the same shape: bytes in, [`Transformed`] out.
//! They are plain functions so the rule engine can hold them as
//! [`TransformFn`] pointers resolved once through the [`Registry`].

mod comments;
mod decode;
mod encode;
mod escape;
mod normalize;
mod path;
mod pipeline;
mod registry;

pub use comments::*;
pub use decode::*;
pub use encode::*;
pub use escape::*;
pub use normalize::*;
pub use path::*;
pub use pipeline::TransformationPipeline;
pub use registry::{get, global, install, Registry};

use crate::error::Result;
use std::borrow::Cow;

/// Signature shared by every transformation.
pub type TransformFn = for<'a> fn(&'a [u8]) -> Result<Transformed<'a>>;

/// Output of a transformation: the value plus whether it differs from the input.
///
/// An unchanged value may borrow the input; a changed one always owns its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed<'a> {
    value: Cow<'a, [u8]>,
    changed: bool,
}

impl<'a> Transformed<'a> {
    /// The input, passed through untouched.
    pub fn unchanged(input: &'a [u8]) -> Self {
        Self {
            value: Cow::Borrowed(input),
            changed: false,
        }
    }

    /// A freshly produced value.
    pub fn changed(value: Vec<u8>) -> Self {
        Self {
            value: Cow::Owned(value),
            changed: true,
        }
    }

    /// Pick [`unchanged`](Self::unchanged) or [`changed`](Self::changed) by
    /// comparing `output` with `input`.
    pub fn compare(input: &'a [u8], output: Vec<u8>) -> Self {
        if output == input {
            Self::unchanged(input)
        } else {
            Self::changed(output)
        }
    }

    /// A value whose changed flag is decided by the caller (`length`, digests).
    pub fn with_flag(value: Vec<u8>, changed: bool) -> Self {
        Self {
            value: Cow::Owned(value),
            changed,
        }
    }

    /// The transformed bytes.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Whether the transformation reported a change.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Consume into the underlying value.
    pub fn into_value(self) -> Cow<'a, [u8]> {
        self.value
    }

    /// Detach from the input's lifetime.
    pub fn into_owned(self) -> Transformed<'static> {
        Transformed {
            value: Cow::Owned(self.value.into_owned()),
            changed: self.changed,
        }
    }
}

impl AsRef<[u8]> for Transformed<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.value
    }
}

/// None transformation (identity; clears a chain inside a pipeline).
pub fn none(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(Transformed::unchanged(input))
}

/// Length transformation (decimal byte length of the input).
///
/// Always reports a change, even when the input already equals its length.
pub fn length(input: &[u8]) -> Result<Transformed<'_>> {
    Ok(Transformed::with_flag(
        input.len().to_string().into_bytes(),
        true,
    ))
}
