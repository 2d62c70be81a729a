//! Transformation pipeline.

use super::registry::{self, Registry};
use super::{TransformFn, Transformed};
use crate::bytes::{fast_equal_fold, maybe_remove_quotes};
use crate::error::Result;
use std::borrow::Cow;

#[derive(Clone)]
struct Step {
    name: String,
    apply: TransformFn,
}

/// A pipeline of transformations to apply in sequence.
#[derive(Clone)]
pub struct TransformationPipeline {
    steps: Vec<Step>,
}

impl TransformationPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Create a pipeline from transformation names, resolved through the
    /// process-wide registry.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::from_names_in(registry::global(), names)
    }

    /// Create a pipeline from transformation names, resolved through `registry`.
    ///
    /// `none` drops every transformation collected before it.
    pub fn from_names_in<S: AsRef<str>>(registry: &Registry, names: &[S]) -> Result<Self> {
        let mut pipeline = Self::new();

        for name in names {
            let name = maybe_remove_quotes(name.as_ref().trim());
            if fast_equal_fold(name.as_bytes(), b"none") {
                pipeline.steps.clear();
                continue;
            }

            let apply = registry.get(name)?;
            pipeline.add(name, apply);
        }

        Ok(pipeline)
    }

    /// Add a transformation to the pipeline.
    pub fn add(&mut self, name: &str, apply: TransformFn) {
        self.steps.push(Step {
            name: name.to_string(),
            apply,
        });
    }

    /// Apply all transformations in sequence.
    ///
    /// The result is marked changed if any step reported a change.
    pub fn apply<'a>(&self, input: &'a [u8]) -> Transformed<'a> {
        let mut value: Cow<'a, [u8]> = Cow::Borrowed(input);
        let mut changed = false;

        for step in &self.steps {
            value = match value {
                Cow::Borrowed(v) => {
                    let out = run_step(step, v);
                    changed |= out.is_changed();
                    out.into_value()
                }
                Cow::Owned(v) => {
                    let out = run_step(step, &v);
                    changed |= out.is_changed();
                    match out.into_value() {
                        Cow::Borrowed(_) => Cow::Owned(v),
                        Cow::Owned(new) => Cow::Owned(new),
                    }
                }
            };
        }

        Transformed { value, changed }
    }

    /// Apply all transformations, collecting the input and every value a
    /// step changed.
    ///
    /// The last collected value always equals the result of [`apply`](Self::apply).
    pub fn apply_each(&self, input: &[u8]) -> Vec<Vec<u8>> {
        let mut values = vec![input.to_vec()];

        for step in &self.steps {
            let current = values.last().map(Vec::as_slice).unwrap_or_default();
            let out = run_step(step, current);
            // md5("") reports no change but still yields the digest.
            if out.is_changed() || out.value() != current {
                let next = out.into_value().into_owned();
                values.push(next);
            }
        }

        values
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the number of transformations.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Names of the transformations, in order.
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Run one step. A failing step yields an empty value.
fn run_step<'a>(step: &Step, input: &'a [u8]) -> Transformed<'a> {
    match (step.apply)(input) {
        Ok(out) => {
            tracing::trace!(
                transformation = %step.name,
                changed = out.is_changed(),
                "Applied transformation"
            );
            out
        }
        Err(e) => {
            tracing::debug!(
                transformation = %step.name,
                error = %e,
                "Transformation failed, continuing with empty value"
            );
            Transformed::with_flag(Vec::new(), !input.is_empty())
        }
    }
}

impl Default for TransformationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransformationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformationPipeline")
            .field("transformations", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn apply_str(pipeline: &TransformationPipeline, input: &str) -> (String, bool) {
        let out = pipeline.apply(input.as_bytes());
        (
            String::from_utf8_lossy(out.value()).into_owned(),
            out.is_changed(),
        )
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = TransformationPipeline::new();
        let out = pipeline.apply(b"hello");
        assert_eq!(out.value(), b"hello");
        assert!(!out.is_changed());
        assert!(matches!(out.into_value(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_single_transformation() {
        let pipeline = TransformationPipeline::from_names(&["lowercase"]).unwrap();
        assert_eq!(apply_str(&pipeline, "HELLO"), ("hello".into(), true));
    }

    #[test]
    fn test_multiple_transformations() {
        let pipeline = TransformationPipeline::from_names(&["urlDecode", "lowercase"]).unwrap();
        assert_eq!(
            apply_str(&pipeline, "HELLO%20WORLD"),
            ("hello world".into(), true)
        );
    }

    #[test]
    fn test_changed_if_any_step_changed() {
        // The second step changes nothing, but the first did.
        let pipeline = TransformationPipeline::from_names(&["lowercase", "trim"]).unwrap();
        assert_eq!(apply_str(&pipeline, "ABC"), ("abc".into(), true));
        assert_eq!(apply_str(&pipeline, "abc"), ("abc".into(), false));
    }

    #[test]
    fn test_none_clears_pipeline() {
        let pipeline =
            TransformationPipeline::from_names(&["lowercase", "none", "uppercase"]).unwrap();
        assert_eq!(pipeline.names(), vec!["uppercase"]);
        assert_eq!(apply_str(&pipeline, "hello"), ("HELLO".into(), true));
    }

    #[test]
    fn test_quoted_names() {
        let names = vec!["'urlDecode'".to_string(), " \"NONE\" ".to_string(), "'trim'".to_string()];
        let pipeline = TransformationPipeline::from_names(names.as_slice()).unwrap();
        assert_eq!(pipeline.names(), vec!["trim"]);
    }

    #[test]
    fn test_unknown_name() {
        let err = TransformationPipeline::from_names(&["lowercase", "bogus"]).unwrap_err();
        assert_eq!(err, Error::unknown("bogus"));
    }

    #[test]
    fn test_explicit_registry() {
        let mut registry = Registry::new();
        registry.register("reverse", crate::transformations::reverse);
        let pipeline = TransformationPipeline::from_names_in(&registry, &["reverse"]).unwrap();
        assert_eq!(apply_str(&pipeline, "abc"), ("cba".into(), true));
        assert!(TransformationPipeline::from_names_in(&registry, &["lowercase"]).is_err());
    }

    #[test]
    fn test_decode_error_yields_empty_value() {
        let pipeline = TransformationPipeline::from_names(&["hexDecode", "length"]).unwrap();
        assert_eq!(apply_str(&pipeline, "zz"), ("0".into(), true));
    }

    #[test]
    fn test_apply_each() {
        let pipeline =
            TransformationPipeline::from_names(&["urlDecode", "trim", "lowercase"]).unwrap();
        let values = pipeline.apply_each(b"%41B");
        assert_eq!(values, vec![b"%41B".to_vec(), b"AB".to_vec(), b"ab".to_vec()]);
    }

    #[test]
    fn test_debug_lists_names() {
        let pipeline = TransformationPipeline::from_names(&["md5", "hexEncode"]).unwrap();
        assert_eq!(
            format!("{pipeline:?}"),
            r#"TransformationPipeline { transformations: ["md5", "hexEncode"] }"#
        );
    }
}
