//! Replays the transformation vectors in `tests/data/transformations.json`.

use serde::Deserialize;
use std::collections::BTreeSet;
use zentinel_transforms::{transformations, Registry};

const VECTORS: &str = include_str!("data/transformations.json");

#[derive(Debug, Deserialize)]
struct Vector {
    name: String,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    input_hex: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    output_hex: Option<String>,
    #[serde(default)]
    changed: Option<bool>,
    #[serde(default)]
    error: bool,
}

impl Vector {
    fn input(&self) -> Vec<u8> {
        match (&self.input, &self.input_hex) {
            (Some(s), None) => s.as_bytes().to_vec(),
            (None, Some(h)) => hex::decode(h).expect("bad input_hex"),
            _ => panic!("{}: exactly one of input/input_hex required", self.name),
        }
    }

    fn expected(&self) -> Option<Vec<u8>> {
        match (&self.output, &self.output_hex) {
            (Some(s), None) => Some(s.as_bytes().to_vec()),
            (None, Some(h)) => Some(hex::decode(h).expect("bad output_hex")),
            (None, None) => None,
            _ => panic!("{}: output and output_hex are exclusive", self.name),
        }
    }
}

fn load() -> Vec<Vector> {
    serde_json::from_str(VECTORS).expect("invalid vector file")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_vectors() {
    init_tracing();

    for (i, v) in load().iter().enumerate() {
        let f = transformations::get(&v.name).unwrap_or_else(|e| panic!("vector {i}: {e}"));
        let input = v.input();
        let result = f(&input);

        if v.error {
            assert!(result.is_err(), "vector {i} ({}): expected an error", v.name);
            continue;
        }

        let out = result.unwrap_or_else(|e| panic!("vector {i} ({}): {e}", v.name));
        if let Some(expected) = v.expected() {
            assert_eq!(
                out.value(),
                expected.as_slice(),
                "vector {i} ({}): got {:?}, want {:?}",
                v.name,
                String::from_utf8_lossy(out.value()),
                String::from_utf8_lossy(&expected),
            );
        }
        if let Some(changed) = v.changed {
            assert_eq!(out.is_changed(), changed, "vector {i} ({}): changed flag", v.name);
        }
    }
}

#[test]
fn test_vectors_cover_every_builtin() {
    let covered: BTreeSet<String> = load()
        .iter()
        .map(|v| v.name.to_ascii_lowercase())
        .collect();
    let registry = Registry::with_builtins();
    for name in registry.names() {
        assert!(covered.contains(name), "no vector for {name}");
    }
}

#[test]
fn test_vectors_resolve_case_insensitively() {
    for v in load() {
        let upper = v.name.to_ascii_uppercase();
        assert!(transformations::get(&upper).is_ok(), "{upper}");
    }
}
