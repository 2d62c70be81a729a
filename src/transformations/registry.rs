//! Name to function registry for transformations.

use super::{
    base64_decode, base64_decode_ext, base64_encode, cmd_line, compress_whitespace, css_decode,
    escape_seq_decode, hex_decode, hex_encode, html_entity_decode, js_decode, length, lowercase,
    md5, none, normalize_path, normalize_path_win, remove_comments, remove_comments_char,
    remove_nulls, remove_whitespace, replace_comments, replace_nulls, reverse, sha1, trim,
    trim_left, trim_right, uppercase, url_decode, url_decode_uni, url_encode, utf8_to_unicode,
    TransformFn,
};
use crate::error::{Error, Result};
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;

/// Registry installed by the host at startup.
static INSTALLED: OnceCell<Registry> = OnceCell::new();

/// Built-in registry used when nothing was installed.
static BUILTIN: Lazy<Registry> = Lazy::new(Registry::with_builtins);

/// Maps case-insensitive transformation names to functions.
#[derive(Clone, Default)]
pub struct Registry {
    transformations: HashMap<String, TransformFn>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in transformation.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("base64Decode", base64_decode);
        registry.register("base64DecodeExt", base64_decode_ext);
        registry.register("base64Encode", base64_encode);
        registry.register("cmdLine", cmd_line);
        registry.register("compressWhitespace", compress_whitespace);
        registry.register("cssDecode", css_decode);
        registry.register("escapeSeqDecode", escape_seq_decode);
        registry.register("hexDecode", hex_decode);
        registry.register("hexEncode", hex_encode);
        registry.register("htmlEntityDecode", html_entity_decode);
        registry.register("jsDecode", js_decode);
        registry.register("length", length);
        registry.register("lowercase", lowercase);
        registry.register("md5", md5);
        registry.register("none", none);
        registry.register("normalisePath", normalize_path);
        registry.register("normalisePathWin", normalize_path_win);
        registry.register("normalizePath", normalize_path);
        registry.register("normalizePathWin", normalize_path_win);
        registry.register("removeComments", remove_comments);
        registry.register("removeCommentsChar", remove_comments_char);
        registry.register("removeNulls", remove_nulls);
        registry.register("removeWhitespace", remove_whitespace);
        registry.register("replaceComments", replace_comments);
        registry.register("replaceNulls", replace_nulls);
        registry.register("reverse", reverse);
        registry.register("sha1", sha1);
        registry.register("trim", trim);
        registry.register("trimLeft", trim_left);
        registry.register("trimRight", trim_right);
        registry.register("uppercase", uppercase);
        registry.register("urlDecode", url_decode);
        registry.register("urlDecodeUni", url_decode_uni);
        registry.register("urlEncode", url_encode);
        registry.register("utf8toUnicode", utf8_to_unicode);
        registry
    }

    /// Register a transformation. An existing entry with the same name
    /// (ignoring case) is replaced.
    pub fn register(&mut self, name: &str, transformation: TransformFn) {
        let key = name.to_ascii_lowercase();
        if self.transformations.insert(key, transformation).is_some() {
            tracing::debug!(name = %name, "Replaced registered transformation");
        }
    }

    /// Look up a transformation by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<TransformFn> {
        self.transformations
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| Error::unknown(name))
    }

    /// Check whether a transformation is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.transformations
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Registered names (lowercase), sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transformations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("transformations", &self.names())
            .finish()
    }
}

/// Install the process-wide registry. Only the first call succeeds.
pub fn install(registry: Registry) -> Result<()> {
    let count = registry.len();
    INSTALLED
        .set(registry)
        .map_err(|_| Error::RegistryInstalled)?;
    tracing::debug!(transformations = count, "Installed transformation registry");
    Ok(())
}

/// The installed registry, or the built-in one if none was installed.
pub fn global() -> &'static Registry {
    INSTALLED.get().unwrap_or_else(|| Lazy::force(&BUILTIN))
}

/// Look up a transformation in the process-wide registry.
pub fn get(name: &str) -> Result<TransformFn> {
    global().get(name)
}
