//! A single configuration source: one named origin of flat key/value pairs

use super::ConfigError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Separator between hierarchy segments in a flattened key.
pub const KEY_SEPARATOR: char = ':';

/// One origin of configuration values (file, environment, override, remote).
///
/// Keys are colon-delimited hierarchical paths (`spring:cloud:config:uri`)
/// and values are plain strings. Lookups are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    origin: String,
    values: BTreeMap<String, String>,
}

impl ConfigSource {
    /// Create an empty source labelled with its origin (used in logging).
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            values: BTreeMap::new(),
        }
    }

    /// Build a source from explicit key/value pairs.
    pub fn from_pairs(
        origin: impl Into<String>,
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            origin: origin.into(),
            values: pairs.into_iter().collect(),
        }
    }

    /// Load and flatten a hierarchical JSON file.
    ///
    /// A missing file yields `Ok(None)`; a file that exists but does not
    /// parse as a JSON object is a [`ConfigError::MalformedFile`].
    pub fn from_json_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document: Map<String, Value> =
            serde_json::from_str(&contents).map_err(|source| ConfigError::MalformedFile {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::new(path.display().to_string());
        for (key, value) in &document {
            config.absorb(key, value);
        }
        debug!(
            "Loaded {} configuration values from {}",
            config.len(),
            path.display()
        );
        Ok(Some(config))
    }

    /// Collect environment variables carrying `prefix` into the
    /// configuration namespace.
    ///
    /// The prefix is stripped and any `__` in the remainder maps to the
    /// hierarchy separator, so `SPRING_SCRAP_URI` becomes `URI` and
    /// `SPRING_SCRAP_SERVICE__NAME` becomes `SERVICE:NAME`.
    pub fn from_env_prefix(prefix: &str) -> Self {
        let mut config = Self::new(format!("environment ({prefix}*)"));
        for (name, value) in std::env::vars() {
            if let Some(stripped) = name.strip_prefix(prefix) {
                let key = stripped.replace("__", &KEY_SEPARATOR.to_string());
                config.set(key, value);
            }
        }
        config
    }

    /// Flatten a JSON value into this source under `key`.
    ///
    /// Scalars stringify (null becomes the empty string); objects and
    /// arrays recurse with name or index segments.
    pub fn absorb(&mut self, key: &str, value: &Value) {
        match value {
            Value::Null => self.set(key, String::new()),
            Value::Bool(b) => self.set(key, b.to_string()),
            Value::Number(n) => self.set(key, n.to_string()),
            Value::String(s) => self.set(key, s.clone()),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.absorb(&join_key(key, &index.to_string()), item);
                }
            }
            Value::Object(map) => {
                for (name, item) in map {
                    self.absorb(&join_key(key, name), item);
                }
            }
        }
    }

    /// Set a single value, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Origin label for this source.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Iterate over all key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of values in this source.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this source holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Join a parent key and a child segment with the hierarchy separator.
fn join_key(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}{KEY_SEPARATOR}{segment}")
    }
}
