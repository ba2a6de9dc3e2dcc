//! Ordered layering of configuration sources

use super::source::ConfigSource;
use super::{ConfigError, tree};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// File name of the optional local configuration document.
pub const LOCAL_CONFIG_FILE: &str = "appsettings.json";

/// Prefix of environment variables folded into the configuration namespace.
pub const ENV_PREFIX: &str = "SPRING_SCRAP_";

/// An ordered stack of configuration sources.
///
/// Later sources override earlier ones for identical keys. The stack is
/// built once per run and passed by value through the pipeline; stages
/// extend it with [`LayeredConfig::push`] but never reorder it.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    sources: Vec<ConfigSource>,
}

impl LayeredConfig {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the base configuration for `dir`: the optional local
    /// `appsettings.json` first, then `SPRING_SCRAP_`-prefixed environment
    /// variables, so the environment overrides the file.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut layered = Self::new();

        match ConfigSource::from_json_file(&dir.join(LOCAL_CONFIG_FILE))? {
            Some(file) => layered.push(file),
            None => debug!("No {LOCAL_CONFIG_FILE} in {}", dir.display()),
        }

        layered.push(ConfigSource::from_env_prefix(ENV_PREFIX));
        Ok(layered)
    }

    /// Append a source as the new highest-precedence layer.
    pub fn push(&mut self, source: ConfigSource) {
        debug!(
            "Layering {} configuration values from {}",
            source.len(),
            source.origin()
        );
        self.sources.push(source);
    }

    /// Look up a key; the last layer defining it wins, even with an empty
    /// value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sources.iter().rev().find_map(|source| source.get(key))
    }

    /// Like [`LayeredConfig::get`], but absence and an empty winning value
    /// are both `None`. Fallback decisions use this form.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Collapse the stack into a single flat map honoring precedence.
    pub fn merged(&self) -> BTreeMap<&str, &str> {
        let mut flat = BTreeMap::new();
        for source in &self.sources {
            for (key, value) in source.iter() {
                flat.insert(key, value);
            }
        }
        flat
    }

    /// Render the merged configuration as a nested JSON tree.
    pub fn to_tree(&self) -> Value {
        tree::to_tree(self.merged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn source(origin: &str, pairs: &[(&str, &str)]) -> ConfigSource {
        ConfigSource::from_pairs(
            origin,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_later_layer_wins() {
        let mut layered = LayeredConfig::new();
        layered.push(source("file", &[("URI", "http://file:1111"), ("only", "file")]));
        layered.push(source("env", &[("URI", "http://env:2222")]));

        assert_eq!(layered.get("URI"), Some("http://env:2222"));
        assert_eq!(layered.get("only"), Some("file"));
    }

    #[test]
    fn test_empty_winning_value_shadows() {
        // A later layer that defines the key as empty still wins the lookup;
        // fallback decisions then treat the key as unset.
        let mut layered = LayeredConfig::new();
        layered.push(source("file", &[("URI", "http://file:1111")]));
        layered.push(source("env", &[("URI", "")]));

        assert_eq!(layered.get("URI"), Some(""));
        assert_eq!(layered.get_non_empty("URI"), None);
    }

    #[test]
    fn test_get_non_empty_absent() {
        let layered = LayeredConfig::new();
        assert_eq!(layered.get_non_empty("URI"), None);
    }

    #[test]
    fn test_merged_honors_precedence() {
        let mut layered = LayeredConfig::new();
        layered.push(source("file", &[("a", "1"), ("b", "2")]));
        layered.push(source("env", &[("b", "3"), ("c", "4")]));

        let flat = layered.merged();
        assert_eq!(flat.get("a"), Some(&"1"));
        assert_eq!(flat.get("b"), Some(&"3"));
        assert_eq!(flat.get("c"), Some(&"4"));
    }

    #[test]
    #[serial]
    fn test_load_env_overrides_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(LOCAL_CONFIG_FILE),
            r#"{ "URI": "http://file:1111", "retained": "yes" }"#,
        )
        .unwrap();

        unsafe {
            std::env::set_var("SPRING_SCRAP_URI", "http://env:2222");
        }

        let layered = LayeredConfig::load(temp_dir.path()).unwrap();
        assert_eq!(layered.get("URI"), Some("http://env:2222"));
        assert_eq!(layered.get("retained"), Some("yes"));

        unsafe {
            std::env::remove_var("SPRING_SCRAP_URI");
        }
    }

    #[test]
    #[serial]
    fn test_load_without_file_is_env_only() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        unsafe {
            std::env::set_var("SPRING_SCRAP_URI", "http://env:2222");
        }

        let layered = LayeredConfig::load(temp_dir.path()).unwrap();
        assert_eq!(layered.get("URI"), Some("http://env:2222"));

        unsafe {
            std::env::remove_var("SPRING_SCRAP_URI");
        }
    }

    #[test]
    fn test_load_malformed_file_is_fatal() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(LOCAL_CONFIG_FILE), "{ nope").unwrap();

        let result = LayeredConfig::load(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::MalformedFile { .. })));
    }
}
