//! Layered configuration
//!
//! Configuration is composed from ordered sources with priority
//! (lowest to highest):
//! 1. Local `appsettings.json` (optional)
//! 2. `SPRING_SCRAP_`-prefixed environment variables
//! 3. In-memory overrides (service/environment/uri)
//! 4. Remote config-server result

mod layered;
mod source;
mod tree;

pub use layered::{ENV_PREFIX, LOCAL_CONFIG_FILE, LayeredConfig};
pub use source::{ConfigSource, KEY_SEPARATOR};
pub use tree::to_tree;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local configuration file present but not valid JSON
    #[error("Malformed configuration file {path:?}: {source}")]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
