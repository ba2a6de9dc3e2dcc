//! Core library for spring-scrap
//!
//! Provides the configuration pipeline behind the `spring-scrap` binary:
//! layered local configuration (file and environment sources with strict
//! precedence), config-server URI resolution, a synchronous Spring Cloud
//! Config Server client, and the sanitizing JSON writer.
//!
//! The pipeline is single-pass: a [`config::LayeredConfig`] is built once,
//! extended with the override and remote layers, rendered as a tree, and
//! discarded. No state persists between runs except the output file.

pub mod client;
pub mod config;
pub mod logging;
pub mod output;

pub use client::{ConfigServerClient, FetchError, resolve_server_uri};
pub use config::{ConfigError, ConfigSource, LayeredConfig};
pub use output::{OutputError, sanitize, write_document};
