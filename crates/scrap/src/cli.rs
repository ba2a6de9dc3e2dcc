//! CLI definition and the fetch pipeline

use anyhow::Result;
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use spring_scrap_core::client::{self, ConfigServerClient};
use spring_scrap_core::config::{ConfigSource, LayeredConfig};
use spring_scrap_core::output;
use std::path::Path;
use tracing::debug;

/// Default output file name.
const DEFAULT_OUTPUT: &str = "appsettings.spring.json";

/// Fetch configuration from a Spring Cloud Config Server and save it as a
/// JSON file
#[derive(Parser, Debug)]
#[command(
    name = "spring-scrap",
    version,
    about = "Fetch configuration from a Spring Cloud Config Server and save it as a JSON file"
)]
pub struct Cli {
    /// Service name to get configuration for
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    service: String,

    /// Environment name to get configuration for
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    environment: String,

    /// Name of the output JSON file (opened in append mode)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Explicit config server URI, taking precedence over the URI
    /// environment fallback
    #[arg(short = 'u', long)]
    spring_uri: Option<String>,
}

impl Cli {
    /// Run the pipeline: layer local configuration, resolve the server URI,
    /// fetch the remote document, then sanitize and write the output file.
    pub fn execute(self) -> Result<()> {
        let current_dir = std::env::current_dir()?;
        let mut config = LayeredConfig::load(&current_dir)?;

        // Soft stop when no URI is configured anywhere: guidance on stdout,
        // no output file, zero exit.
        let Some(uri) = client::resolve_server_uri(&config, self.spring_uri.as_deref()) else {
            print_uri_guidance();
            return Ok(());
        };
        debug!("Resolved config server URI: {uri}");

        let mut overrides = ConfigSource::new("overrides");
        overrides.set(client::APPLICATION_NAME_KEY, &self.service);
        overrides.set(client::CONFIG_ENV_KEY, &self.environment);
        if config.get_non_empty(client::URI_KEY).is_none() {
            overrides.set(client::URI_KEY, &uri);
        }
        config.push(overrides);

        let label = config
            .get_non_empty(client::LABEL_KEY)
            .map(str::to_owned);
        let remote = ConfigServerClient::new(&uri)?.fetch(
            &self.service,
            &self.environment,
            label.as_deref(),
        )?;
        config.push(remote);

        let mut tree = config.to_tree();
        output::sanitize(&mut tree);
        output::write_document(Path::new(&self.output), &tree)?;

        println!(
            "Configuration for service '{}' in environment '{}' appended to '{}'",
            self.service, self.environment, self.output
        );
        Ok(())
    }
}

/// Remediation guidance printed when no config server URI is available.
fn print_uri_guidance() {
    println!(
        "Spring Cloud Config URI is missing, set it with --spring-uri or the SPRING_SCRAP_URI environment variable."
    );
    println!("  windows: set SPRING_SCRAP_URI=http://spring:8080");
    println!("  unix:    export SPRING_SCRAP_URI=http://spring:8080");
}
