//! spring-scrap - fetch Spring Cloud Config Server configuration to disk
//!
//! A one-shot CLI: layer local configuration (file, environment), resolve
//! the config server URI, fetch the named service/environment document,
//! then write the merged, sanitized result as a JSON file.

use clap::Parser;

mod cli;

use cli::Cli;

fn main() {
    spring_scrap_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
