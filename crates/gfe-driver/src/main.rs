//! gfe-driver - configures a benchmark run of a graph library

mod cli;
mod error;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use cli::Cli;
use error::Result;
use libgfe_core::{
    global, load_parameter_file, Configuration, LibraryRegistry, LineSink, SerializedSink,
};

fn main() {
    let cli = Cli::parse();
    libgfe_core::logging::init_tracing(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = LibraryRegistry::with_defaults();
    let sink = SerializedSink::stdout();

    if cli.list_libraries {
        for name in registry.names() {
            sink.write_line(&name);
        }
        return Ok(());
    }

    let mut params = match &cli.config {
        Some(path) => load_parameter_file(path)?,
        None => Vec::new(),
    };
    params.extend(cli.to_parameters());

    let mut config = Configuration::new();
    config.initialise(params, &registry)?;
    let config: Arc<Configuration> = global::install(config)?;

    config.log_summary(&sink);

    if config.has_database() {
        config.save_parameters()?;
        info!(path = %config.database_path().display(), "parameters saved");
    }

    let library = config.generate_graph_library()?;
    info!(
        library = library.name(),
        directed = library.is_directed(),
        "library ready"
    );

    // The process-wide instance is never dropped; flush explicitly.
    if config.has_database() {
        config.db()?.flush()?;
    }
    Ok(())
}
