//! `mngr serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mngr_config::{CliSettings, Config};
use mngr_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::logging;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mngr.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory holding pages and folders (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with template overrides (overrides config).
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Append access log records to this file instead of stderr.
    #[arg(long, env = "MNGR_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            data_root: self.data_dir,
            templates_dir: self.templates,
            log_file: self.log_file,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        logging::init(self.verbose, config.log_resolved.file.as_deref())?;

        output.highlight(&format!(
            "Serving on http://{}:{}/",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Data directory: {}",
            config.data_resolved.root.display()
        ));
        if let Some(dir) = &config.templates_resolved.dir {
            output.info(&format!("Templates: {}", dir.display()));
        }
        if let Some(file) = &config.log_resolved.file {
            output.info(&format!("Access log: {}", file.display()));
        }

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
