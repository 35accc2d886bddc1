//! mngr CLI - minimal file-backed content editor.
//!
//! Provides commands for:
//! - `serve`: Start the editor server

mod commands;
mod error;
mod logging;
mod output;

use clap::{Parser, Subcommand};

use commands::ServeArgs;
use output::Output;

/// mngr - browse and edit text files over HTTP.
#[derive(Parser)]
#[command(name = "mngr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the editor server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
