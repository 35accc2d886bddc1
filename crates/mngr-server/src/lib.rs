//! HTTP server for the mngr content editor.
//!
//! Serves a small HTML interface for browsing, viewing, editing and creating
//! text files below a single data root.
//!
//! # Routes
//!
//! | Route                         | Method     | Effect                          |
//! |-------------------------------|------------|---------------------------------|
//! | `/list/{dir}`                 | GET        | Directory listing               |
//! | `/view/{path}`                | GET        | Page, or redirect to edit       |
//! | `/edit/{path}`                | GET        | Edit form                       |
//! | `/save/{path}`                | POST       | Persist form field `body`       |
//! | `/folder/{path}`              | GET, POST  | Create a folder                 |
//! | `/new/{file,folder}`          | GET        | Name form for new entries       |
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mngr_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         data_root: PathBuf::from("data"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Request Pipeline
//!
//! ```text
//! request ──► access log ──► security headers ──► router
//!                                                   │
//!                                                   ├─► path validation (400 on rejection)
//!                                                   │       │
//!                                                   │       └─► request context
//!                                                   │
//!                                                   └─► dispatch ──► handler ──► storage / templates
//! ```

mod app;
mod context;
mod error;
mod handlers;
mod middleware;
mod state;
mod templates;
mod validation;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use mngr_storage::{FsStorage, Storage};
use regex::Regex;
use state::AppState;

pub use templates::{RenderEngine, RenderError, TemplateEngine};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding all pages and folders.
    pub data_root: PathBuf,
    /// Directory with template overrides (`None` uses built-ins only).
    pub templates_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_root: PathBuf::from("data"),
            templates_dir: None,
        }
    }
}

/// Run the server.
///
/// Creates the data root if it does not exist yet, then serves until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the data root can't be created, templates fail to
/// load, or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&config.data_root)?;

    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.data_root.clone()));
    let renderer: Arc<dyn RenderEngine> =
        Arc::new(TemplateEngine::new(config.templates_dir.as_deref())?);
    let state = AppState {
        storage,
        renderer,
        name_rule: Regex::new(handlers::new::NAME_PATTERN)?,
    };

    let app = app::create_router(state);

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        data_root = %config.data_root.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mngr config.
///
/// # Arguments
///
/// * `config` - Loaded configuration
#[must_use]
pub fn server_config_from_config(config: &mngr_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        data_root: config.data_resolved.root.clone(),
        templates_dir: config.templates_resolved.dir.clone(),
    }
}
