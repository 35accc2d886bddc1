//! Error types for the HTTP server.

use mngr_storage::StorageError;

use crate::context::ContextError;
use crate::templates::RenderError;

/// Failure reported by a handler that did not produce a response.
///
/// Dispatch turns every variant into a `500` whose body is the error text.
#[derive(Debug, thiserror::Error)]
pub(crate) enum HandlerError {
    /// Storage read or write failed.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Template rendering failed.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// Handler was reached without a complete request context.
    #[error("{0}")]
    Context(#[from] ContextError),

    /// Request body could not be read.
    #[error("reading request body: {0}")]
    Body(String),

    /// Request body or query string is not valid form data.
    #[error("decoding form data: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// Redirect target cannot be sent as a `Location` header.
    #[error("invalid redirect location: {0}")]
    Redirect(#[from] axum::http::header::InvalidHeaderValue),

    /// Stored page is not UTF-8 and cannot be edited as text.
    #[error("page {path} is not valid UTF-8 text: {source}")]
    NotText {
        /// Logical page path.
        path: String,
        /// Decoding failure.
        source: std::str::Utf8Error,
    },
}
