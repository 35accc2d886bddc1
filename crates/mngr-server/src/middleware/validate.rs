//! Request path validation middleware.
//!
//! Runs in front of every command route. A path that fails validation is
//! answered with `400` here and never reaches a handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Extensions, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use super::dispatch::failure_response;
use super::logging::ErrorNote;
use crate::context::{ContextError, with_renderer, with_validated};
use crate::handlers::plain_text;
use crate::templates::RenderEngine;
use crate::validation::{ValidatedUrl, ValidationError};

/// Validate the request path and attach the request context.
pub(crate) async fn validate_request(
    State(renderer): State<Arc<dyn RenderEngine>>,
    mut req: Request,
    next: Next,
) -> Response {
    let url = match ValidatedUrl::parse(req.uri().path()) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(path = %req.uri().path(), error = %err, "Rejected request path");
            return rejection(&err);
        }
    };

    if let Err(err) = attach(req.extensions_mut(), url, renderer) {
        return failure_response(&err.into());
    }

    next.run(req).await
}

fn attach(
    extensions: &mut Extensions,
    url: ValidatedUrl,
    renderer: Arc<dyn RenderEngine>,
) -> Result<(), ContextError> {
    with_validated(extensions, url)?;
    with_renderer(extensions, renderer)
}

fn rejection(err: &ValidationError) -> Response {
    let message = err.to_string();
    let mut response = plain_text(StatusCode::BAD_REQUEST, format!("bad request: {message}\n"));
    response.extensions_mut().insert(ErrorNote(message));
    response
}
