//! Access logging.
//!
//! Emits exactly one record per request, after the response is complete,
//! under the [`ACCESS_TARGET`] target.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Tracing target of access records.
pub(crate) const ACCESS_TARGET: &str = "mngr::access";

/// Error text attached to a response for the access log.
#[derive(Clone, Debug)]
pub(crate) struct ErrorNote(pub(crate) String);

/// Log remote address, latency, status, method, path and error of a request.
pub(crate) async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_owned(), |ConnectInfo(addr)| addr.to_string());
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let error = response
        .extensions()
        .get::<ErrorNote>()
        .map(|note| note.0.as_str());
    tracing::info!(
        target: ACCESS_TARGET,
        remote = %remote,
        elapsed = format_args!("{elapsed_ms:.3}ms"),
        code = response.status().as_u16(),
        method = %method,
        path = %path,
        error,
        "request"
    );

    response
}
