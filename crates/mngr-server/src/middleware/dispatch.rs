//! Handler dispatch.
//!
//! Adapts a [`Handler`] to an axum route: reads the request context, buffers
//! the body and turns the handler's [`Outcome`] into the final response.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter, on};

use super::logging::ErrorNote;
use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::handlers::{Handler, IncomingRequest, Outcome, plain_text};

/// Largest request body dispatch will buffer.
pub(crate) const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Route `handler` for the methods in `filter`.
pub(crate) fn endpoint<H>(filter: MethodFilter, handler: Arc<H>) -> MethodRouter
where
    H: Handler + 'static,
{
    on(filter, move |req: Request| {
        let handler = Arc::clone(&handler);
        async move { serve(handler.as_ref(), req).await }
    })
}

/// Run one request through `handler`.
pub(crate) async fn serve<H>(handler: &H, req: Request) -> Response
where
    H: Handler + ?Sized,
{
    let (parts, body) = req.into_parts();
    let cx = match RequestContext::from_extensions(&parts.extensions) {
        Ok(cx) => cx,
        Err(err) => return failure_response(&err.into()),
    };
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(err) => return failure_response(&HandlerError::Body(err.to_string())),
    };
    finalize(handler.serve(&cx, &IncomingRequest::new(parts, body)))
}

/// Response for a finished handler.
pub(crate) fn finalize(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Responded(response) => response,
        Outcome::Failed(err) => failure_response(&err),
    }
}

/// `500` response carrying the error text, annotated for the access log.
pub(crate) fn failure_response(err: &HandlerError) -> Response {
    let message = err.to_string();
    let mut response = plain_text(StatusCode::INTERNAL_SERVER_ERROR, format!("{message}\n"));
    response.extensions_mut().insert(ErrorNote(message));
    response
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, header};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::{with_renderer, with_validated};
    use crate::handlers::found;
    use crate::templates::RecordingEngine;
    use crate::validation::ValidatedUrl;

    /// Handler returning a fixed outcome kind.
    enum Fixed {
        Redirect,
        Fail,
        EchoBody,
    }

    impl Handler for Fixed {
        fn serve(&self, _cx: &RequestContext, req: &IncomingRequest) -> Outcome {
            match self {
                Self::Redirect => Outcome::Responded(found("/list/").unwrap()),
                Self::Fail => Outcome::Failed(HandlerError::Body("disk on fire".to_owned())),
                Self::EchoBody => {
                    #[derive(serde::Deserialize)]
                    struct Form {
                        body: String,
                    }
                    req.form::<Form>()
                        .map(|form| plain_text(StatusCode::OK, form.body))
                        .into()
                }
            }
        }
    }

    fn request(path: &str, body: impl Into<Body>) -> Request {
        let mut req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(body.into())
            .unwrap();
        with_validated(req.extensions_mut(), ValidatedUrl::parse(path).unwrap()).unwrap();
        with_renderer(req.extensions_mut(), Arc::new(RecordingEngine::default())).unwrap();
        req
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_responded_passes_through() {
        let response = serve(&Fixed::Redirect, request("/view/a.txt", "")).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(response.extensions().get::<ErrorNote>().is_none());
    }

    #[tokio::test]
    async fn test_failed_becomes_500_with_error_text() {
        let response = serve(&Fixed::Fail, request("/view/a.txt", "")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            response.extensions().get::<ErrorNote>().map(|n| n.0.as_str()),
            Some("reading request body: disk on fire")
        );
        assert_eq!(
            body_text(response).await,
            "reading request body: disk on fire\n"
        );
    }

    #[tokio::test]
    async fn test_body_is_buffered_for_handler() {
        let response = serve(&Fixed::EchoBody, request("/save/a.txt", "body=hi")).await;

        assert_eq!(body_text(response).await, "hi");
    }

    #[tokio::test]
    async fn test_oversized_body_fails() {
        let body = format!("body={}", "x".repeat(MAX_BODY_BYTES));

        let response = serve(&Fixed::EchoBody, request("/save/a.txt", body)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_context_fails_fast() {
        let req = Request::builder()
            .uri("/view/a.txt")
            .body(Body::empty())
            .unwrap();

        let response = serve(&Fixed::Redirect, req).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "request URL was not validated\n"
        );
    }
}
