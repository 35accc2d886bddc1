//! HTTP request handlers.
//!
//! Every business handler implements [`Handler`]: it receives the
//! [`RequestContext`] built by the validation middleware plus the buffered
//! request, and returns an [`Outcome`]. Handlers never look at the raw
//! request path.

pub(crate) mod folder;
pub(crate) mod list;
pub(crate) mod new;
pub(crate) mod pages;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::validation::{Command, ValidatedUrl};

/// Result of running a handler.
pub(crate) enum Outcome {
    /// The handler produced the complete response.
    Responded(Response),
    /// The handler produced nothing; dispatch renders the error.
    Failed(HandlerError),
}

impl From<Result<Response, HandlerError>> for Outcome {
    fn from(result: Result<Response, HandlerError>) -> Self {
        match result {
            Ok(response) => Self::Responded(response),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Uniform shape of all business handlers.
///
/// Handlers are built once at startup and shared by all requests, so any
/// configuration they need is captured at construction.
pub(crate) trait Handler: Send + Sync {
    /// Handle one request.
    fn serve(&self, cx: &RequestContext, req: &IncomingRequest) -> Outcome;
}

/// Request head plus the buffered body.
pub(crate) struct IncomingRequest {
    parts: Parts,
    body: Bytes,
}

impl IncomingRequest {
    pub(crate) fn new(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    /// Decode the query string.
    pub(crate) fn query<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        let query = self.parts.uri.query().unwrap_or_default();
        Ok(serde_urlencoded::from_str(query)?)
    }

    /// Decode the body as `application/x-www-form-urlencoded`.
    pub(crate) fn form<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        Ok(serde_urlencoded::from_bytes(&self.body)?)
    }
}

#[cfg(test)]
impl IncomingRequest {
    /// Build a request with the given URI and body.
    pub(crate) fn for_test(uri: &str, body: &'static str) -> Self {
        let (parts, ()) = axum::http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Self::new(parts, Bytes::from_static(body.as_bytes()))
    }
}

/// One step of the breadcrumb trail.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Crumb {
    /// Folder name.
    name: String,
    /// Logical path of the folder.
    path: String,
}

/// Fields every template receives.
#[derive(Debug, Serialize)]
pub(crate) struct TemplateInfo {
    /// Route command.
    command: &'static str,
    /// Directory of the target.
    dir: String,
    /// Target name.
    value: String,
    /// Full logical path.
    path: String,
    /// `path` with a trailing slash, empty at the root; links to children
    /// are built by appending a name.
    prefix: String,
    /// Folders leading to the listed directory (or the page's directory).
    crumbs: Vec<Crumb>,
}

impl TemplateInfo {
    pub(crate) fn from_url(url: &ValidatedUrl) -> Self {
        let path = url.path();
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let trail = if url.command() == Command::List {
            path.as_str()
        } else {
            url.dir()
        };

        let mut crumbs = Vec::new();
        let mut walked = String::new();
        for name in trail.split('/').filter(|s| !s.is_empty()) {
            if !walked.is_empty() {
                walked.push('/');
            }
            walked.push_str(name);
            crumbs.push(Crumb {
                name: name.to_owned(),
                path: walked.clone(),
            });
        }

        Self {
            command: url.command().as_str(),
            dir: url.dir().to_owned(),
            value: url.value().to_owned(),
            path,
            prefix,
            crumbs,
        }
    }
}

/// Render `view` with template `name` as a `200` HTML response.
pub(crate) fn render<T: Serialize>(
    cx: &RequestContext,
    name: &str,
    view: &T,
) -> Result<Response, HandlerError> {
    let data = serde_json::to_value(view).map_err(crate::templates::RenderError::from)?;
    let html = cx.renderer().execute_template(name, &data)?;
    Ok(Html(html).into_response())
}

/// `302 Found` redirect to `location`.
///
/// Fails when `location` cannot be sent as a header value, so the caller
/// reports it like any other handler failure.
pub(crate) fn found(location: &str) -> Result<Response, HandlerError> {
    let value = HeaderValue::from_str(location)?;
    let mut response = StatusCode::FOUND.into_response();
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}

/// Plain-text response with the given status.
pub(crate) fn plain_text(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
