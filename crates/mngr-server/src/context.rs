//! Per-request context.
//!
//! The validation middleware stores the [`ValidatedUrl`] and the render engine
//! in the request extensions; dispatch reads them back as a
//! [`RequestContext`] before calling a handler. Each value is written once per
//! request, and a missing value is reported instead of defaulted.

use std::sync::Arc;

use axum::http::Extensions;

use crate::templates::RenderEngine;
use crate::validation::ValidatedUrl;

/// Context read failure.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ContextError {
    /// Request reached a handler without passing validation.
    #[error("request URL was not validated")]
    NotValidated,
    /// No render engine attached to the request.
    #[error("no render engine attached to request")]
    MissingRenderer,
    /// A context value was written twice.
    #[error("{0} already set for this request")]
    AlreadySet(&'static str),
}

/// Render engine handle as stored in request extensions.
#[derive(Clone)]
struct RendererHandle(Arc<dyn RenderEngine>);

/// Attach the validated URL to a request.
pub(crate) fn with_validated(
    extensions: &mut Extensions,
    url: ValidatedUrl,
) -> Result<(), ContextError> {
    if extensions.get::<ValidatedUrl>().is_some() {
        return Err(ContextError::AlreadySet("validated URL"));
    }
    extensions.insert(url);
    Ok(())
}

/// Validated URL attached to a request, if any.
pub(crate) fn validated_from(extensions: &Extensions) -> Option<&ValidatedUrl> {
    extensions.get::<ValidatedUrl>()
}

/// Attach the render engine to a request.
pub(crate) fn with_renderer(
    extensions: &mut Extensions,
    renderer: Arc<dyn RenderEngine>,
) -> Result<(), ContextError> {
    if extensions.get::<RendererHandle>().is_some() {
        return Err(ContextError::AlreadySet("render engine"));
    }
    extensions.insert(RendererHandle(renderer));
    Ok(())
}

/// Render engine attached to a request, if any.
pub(crate) fn renderer_from(extensions: &Extensions) -> Option<&Arc<dyn RenderEngine>> {
    extensions.get::<RendererHandle>().map(|handle| &handle.0)
}

/// Everything a handler may know about the current request besides the raw
/// HTTP parts.
#[derive(Clone)]
pub(crate) struct RequestContext {
    url: ValidatedUrl,
    renderer: Arc<dyn RenderEngine>,
}

impl RequestContext {
    /// Read the context written by the validation middleware.
    pub(crate) fn from_extensions(extensions: &Extensions) -> Result<Self, ContextError> {
        let url = validated_from(extensions).ok_or(ContextError::NotValidated)?;
        let renderer = renderer_from(extensions).ok_or(ContextError::MissingRenderer)?;
        Ok(Self {
            url: url.clone(),
            renderer: Arc::clone(renderer),
        })
    }

    /// Validated request URL.
    pub(crate) fn url(&self) -> &ValidatedUrl {
        &self.url
    }

    /// Render engine for this request.
    pub(crate) fn renderer(&self) -> &dyn RenderEngine {
        self.renderer.as_ref()
    }
}

#[cfg(test)]
impl RequestContext {
    /// Build a context directly, bypassing the middleware.
    pub(crate) fn for_test(raw_path: &str, renderer: Arc<dyn RenderEngine>) -> Self {
        Self {
            url: ValidatedUrl::parse(raw_path).unwrap(),
            renderer,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::templates::RecordingEngine;

    fn url(raw: &str) -> ValidatedUrl {
        ValidatedUrl::parse(raw).unwrap()
    }

    #[test]
    fn test_validated_round_trip() {
        let mut extensions = Extensions::new();
        assert!(validated_from(&extensions).is_none());

        with_validated(&mut extensions, url("/view/a.txt")).unwrap();

        assert_eq!(validated_from(&extensions), Some(&url("/view/a.txt")));
    }

    #[test]
    fn test_validated_is_write_once() {
        let mut extensions = Extensions::new();
        with_validated(&mut extensions, url("/view/a.txt")).unwrap();

        let err = with_validated(&mut extensions, url("/view/b.txt")).unwrap_err();

        assert_eq!(err, ContextError::AlreadySet("validated URL"));
        assert_eq!(validated_from(&extensions), Some(&url("/view/a.txt")));
    }

    #[test]
    fn test_renderer_is_write_once() {
        let mut extensions = Extensions::new();
        let engine: Arc<dyn RenderEngine> = Arc::new(RecordingEngine::default());
        with_renderer(&mut extensions, Arc::clone(&engine)).unwrap();

        let err = with_renderer(&mut extensions, engine).unwrap_err();

        assert_eq!(err, ContextError::AlreadySet("render engine"));
        assert!(renderer_from(&extensions).is_some());
    }

    #[test]
    fn test_from_extensions_requires_validation() {
        let mut extensions = Extensions::new();
        with_renderer(&mut extensions, Arc::new(RecordingEngine::default())).unwrap();

        let err = RequestContext::from_extensions(&extensions).err();

        assert_eq!(err, Some(ContextError::NotValidated));
    }

    #[test]
    fn test_from_extensions_requires_renderer() {
        let mut extensions = Extensions::new();
        with_validated(&mut extensions, url("/list/")).unwrap();

        let err = RequestContext::from_extensions(&extensions).err();

        assert_eq!(err, Some(ContextError::MissingRenderer));
    }

    #[test]
    fn test_from_extensions_complete() {
        let mut extensions = Extensions::new();
        with_validated(&mut extensions, url("/edit/docs/a.txt")).unwrap();
        with_renderer(&mut extensions, Arc::new(RecordingEngine::default())).unwrap();

        let cx = RequestContext::from_extensions(&extensions).unwrap();

        assert_eq!(cx.url().path(), "docs/a.txt");
        assert_eq!(
            cx.renderer()
                .execute_template("edit.html", &serde_json::json!({}))
                .unwrap(),
            "rendered edit.html"
        );
    }
}
