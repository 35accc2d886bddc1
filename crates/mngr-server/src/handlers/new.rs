//! Creation form for new files and folders.
//!
//! `GET /new/file` and `GET /new/folder` show a name form. Submitting a valid
//! name redirects to the edit form (file) or the folder route (folder); the
//! target itself is only created by those routes.

use axum::http::StatusCode;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Handler, IncomingRequest, Outcome, TemplateInfo, found, plain_text, render};
use crate::context::RequestContext;

/// Names accepted for new files and folders.
pub(crate) const NAME_PATTERN: &str = "^[a-zA-Z0-9]+[a-zA-Z0-9.]*$";

/// Query parameters of `/new/{kind}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewQuery {
    /// Requested name; empty until the form is submitted.
    name: String,
    /// Directory prefix, with a trailing slash unless empty.
    path: String,
}

/// Data for `new.html`.
#[derive(Serialize)]
struct NewView {
    #[serde(flatten)]
    info: TemplateInfo,
    form_path: String,
    is_valid: bool,
}

/// What is being created.
#[derive(Clone, Copy)]
enum Kind {
    File,
    Folder,
}

impl Kind {
    fn from_value(value: &str) -> Option<Self> {
        match value {
            "file" => Some(Self::File),
            "folder" => Some(Self::Folder),
            _ => None,
        }
    }

    /// Route that completes the creation.
    fn target_route(self) -> &'static str {
        match self {
            Self::File => "/edit/",
            Self::Folder => "/folder/",
        }
    }
}

/// Handles `GET /new/{file|folder}?name=&path=`.
pub(crate) struct NewHandler {
    name_rule: Regex,
}

impl NewHandler {
    pub(crate) fn new(name_rule: Regex) -> Self {
        Self { name_rule }
    }
}

impl Handler for NewHandler {
    fn serve(&self, cx: &RequestContext, req: &IncomingRequest) -> Outcome {
        let Some(kind) = Kind::from_value(cx.url().value()) else {
            return Outcome::Responded(plain_text(
                StatusCode::BAD_REQUEST,
                "bad request".to_owned(),
            ));
        };

        let query = match req.query::<NewQuery>() {
            Ok(query) => query,
            Err(err) => return Outcome::Failed(err),
        };

        let is_valid = query.name.is_empty() || self.name_rule.is_match(&query.name);
        if is_valid && !query.name.is_empty() {
            let location = format!("{}{}{}", kind.target_route(), query.path, query.name);
            return found(&location).into();
        }

        let view = NewView {
            info: TemplateInfo::from_url(cx.url()),
            form_path: query.path,
            is_valid,
        };
        render(cx, "new.html", &view).into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::header;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::templates::RecordingEngine;

    fn serve(uri: &str) -> (Outcome, Arc<RecordingEngine>) {
        let engine = Arc::new(RecordingEngine::default());
        let raw = uri.split_once('?').map_or(uri, |(path, _)| path);
        let cx = RequestContext::for_test(raw, engine.clone());
        let handler = NewHandler::new(Regex::new(NAME_PATTERN).unwrap());
        let outcome = handler.serve(&cx, &IncomingRequest::for_test(uri, ""));
        (outcome, engine)
    }

    fn location(outcome: Outcome) -> String {
        let Outcome::Responded(response) = outcome else {
            panic!("expected response");
        };
        assert_eq!(response.status(), StatusCode::FOUND);
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[test]
    fn test_name_pattern() {
        let rule = Regex::new(NAME_PATTERN).unwrap();

        for name in ["a", "abc.txt", "Notes2", "v1.2.3", "x."] {
            assert!(rule.is_match(name), "{name} should match");
        }
        for name in ["", ".hidden", "../x", "a/b", "a b", "a_b", "a-b"] {
            assert!(!rule.is_match(name), "{name} should not match");
        }
    }

    #[test]
    fn test_valid_file_name_redirects_to_edit() {
        let (outcome, engine) = serve("/new/file?name=abc.txt&path=docs/");

        assert_eq!(location(outcome), "/edit/docs/abc.txt");
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_valid_folder_name_redirects_to_folder() {
        let (outcome, _) = serve("/new/folder?name=drafts&path=docs/");

        assert_eq!(location(outcome), "/folder/docs/drafts");
    }

    #[test]
    fn test_name_at_root() {
        let (outcome, _) = serve("/new/file?name=a.txt");

        assert_eq!(location(outcome), "/edit/a.txt");
    }

    #[test]
    fn test_path_unfit_for_redirect_fails() {
        let (outcome, engine) = serve("/new/file?name=a&path=x%0Ay/");

        let Outcome::Failed(err) = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(err, crate::error::HandlerError::Redirect(_)));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_invalid_name_rerenders_form() {
        let (outcome, engine) = serve("/new/file?name=..%2Fx&path=docs/");

        let Outcome::Responded(response) = outcome else {
            panic!("expected response");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "new.html");
        assert_eq!(calls[0].1["is_valid"], false);
        assert_eq!(calls[0].1["form_path"], "docs/");
        assert_eq!(calls[0].1["value"], "file");
    }

    #[test]
    fn test_empty_name_shows_fresh_form() {
        for uri in ["/new/folder", "/new/folder?name=&path=docs/"] {
            let (outcome, engine) = serve(uri);

            assert!(matches!(outcome, Outcome::Responded(_)));
            assert_eq!(engine.calls()[0].1["is_valid"], true);
        }
    }

    #[test]
    fn test_unknown_kind_is_bad_request() {
        for uri in ["/new/", "/new/page?name=a", "/new/File"] {
            let (outcome, engine) = serve(uri);

            let Outcome::Responded(response) = outcome else {
                panic!("expected response");
            };
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(engine.calls().is_empty());
        }
    }
}
