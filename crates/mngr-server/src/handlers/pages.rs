//! Page handlers: view, edit and save.
//!
//! A page that cannot be loaded is never an error for the reader: viewing it
//! redirects to the edit form, and the edit form starts out empty. Pages that
//! are not UTF-8 are shown lossily but never offered for editing, since saving
//! the form would replace their invalid bytes.

use std::sync::Arc;

use mngr_storage::{Page, Storage};
use serde::{Deserialize, Serialize};

use super::{Handler, IncomingRequest, Outcome, TemplateInfo, found, render};
use crate::context::RequestContext;
use crate::error::HandlerError;

/// Data for `view.html` and `edit.html`.
#[derive(Serialize)]
struct PageView {
    #[serde(flatten)]
    info: TemplateInfo,
    body: String,
}

impl PageView {
    fn new(cx: &RequestContext, body: String) -> Self {
        Self {
            info: TemplateInfo::from_url(cx.url()),
            body,
        }
    }
}

/// Handles `GET /view/{path}`.
pub(crate) struct ViewHandler {
    storage: Arc<dyn Storage>,
}

impl ViewHandler {
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl Handler for ViewHandler {
    fn serve(&self, cx: &RequestContext, _req: &IncomingRequest) -> Outcome {
        let path = cx.url().path();
        match self.storage.load_page(&path) {
            Ok(page) => {
                let view = PageView::new(cx, page.body_text().into_owned());
                render(cx, "view.html", &view).into()
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::debug!(path = %path, "No page to view, redirecting to edit");
                } else {
                    tracing::warn!(
                        path = %path,
                        error = %err,
                        "Unreadable page, redirecting to edit"
                    );
                }
                found(&format!("/edit/{path}")).into()
            }
        }
    }
}

/// Handles `GET /edit/{path}`.
pub(crate) struct EditHandler {
    storage: Arc<dyn Storage>,
}

impl EditHandler {
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl Handler for EditHandler {
    fn serve(&self, cx: &RequestContext, _req: &IncomingRequest) -> Outcome {
        let path = cx.url().path();
        let page = self.storage.load_page(&path).unwrap_or_else(|err| {
            tracing::debug!(path = %path, error = %err, "Editing page without stored content");
            Page::new(path.clone(), Vec::new())
        });
        let body = match page.text() {
            Ok(text) => text.to_owned(),
            Err(source) => return Outcome::Failed(HandlerError::NotText { path, source }),
        };
        render(cx, "edit.html", &PageView::new(cx, body)).into()
    }
}

/// Form submitted by `edit.html`.
#[derive(Deserialize)]
struct SaveForm {
    #[serde(default)]
    body: String,
}

/// Handles `POST /save/{path}`.
pub(crate) struct SaveHandler {
    storage: Arc<dyn Storage>,
}

impl SaveHandler {
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl Handler for SaveHandler {
    fn serve(&self, cx: &RequestContext, req: &IncomingRequest) -> Outcome {
        let path = cx.url().path();
        let result = req.form::<SaveForm>().and_then(|form| {
            let page = Page::new(path.clone(), form.body);
            self.storage.save_page(&page)?;
            found(&format!("/view/{path}"))
        });
        result.into()
    }
}
