//! Directory listing.

use std::sync::Arc;

use mngr_storage::{Listing, Storage};
use serde::Serialize;

use super::{Handler, IncomingRequest, Outcome, TemplateInfo, render};
use crate::context::RequestContext;
use crate::validation::is_reachable_name;

/// Data for `list.html`.
#[derive(Serialize)]
struct ListView {
    #[serde(flatten)]
    info: TemplateInfo,
    #[serde(flatten)]
    listing: Listing,
    empty: bool,
}

impl ListView {
    fn new(cx: &RequestContext, mut listing: Listing) -> Self {
        // Links to these would be rejected by path validation
        let dir = cx.url().path();
        for names in [&mut listing.files, &mut listing.folders] {
            names.retain(|name| {
                let reachable = is_reachable_name(name);
                if !reachable {
                    tracing::debug!(dir = %dir, name = %name, "Skipping unreachable entry");
                }
                reachable
            });
        }
        Self {
            info: TemplateInfo::from_url(cx.url()),
            empty: listing.is_empty(),
            listing,
        }
    }
}

/// Handles `GET /list/{dir}`.
pub(crate) struct ListHandler {
    storage: Arc<dyn Storage>,
}

impl ListHandler {
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl Handler for ListHandler {
    fn serve(&self, cx: &RequestContext, _req: &IncomingRequest) -> Outcome {
        let result = self
            .storage
            .list(&cx.url().path())
            .map(|listing| ListView::new(cx, listing));
        match result {
            Ok(view) => render(cx, "list.html", &view).into(),
            Err(err) => Outcome::Failed(err.into()),
        }
    }
}
