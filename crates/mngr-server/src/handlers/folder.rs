//! Folder creation.

use std::sync::Arc;

use mngr_storage::Storage;

use super::{Handler, IncomingRequest, Outcome, found};
use crate::context::RequestContext;

/// Handles `GET|POST /folder/{path}`; redirects to the parent listing.
pub(crate) struct FolderHandler {
    storage: Arc<dyn Storage>,
}

impl FolderHandler {
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl Handler for FolderHandler {
    fn serve(&self, cx: &RequestContext, _req: &IncomingRequest) -> Outcome {
        let url = cx.url();
        match self.storage.create_folder(&url.path()) {
            Ok(()) => found(&format!("/list/{}", url.dir())).into(),
            Err(err) => Outcome::Failed(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use mngr_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::templates::RecordingEngine;

    fn serve(storage: &Arc<MockStorage>, raw: &str) -> Outcome {
        let cx = RequestContext::for_test(raw, Arc::new(RecordingEngine::default()));
        FolderHandler::new(storage.clone()).serve(&cx, &IncomingRequest::for_test(raw, ""))
    }

    #[test]
    fn test_create_top_level_folder() {
        let storage = Arc::new(MockStorage::new());

        let Outcome::Responded(response) = serve(&storage, "/folder/docs") else {
            panic!("expected response");
        };

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/list/");
        assert!(storage.has_folder("docs"));
    }

    #[test]
    fn test_create_nested_folder_redirects_to_parent() {
        let storage = Arc::new(MockStorage::new().with_folder("docs"));

        let Outcome::Responded(response) = serve(&storage, "/folder/docs/drafts") else {
            panic!("expected response");
        };

        assert_eq!(response.headers()[header::LOCATION], "/list/docs");
        assert!(storage.has_folder("docs/drafts"));
    }

    #[test]
    fn test_existing_folder_fails() {
        let storage = Arc::new(MockStorage::new().with_folder("docs"));

        let Outcome::Failed(err) = serve(&storage, "/folder/docs") else {
            panic!("expected failure");
        };

        assert!(err.to_string().contains("Already exists"));
    }

    #[test]
    fn test_missing_parent_fails() {
        let storage = Arc::new(MockStorage::new());

        assert!(matches!(
            serve(&storage, "/folder/a/b"),
            Outcome::Failed(_)
        ));
        assert!(!storage.has_folder("a/b"));
    }
}
