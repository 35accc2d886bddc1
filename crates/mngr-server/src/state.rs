//! Application state.
//!
//! Collaborators shared by all handlers, fixed at startup.

use std::sync::Arc;

use mngr_storage::Storage;
use regex::Regex;

use crate::templates::RenderEngine;

/// Application state used to build the router.
pub(crate) struct AppState {
    /// Storage backend for pages and folders.
    pub(crate) storage: Arc<dyn Storage>,
    /// Template engine for HTML responses.
    pub(crate) renderer: Arc<dyn RenderEngine>,
    /// Names accepted by the creation form.
    pub(crate) name_rule: Regex,
}
