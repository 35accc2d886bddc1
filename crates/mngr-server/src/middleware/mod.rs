//! Request pipeline: access logging, path validation, dispatch and response
//! headers.

pub(crate) mod dispatch;
pub(crate) mod logging;
pub(crate) mod security;
pub(crate) mod validate;
