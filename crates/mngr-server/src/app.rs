//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodFilter, MethodRouter, get};
use tower::ServiceBuilder;

use crate::handlers::folder::FolderHandler;
use crate::handlers::list::ListHandler;
use crate::handlers::new::NewHandler;
use crate::handlers::pages::{EditHandler, SaveHandler, ViewHandler};
use crate::middleware::dispatch::endpoint;
use crate::middleware::{logging, security, validate};
use crate::state::AppState;
use crate::validation::Command;

/// Create the application router.
///
/// Command routes pass through path validation; `/` redirects to the root
/// listing. Every request, matched or not, is access-logged once.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: AppState) -> Router {
    let AppState {
        storage,
        renderer,
        name_rule,
    } = state;

    let get_only = MethodFilter::GET;
    let router = Router::new();
    let router = mount(
        router,
        Command::List,
        endpoint(get_only, Arc::new(ListHandler::new(Arc::clone(&storage)))),
    );
    let router = mount(
        router,
        Command::View,
        endpoint(get_only, Arc::new(ViewHandler::new(Arc::clone(&storage)))),
    );
    let router = mount(
        router,
        Command::Edit,
        endpoint(get_only, Arc::new(EditHandler::new(Arc::clone(&storage)))),
    );
    let router = mount(
        router,
        Command::Save,
        endpoint(
            MethodFilter::POST,
            Arc::new(SaveHandler::new(Arc::clone(&storage))),
        ),
    );
    let router = mount(
        router,
        Command::Folder,
        endpoint(
            MethodFilter::GET.or(MethodFilter::POST),
            Arc::new(FolderHandler::new(storage)),
        ),
    );
    let router = mount(
        router,
        Command::New,
        endpoint(get_only, Arc::new(NewHandler::new(name_rule))),
    );

    router
        .route_layer(from_fn_with_state(renderer, validate::validate_request))
        .route(
            "/",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/list/")]) }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(logging::log_requests))
                .layer(security::csp_layer())
                .layer(security::nosniff_layer())
                .layer(security::deny_framing_layer()),
        )
}

/// Route `/{command}`, `/{command}/` and everything below it to `method_router`.
fn mount(router: Router, command: Command, method_router: MethodRouter) -> Router {
    let base = format!("/{command}");
    router
        .route(&base, method_router.clone())
        .route(&format!("{base}/"), method_router.clone())
        .route(&format!("{base}/{{*path}}"), method_router)
}
