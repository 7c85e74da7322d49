//! Router assembly.

mod api;
mod common;

pub use api::{catalog_routes, cat_routes, user_routes};
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application: common routes at the root, cats, users and the catalogue under `/api/v1`.
pub fn app(state: AppState) -> Router {
    let limit = state.config.body_limit_bytes;
    let api = Router::new()
        .merge(cat_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(catalog_routes(state.clone()));
    Router::new()
        .merge(common_routes(state))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(limit))
}
