//! Router assembly: common routes at the root, table routes under `/api`.

mod common;
mod table;

pub use common::common_routes;
pub use table::{fixed_table_routes, table_routes};

use crate::state::AppState;
use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Table served through its own fixed routes.
pub const ZOOS_TABLE: &str = "zoos";

/// Full application router: `/health`, `/ready`, `/version`, `/api/zoos[/:id]`, and `/api/:table[/:id]`.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    let api = Router::new()
        .merge(fixed_table_routes(state.clone(), ZOOS_TABLE))
        .merge(table_routes(state.clone()));

    Router::new()
        .merge(common_routes(state))
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
}
