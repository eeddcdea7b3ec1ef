//! Page shell handler.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
};
use std::sync::Arc;
use tracing::debug;

use crate::page::PageViewModel;

use super::super::{state::AppState, views};

/// GET / - page shell that polls `/image` and `/clock`.
pub async fn home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Html<String> {
    let request_id = super::request_id(&headers);
    let config = super::instance_config(&state.base, &headers, &query, &request_id);
    debug!(request_id = %request_id, path = "/", ?config, "instance config");

    Html(views::index(&PageViewModel::shell(config), state.boot_time))
}
