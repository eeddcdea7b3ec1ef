//! Clock handler.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
};
use chrono::Local;
use std::sync::Arc;
use tracing::debug;

use crate::{clock::format_clock, page::PageViewModel};

use super::super::{state::AppState, views};

/// GET /clock - current time as an HTML fragment.
pub async fn clock(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Html<String> {
    let request_id = super::request_id(&headers);
    let config = super::instance_config(&state.base, &headers, &query, &request_id);
    debug!(request_id = %request_id, path = "/clock", ?config, "instance config");

    let view = format_clock(&config, Local::now().naive_local());
    Html(views::clock(&PageViewModel::clock(config, view)))
}
