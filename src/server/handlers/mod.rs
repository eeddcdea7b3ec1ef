//! HTTP handlers for the server.

pub mod clock;
pub mod image;
pub mod page;

use axum::http::{HeaderMap, header};

use crate::config::Config;
use crate::overlay;

use super::REQUEST_ID_HEADER;

/// Request id assigned by the request-id layer, or "-" outside the router.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

fn referer(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::REFERER).and_then(|v| v.to_str().ok())
}

/// Instance configuration for this request: a copy of the base with the
/// request's and referer's overrides applied.
fn instance_config(
    base: &Config,
    headers: &HeaderMap,
    query: &[(String, String)],
    request_id: &str,
) -> Config {
    overlay::instance_config(base, query, referer(headers), request_id)
}
