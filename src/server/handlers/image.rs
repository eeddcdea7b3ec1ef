//! Slideshow image handler.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    overlay::parse_bool,
    page::{ErrorView, PageViewModel},
    pipeline::{self, RenderedImage},
    source,
};

use super::super::{state::AppState, views};

/// GET /image - fetch a new image and render it as a slideshow frame.
///
/// Backend failures are rendered as an error fragment with status 200: the
/// page swaps whatever HTML it receives into place, so a display keeps
/// showing something useful (and keeps polling) instead of a browser error.
/// Transform failures have no meaningful page and return 500.
pub async fn image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let request_id = super::request_id(&headers);
    let config = super::instance_config(&state.base, &headers, &query, &request_id);
    debug!(request_id = %request_id, path = "/image", ?config, "instance config");

    let handle = match source::select_and_fetch(state.backend.as_ref(), &config, &request_id).await {
        Ok(handle) => handle,
        Err(failure) => {
            error!(request_id = %request_id, mode = %failure.mode, error = %failure.source, "err getting image");
            return Html(views::error(&ErrorView::from(&failure))).into_response();
        }
    };

    let want_raw = wants_raw(&query);
    let render_config = config.clone();
    let render_id = request_id.clone();

    // Move CPU-intensive work to blocking thread pool
    let rendered = tokio::task::spawn_blocking(move || {
        pipeline::render(&handle, &render_config, want_raw, &render_id)
    })
    .await;

    match rendered {
        Ok(Ok(RenderedImage::Raw { bytes, mime_type })) => {
            ([(header::CONTENT_TYPE, mime_type)], bytes).into_response()
        }
        Ok(Ok(RenderedImage::Display(image))) => {
            Html(views::image(&PageViewModel::image(config, image))).into_response()
        }
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "err rendering image");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Render failed: {}", e)).into_response()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "render task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)).into_response()
        }
    }
}

/// `raw` in the request's own query selects the raw-bytes response.
///
/// A bare `?raw` (or any truthy value) enables it; `raw=false` does not.
fn wants_raw(query: &[(String, String)]) -> bool {
    query
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("raw"))
        .is_some_and(|(_, v)| v.is_empty() || parse_bool(v).unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_wants_raw() {
        assert!(!wants_raw(&q(&[])));
        assert!(wants_raw(&q(&[("raw", "")])));
        assert!(wants_raw(&q(&[("raw", "true")])));
        assert!(wants_raw(&q(&[("RAW", "1")])));
        assert!(!wants_raw(&q(&[("raw", "false")])));
        assert!(!wants_raw(&q(&[("album", "raw")])));
    }
}
