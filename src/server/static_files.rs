//! Static file serving for the page's CSS and JavaScript.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::IntoResponse,
};
use include_dir::{Dir, include_dir};

/// Embedded frontend files.
static FRONTEND: Dir = include_dir!("$CARGO_MANIFEST_DIR/frontend");

/// Serve a file from the embedded frontend directory.
///
/// Asset URLs carry `?v=<boot time>`, so responses can be cached for a year.
pub async fn asset_handler(Path(path): Path<String>) -> impl IntoResponse {
    match FRONTEND.get_file(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            (
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CACHE_CONTROL, "public, max-age=31536000".to_string()),
                ],
                file.contents().to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}
