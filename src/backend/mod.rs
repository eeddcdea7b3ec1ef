//! # Photo Backend
//!
//! The kiosk only needs two things from a photo server: pick a random asset
//! (optionally constrained to an album or a person) and download its preview.
//! [`PhotoBackend`] is that capability; [`immich::ImmichClient`] implements it
//! against the Immich HTTP API, and tests substitute their own.

pub mod immich;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::KioskError;

pub use immich::ImmichClient;

/// Restricts which assets a random pick may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Any image in the album with this ID
    Album(String),
    /// Any image tagged with the person with this ID
    Person(String),
    /// Any image in the library
    Random,
}

/// Metadata for a picked asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    /// MIME type of the original upload (e.g. "image/heic")
    pub original_mime_type: String,
    /// Capture time as wall-clock time where the photo was taken
    pub local_date_time: NaiveDateTime,
}

/// Downloaded preview bytes plus the content type the server reported.
#[derive(Debug, Clone)]
pub struct Preview {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// An image fetched for one request. Never cached or shared.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pub asset_id: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub local_date_time: NaiveDateTime,
}

impl ImageHandle {
    /// Combine asset metadata with its downloaded preview.
    ///
    /// The preview's own content type wins, since that describes the bytes
    /// actually held; the original upload's type is the fallback.
    pub fn new(asset: Asset, preview: Preview) -> Self {
        let mime_type = preview
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(asset.original_mime_type);
        Self {
            asset_id: asset.id,
            bytes: preview.bytes,
            mime_type,
            local_date_time: asset.local_date_time,
        }
    }
}

/// A photo server the kiosk can pull images from.
#[async_trait]
pub trait PhotoBackend: Send + Sync {
    /// Pick one random image asset satisfying `constraint`.
    async fn random_asset(&self, constraint: &Constraint) -> Result<Asset, KioskError>;

    /// Download the display-sized preview of `asset`.
    async fn preview(&self, asset: &Asset) -> Result<Preview, KioskError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn asset() -> Asset {
        Asset {
            id: "a1".into(),
            original_mime_type: "image/heic".into(),
            local_date_time: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_handle_prefers_preview_content_type() {
        let handle = ImageHandle::new(
            asset(),
            Preview {
                bytes: vec![1, 2, 3],
                content_type: Some("image/jpeg".into()),
            },
        );
        assert_eq!(handle.mime_type, "image/jpeg");
        assert_eq!(handle.bytes, vec![1, 2, 3]);
        assert_eq!(handle.asset_id, "a1");
    }

    #[test]
    fn test_handle_falls_back_to_original_mime() {
        let handle = ImageHandle::new(
            asset(),
            Preview {
                bytes: vec![],
                content_type: None,
            },
        );
        assert_eq!(handle.mime_type, "image/heic");
    }
}
