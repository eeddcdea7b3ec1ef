//! # Immich Client
//!
//! [`PhotoBackend`] implementation for the Immich REST API.
//!
//! | Constraint | Request |
//! |------------|---------|
//! | Random | `POST /api/search/random` |
//! | Person | `POST /api/search/random` with `personIds` |
//! | Album | `GET /api/albums/{id}`, then a random pick client-side |
//!
//! Previews come from `GET /api/assets/{id}/thumbnail?size=preview`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use rand::seq::IndexedRandom;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Asset, Constraint, PhotoBackend, Preview};
use crate::error::KioskError;

/// Upper bound for any single backend call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immich API client. Not `Debug`, since it holds the API key.
#[derive(Clone)]
pub struct ImmichClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

/// Asset as returned by the Immich API (only the fields the kiosk reads).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetResponse {
    id: String,
    #[serde(rename = "type", default)]
    asset_type: String,
    #[serde(default)]
    original_mime_type: String,
    #[serde(default)]
    local_date_time: String,
    #[serde(default)]
    is_trashed: bool,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    #[serde(default)]
    assets: Vec<AssetResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RandomSearch<'a> {
    size: u32,
    #[serde(rename = "type")]
    asset_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_ids: Option<[&'a str; 1]>,
}

impl ImmichClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, KioskError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kiosk/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| KioskError::Backend(format!("HTTP client error: {}", e)))?;

        let base_url = Url::parse(base_url).map_err(|e| {
            KioskError::Backend(format!("Invalid Immich URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(KioskError::Backend(format!(
                "Invalid Immich URL '{}': not a base URL",
                base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Build `<base>/api/<segments...>`.
    ///
    /// Every segment stays one path segment (`/`, `?` and `#` are
    /// percent-encoded); empty and dot segments are rejected.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, KioskError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(KioskError::Backend(format!("Invalid ID '{}'", bad)));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| KioskError::Backend(format!("Invalid Immich URL '{}'", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn search_random(&self, person: Option<&str>) -> Result<Vec<AssetResponse>, KioskError> {
        let body = RandomSearch {
            size: 1,
            asset_type: "IMAGE",
            person_ids: person.map(|p| [p]),
        };

        self.http
            .post(self.endpoint(&["search", "random"])?)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| KioskError::Backend(format!("Random search failed: {}", e)))?
            .json()
            .await
            .map_err(|e| KioskError::Backend(format!("Invalid search response: {}", e)))
    }

    async fn album_assets(&self, album: &str) -> Result<Vec<AssetResponse>, KioskError> {
        let album: AlbumResponse = self
            .http
            .get(self.endpoint(&["albums", album])?)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| KioskError::Backend(format!("Album request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| KioskError::Backend(format!("Invalid album response: {}", e)))?;
        Ok(album.assets)
    }
}

#[async_trait]
impl PhotoBackend for ImmichClient {
    async fn random_asset(&self, constraint: &Constraint) -> Result<Asset, KioskError> {
        let candidates = match constraint {
            Constraint::Album(album) => self.album_assets(album).await?,
            Constraint::Person(person) => self.search_random(Some(person)).await?,
            Constraint::Random => self.search_random(None).await?,
        };

        let images: Vec<AssetResponse> = candidates
            .into_iter()
            .filter(|a| a.asset_type == "IMAGE" && !a.is_trashed)
            .collect();

        let picked = images
            .choose(&mut rand::rng())
            .ok_or_else(|| KioskError::Backend("No images found".to_string()))?;

        to_asset(picked)
    }

    async fn preview(&self, asset: &Asset) -> Result<Preview, KioskError> {
        let response = self
            .http
            .get(self.endpoint(&["assets", &asset.id, "thumbnail"])?)
            .query(&[("size", "preview")])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| KioskError::Backend(format!("Preview request failed: {}", e)))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| KioskError::Backend(format!("Failed to read preview: {}", e)))?;

        Ok(Preview {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn to_asset(response: &AssetResponse) -> Result<Asset, KioskError> {
    Ok(Asset {
        id: response.id.clone(),
        original_mime_type: response.original_mime_type.clone(),
        local_date_time: parse_local_date_time(&response.local_date_time)?,
    })
}

/// Parse Immich's `localDateTime`.
///
/// Immich stores the wall-clock capture time and serialises it with a `Z`
/// suffix, so the offset is dropped rather than applied.
fn parse_local_date_time(s: &str) -> Result<NaiveDateTime, KioskError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| KioskError::Backend(format!("Invalid localDateTime '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_local_date_time_keeps_wall_clock() {
        let dt = parse_local_date_time("2023-06-10T14:31:12.000Z").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 6, 10).unwrap());
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 31);
    }

    #[test]
    fn test_parse_local_date_time_with_offset() {
        let dt = parse_local_date_time("2023-06-10T14:31:12+02:00").unwrap();
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn test_parse_local_date_time_without_zone() {
        let dt = parse_local_date_time("2023-06-10T14:31:12").unwrap();
        assert_eq!(dt.second(), 12);
    }

    #[test]
    fn test_parse_local_date_time_rejects_garbage() {
        assert!(parse_local_date_time("yesterday").is_err());
    }

    #[test]
    fn test_asset_response_deserializes() {
        let json = r#"[{
            "id": "abc",
            "type": "IMAGE",
            "originalMimeType": "image/jpeg",
            "localDateTime": "2021-12-25T08:00:00.000Z",
            "isTrashed": false,
            "ownerId": "ignored"
        }]"#;
        let assets: Vec<AssetResponse> = serde_json::from_str(json).unwrap();
        let asset = to_asset(&assets[0]).unwrap();
        assert_eq!(asset.id, "abc");
        assert_eq!(asset.original_mime_type, "image/jpeg");
        assert_eq!(asset.local_date_time.hour(), 8);
    }

    #[test]
    fn test_person_search_body() {
        let body = RandomSearch {
            size: 1,
            asset_type: "IMAGE",
            person_ids: Some(["p1"]),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["personIds"][0], "p1");
        assert_eq!(json["type"], "IMAGE");

        let body = RandomSearch {
            size: 1,
            asset_type: "IMAGE",
            person_ids: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("personIds").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ImmichClient::new("http://immich.local/", "key").unwrap();
        let url = client.endpoint(&["albums", "x"]).unwrap();
        assert_eq!(url.as_str(), "http://immich.local/api/albums/x");
    }

    #[test]
    fn test_base_url_with_subpath() {
        let client = ImmichClient::new("http://nas.local/immich", "key").unwrap();
        let url = client.endpoint(&["search", "random"]).unwrap();
        assert_eq!(url.as_str(), "http://nas.local/immich/api/search/random");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ImmichClient::new("immich.local", "key").is_err());
        assert!(ImmichClient::new("mailto:me@example.com", "key").is_err());
    }

    #[test]
    fn test_ids_are_single_segments() {
        let client = ImmichClient::new("http://immich.local", "key").unwrap();
        let url = client.endpoint(&["albums", "../users/me?x=#y"]).unwrap();
        assert_eq!(url.path(), "/api/albums/..%2Fusers%2Fme%3Fx=%23y");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_dot_segments_rejected() {
        let client = ImmichClient::new("http://immich.local", "key").unwrap();
        assert!(client.endpoint(&["albums", ".."]).is_err());
        assert!(client.endpoint(&["albums", "."]).is_err());
        assert!(client.endpoint(&["assets", "", "thumbnail"]).is_err());
    }

    /// Accept one HTTP request, answer it with `body`, and hand back the
    /// request line.
    async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base, task)
    }

    #[tokio::test]
    async fn test_album_id_cannot_leave_album_endpoint() {
        let (base, server) = serve_once(r#"{"assets":[]}"#).await;
        let client = ImmichClient::new(&base, "key").unwrap();

        let result = client
            .random_asset(&Constraint::Album("../users/me?x=".into()))
            .await;
        assert!(result.is_err());

        let request_line = server.await.unwrap();
        assert!(
            request_line.starts_with("GET /api/albums/..%2Fusers%2Fme%3Fx= "),
            "unexpected request line: {}",
            request_line
        );
        assert!(!request_line.contains("/users/"));
    }

    #[tokio::test]
    async fn test_asset_id_cannot_leave_thumbnail_endpoint() {
        let (base, server) = serve_once("").await;
        let client = ImmichClient::new(&base, "key").unwrap();
        let asset = Asset {
            id: "../../users/me".into(),
            original_mime_type: "image/jpeg".into(),
            local_date_time: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };

        client.preview(&asset).await.unwrap();

        let request_line = server.await.unwrap();
        assert!(
            request_line.starts_with("GET /api/assets/..%2F..%2Fusers%2Fme/thumbnail?size=preview "),
            "unexpected request line: {}",
            request_line
        );
    }
}
