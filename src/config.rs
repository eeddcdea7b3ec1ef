//! # Kiosk Configuration
//!
//! A single [`Config`] type serves two roles:
//!
//! - the **base** configuration, loaded once at startup and shared read-only
//!   (`Arc<Config>`) between all requests;
//! - the **instance** configuration, a clone of the base with a request's
//!   overrides applied (see [`crate::overlay`]).
//!
//! ## File format
//!
//! ```json
//! {
//!   "immichUrl": "http://immich.local:2283",
//!   "immichApiKey": "secret",
//!   "album": "",
//!   "refresh": 60,
//!   "showTime": true,
//!   "timeFormat": "24",
//!   "showImageDate": true,
//!   "imageDateFormat": "%Y-%m-%d"
//! }
//! ```
//!
//! Every field is optional; missing fields take the values of
//! [`Config::default`].

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::KioskError;

/// Default seconds between slideshow frames.
pub const DEFAULT_REFRESH_SECS: u64 = 60;

/// Kiosk configuration (base or per-request instance).
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Base URL of the Immich server
    pub immich_url: String,
    /// API key sent as `x-api-key`
    pub immich_api_key: String,

    /// Album ID to pick images from (empty = unset)
    pub album: String,
    /// Person ID to pick images of (empty = unset)
    pub person: String,
    /// Seconds between slideshow frames
    pub refresh: u64,
    /// Render a blurred copy of the image as the page background
    pub background_blur: bool,

    pub show_image_date: bool,
    pub show_image_time: bool,
    /// Date format for the image caption
    pub image_date_format: String,
    /// "12" for a 12-hour caption, anything else for 24-hour
    pub image_time_format: String,

    pub show_date: bool,
    pub show_time: bool,
    /// Date format for the clock
    pub date_format: String,
    /// "12" for a 12-hour clock, anything else for 24-hour
    pub time_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            immich_url: String::new(),
            immich_api_key: String::new(),
            album: String::new(),
            person: String::new(),
            refresh: DEFAULT_REFRESH_SECS,
            background_blur: false,
            show_image_date: false,
            show_image_time: false,
            image_date_format: String::new(),
            image_time_format: String::new(),
            show_date: false,
            show_time: false,
            date_format: String::new(),
            time_format: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KioskError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            KioskError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
            .map_err(|e| KioskError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, KioskError> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| KioskError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would make every request fail.
    pub fn validate(&self) -> Result<(), KioskError> {
        if self.refresh == 0 {
            return Err(KioskError::Config("refresh must be at least 1 second".into()));
        }
        if !self.immich_url.is_empty()
            && !(self.immich_url.starts_with("http://") || self.immich_url.starts_with("https://"))
        {
            return Err(KioskError::Config(format!(
                "immichUrl must start with http:// or https:// (got '{}')",
                self.immich_url
            )));
        }
        Ok(())
    }
}

// The API key must never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("immich_url", &self.immich_url)
            .field("immich_api_key", &"<redacted>")
            .field("album", &self.album)
            .field("person", &self.person)
            .field("refresh", &self.refresh)
            .field("background_blur", &self.background_blur)
            .field("show_image_date", &self.show_image_date)
            .field("show_image_time", &self.show_image_time)
            .field("image_date_format", &self.image_date_format)
            .field("image_time_format", &self.image_time_format)
            .field("show_date", &self.show_date)
            .field("show_time", &self.show_time)
            .field("date_format", &self.date_format)
            .field("time_format", &self.time_format)
            .finish()
    }
}
