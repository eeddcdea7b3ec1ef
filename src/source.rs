//! # Image Source Selection
//!
//! Exactly one acquisition mode is used per request, chosen in fixed order:
//!
//! 1. `album` set → random image from that album
//! 2. `person` set → random image of that person
//! 3. otherwise → random image from the whole library
//!
//! A failure carries the mode that was attempted, so the page can tell the
//! user which setting to check.

use std::fmt;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::backend::{Constraint, ImageHandle, PhotoBackend};
use crate::config::Config;
use crate::error::KioskError;

/// Which acquisition mode a request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Album,
    Person,
    Random,
}

impl SourceMode {
    /// Title for the error page when this mode fails.
    pub fn error_title(self) -> &'static str {
        match self {
            SourceMode::Album => "Error getting image from album",
            SourceMode::Person => "Error getting image of person",
            SourceMode::Random => "Error getting random image",
        }
    }

    /// Hint for the error page when this mode fails.
    pub fn error_hint(self) -> &'static str {
        match self {
            SourceMode::Album => "Is album ID correct?",
            SourceMode::Person => "Is person ID correct?",
            SourceMode::Random => "Is Immich running? Are your config settings correct?",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceMode::Album => "album",
            SourceMode::Person => "person",
            SourceMode::Random => "random",
        };
        f.write_str(name)
    }
}

/// A failed fetch, tagged with the mode that was attempted.
#[derive(Debug, Error)]
#[error("{mode} fetch failed: {source}")]
pub struct FetchFailure {
    pub mode: SourceMode,
    pub source: KioskError,
}

/// Choose the acquisition mode for a configuration.
pub fn select(cfg: &Config) -> (SourceMode, Constraint) {
    if !cfg.album.is_empty() {
        (SourceMode::Album, Constraint::Album(cfg.album.clone()))
    } else if !cfg.person.is_empty() {
        (SourceMode::Person, Constraint::Person(cfg.person.clone()))
    } else {
        (SourceMode::Random, Constraint::Random)
    }
}

/// Pick an image according to `cfg` and download its preview.
///
/// One attempt per request; nothing is retried.
pub async fn select_and_fetch(
    backend: &dyn PhotoBackend,
    cfg: &Config,
    request_id: &str,
) -> Result<ImageHandle, FetchFailure> {
    let (mode, constraint) = select(cfg);
    let tag = |source| FetchFailure { mode, source };

    let started = Instant::now();
    let asset = backend.random_asset(&constraint).await.map_err(tag)?;
    let preview = backend.preview(&asset).await.map_err(tag)?;

    debug!(
        request_id,
        %mode,
        asset = %asset.id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "got image"
    );

    Ok(ImageHandle::new(asset, preview))
}
