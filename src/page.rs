//! # Page Composition
//!
//! View models handed to [`crate::server`]'s views. Built fresh for every
//! response; composition cannot fail.

use crate::clock::ClockView;
use crate::config::Config;
use crate::pipeline::DisplayImage;
use crate::source::FetchFailure;

/// Version string shown in the page footer.
pub const KIOSK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a page shows besides the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    /// Empty shell; the browser fills it via `/image` and `/clock`
    Shell,
    Image(DisplayImage),
    Clock(ClockView),
}

/// Everything a view needs to render one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageViewModel {
    pub kiosk_version: &'static str,
    pub config: Config,
    pub body: PageBody,
}

impl PageViewModel {
    pub fn shell(config: Config) -> Self {
        Self::new(config, PageBody::Shell)
    }

    pub fn image(config: Config, image: DisplayImage) -> Self {
        Self::new(config, PageBody::Image(image))
    }

    pub fn clock(config: Config, clock: ClockView) -> Self {
        Self::new(config, PageBody::Clock(clock))
    }

    fn new(config: Config, body: PageBody) -> Self {
        Self {
            kiosk_version: KIOSK_VERSION,
            config,
            body,
        }
    }
}

/// Error shown in place of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub title: String,
    pub message: String,
}

impl From<&FetchFailure> for ErrorView {
    fn from(failure: &FetchFailure) -> Self {
        Self {
            title: failure.mode.error_title().to_string(),
            message: failure.mode.error_hint().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KioskError;
    use crate::source::SourceMode;

    #[test]
    fn test_view_model_carries_version_and_config() {
        let config = Config {
            album: "a1".into(),
            ..Default::default()
        };
        let page = PageViewModel::shell(config.clone());
        assert_eq!(page.kiosk_version, KIOSK_VERSION);
        assert_eq!(page.config, config);
        assert_eq!(page.body, PageBody::Shell);
    }

    #[test]
    fn test_error_view_from_album_failure() {
        let failure = FetchFailure {
            mode: SourceMode::Album,
            source: KioskError::Backend("404".into()),
        };
        let view = ErrorView::from(&failure);
        assert_eq!(view.title, "Error getting image from album");
        assert_eq!(view.message, "Is album ID correct?");
    }
}
