//! # Kiosk - Photo Slideshow for Immich
//!
//! Kiosk serves a full-screen slideshow of photos pulled from an Immich
//! server, with an optional clock overlay. It provides:
//!
//! - **Per-request overrides**: any setting can be changed for one display
//!   by adding it to the page URL (`/?album=...&showTime=true`)
//! - **Image sources**: random images from an album, of a person, or from
//!   the whole library
//! - **Transforms**: data-URI encoding, blurred backgrounds, date captions
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Base/instance configuration |
//! | [`overlay`] | Query and referer overrides |
//! | [`backend`] | Photo backend trait and Immich client |
//! | [`source`] | Album / person / random selection |
//! | [`pipeline`] | Encoding, blur, and caption |
//! | [`clock`] | Clock formatting |
//! | [`page`] | View models |
//! | [`server`] | HTTP server |
//! | [`error`] | Error types |

pub mod backend;
pub mod clock;
pub mod config;
pub mod datetime;
pub mod error;
pub mod overlay;
pub mod page;
pub mod pipeline;
pub mod server;
pub mod source;

// Re-exports for convenience
pub use config::Config;
pub use error::KioskError;
