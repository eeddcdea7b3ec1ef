//! # Error Types
//!
//! This module defines error types used throughout the kiosk.

use thiserror::Error;

/// Main error type for kiosk operations
#[derive(Debug, Error)]
pub enum KioskError {
    /// Configuration could not be loaded or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Referer header could not be parsed for override parameters
    #[error("Referer error: {0}")]
    Referer(String),

    /// Photo backend request failed (network, status, or payload)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Image encoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Listener or server errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
