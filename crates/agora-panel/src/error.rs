#![forbid(unsafe_code)]

use agora_core::ListenError;
use thiserror::Error;

/// Lifecycle misuse of a [`crate::StickyPanelController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("panel is already mounted; unmount before mounting again")]
    AlreadyMounted,
    #[error("panel is not mounted")]
    NotMounted,
    /// Mounting was abandoned; no listener stays attached.
    #[error(transparent)]
    Listen(#[from] ListenError),
}

/// Errors loading or validating a [`crate::StickyConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
