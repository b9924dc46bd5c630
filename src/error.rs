//! Error types shared across the applet.

use std::path::PathBuf;

/// Errors raised by the applet and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AppletError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("service discovery error: {0}")]
    Discovery(String),

    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tray error: {0}")]
    Tray(String),
}

pub type Result<T> = std::result::Result<T, AppletError>;
