use thiserror::Error;

use crate::frame::Channel;

#[derive(Error, Debug)]
pub enum FlareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Malformed frame data (line {line}): {message}")]
    DataFormat { line: u64, message: String },

    #[error(
        "Flare metric undefined for {channel} channel: no direct-light or light-source pixels to normalize against"
    )]
    MetricUndefined { channel: Channel },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlareError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn data_format(line: u64, message: impl Into<String>) -> Self {
        Self::DataFormat {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlareError>;
