use thiserror::Error;

/// A snapshot or stored bitmap could not be turned back into pixels
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("bitmap is not a readable PNG: {0}")]
    Image(#[from] image::ImageError),

    #[error("bitmap is {found_width}x{found_height}, surface is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("not a PNG data url")]
    NotADataUrl,

    #[error("data url payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// The surface could not be encoded to PNG
#[derive(Debug, Error)]
#[error("failed to encode surface: {0}")]
pub struct EncodeError(#[from] pub image::ImageError);

/// Input rejected before any state was touched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a title is required to save a drawing")]
    EmptyTitle,
}

/// Errors surfaced by a drawing store. Opaque to the editor; it never retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no drawing with id {0}")]
    NotFound(uuid::Uuid),

    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors returned from editor session operations
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not write download: {0}")]
    Download(#[source] std::io::Error),
}

/// Errors that can occur while loading an editor configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
