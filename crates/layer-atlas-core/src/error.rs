use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayerAtlasError {
    #[error("Invalid block dimensions for '{id}': {width}x{height}")]
    InvalidBlockDimensions { id: String, width: i64, height: i64 },
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),
    #[error("Move of '{id}' by ({dx}, {dy}) leaves the coordinate range")]
    MoveOutOfRange { id: String, dx: i64, dy: i64 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayerAtlasError>;
