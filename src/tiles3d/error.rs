//! Error types for 3D Tiles module

/// Result type for 3D Tiles operations
pub type Tiles3dResult<T> = Result<T, Tiles3dError>;

/// Errors that can occur while building or reading 3D Tiles artifacts
#[derive(thiserror::Error, Debug)]
pub enum Tiles3dError {
    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid tileset structure or builder input
    #[error("Invalid tileset: {0}")]
    InvalidTileset(String),

    /// Invalid b3dm payload
    #[error("Invalid b3dm: {0}")]
    InvalidB3dm(String),

    /// Invalid glTF data
    #[error("Invalid glTF: {0}")]
    InvalidGltf(String),

    /// An available tile sits deeper than the geometric error sequence reaches
    #[error("no geometric error for depth {depth} (sequence has {available} entries)")]
    GeometricErrorExhausted { depth: usize, available: usize },
}

impl Tiles3dError {
    pub fn tileset<T: ToString>(msg: T) -> Self {
        Self::InvalidTileset(msg.to_string())
    }

    pub fn b3dm<T: ToString>(msg: T) -> Self {
        Self::InvalidB3dm(msg.to_string())
    }

    pub fn gltf<T: ToString>(msg: T) -> Self {
        Self::InvalidGltf(msg.to_string())
    }
}
