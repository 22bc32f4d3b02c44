//! Error types for tile content assembly

use crate::tiles3d::Tiles3dError;

/// Result type for content operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors raised while assembling or encoding tile content
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    /// The triangulation collaborator rejected a record
    #[error("Triangulation error for batch {batch_id}: {message}")]
    Triangulation { batch_id: u32, message: String },

    /// The encoder could not produce a payload
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A record lacks an attribute other records carry
    #[error("attribute '{name}' missing on batch {batch_id}")]
    MissingAttribute { name: String, batch_id: u32 },

    /// A style color is not `#RRGGBB` or `#RRGGBBAA`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tiles3d(#[from] Tiles3dError),
}

impl ContentError {
    pub fn triangulation<T: ToString>(batch_id: u32, msg: T) -> Self {
        Self::Triangulation {
            batch_id,
            message: msg.to_string(),
        }
    }

    pub fn encoding<T: ToString>(msg: T) -> Self {
        Self::Encoding(msg.to_string())
    }
}
