// ============================================================================
// ERRORS — every failure the tool can report, mapped to one exit path
// ============================================================================

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LomoError>;

#[derive(Debug, thiserror::Error)]
pub enum LomoError {
    /// Wrong command-line arity or an out-of-range flag value.
    #[error("{0}")]
    Argument(String),

    /// The input image could not be read or decoded.
    #[error("could not load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding or writing the result failed.
    #[error("could not save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Window / renderer failure reported by the GUI backend.
    #[error("imaging backend error: {0}")]
    Backend(String),
}

impl From<eframe::Error> for LomoError {
    fn from(e: eframe::Error) -> Self {
        LomoError::Backend(e.to_string())
    }
}
