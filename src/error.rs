//! Error types for the export pipeline

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting panels to a document
#[derive(Error, Debug)]
pub enum Error {
    /// The panel source is not attached/populated yet. Benign: the caller
    /// may simply retry once the host UI has rendered its panels.
    #[error("Panel source is not ready")]
    NotReady,

    /// Rasterizing a panel failed
    #[error("Panel capture failed: {0}")]
    Capture(String),

    /// The document backend rejected an operation
    #[error("Document assembly failed: {0}")]
    Assembly(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error means "try again later" rather than "something broke".
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Error::NotReady)
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Assembly(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Capture(err.to_string())
    }
}
