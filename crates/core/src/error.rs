//! Error types for PowerPoint to Word text conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The source presentation is missing, unreadable, or not a valid
    /// presentation container.
    #[error("Failed to load presentation: {0}")]
    Load(String),

    /// The output document could not be written.
    #[error("Failed to save document: {0}")]
    Save(String),

    /// The requested font size is not a positive size the output format
    /// can represent.
    #[error("Invalid font size: {0}")]
    InvalidFontSize(String),
}

impl Error {
    /// Build a load error from anything displayable.
    pub fn load(reason: impl std::fmt::Display) -> Self {
        Self::Load(reason.to_string())
    }

    /// Build a save error from anything displayable.
    pub fn save(reason: impl std::fmt::Display) -> Self {
        Self::Save(reason.to_string())
    }
}
