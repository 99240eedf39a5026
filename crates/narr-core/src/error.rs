//! Centralized error types for the analyzer.

use thiserror::Error;

/// Main error type for analyzer operations.
#[derive(Error, Debug)]
pub enum NarrError {
    #[error("No text provided. Paste a story or upload a .txt file.")]
    EmptyInput,

    #[error("Unknown structure: {0}")]
    UnknownStructure(String),

    #[error("Unsupported file type: {0}. Allowed: .txt, .pdf, .doc, .docx")]
    UnsupportedFileType(String),

    #[error("Cannot extract text from {0}; upload the story as a .txt file")]
    UnreadableDocument(String),

    #[error("File {0} is not valid UTF-8 text")]
    InvalidEncoding(String),

    #[error("Input too large: {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(String),
}

/// Result type for analyzer operations.
pub type NarrResult<T> = Result<T, NarrError>;

impl NarrError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the error was caused by the submitted input rather than
    /// by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::UnknownStructure(_)
                | Self::UnsupportedFileType(_)
                | Self::UnreadableDocument(_)
                | Self::InvalidEncoding(_)
                | Self::InputTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(NarrError::EmptyInput.is_client_error());
        assert!(NarrError::InputTooLarge { size: 10, limit: 5 }.is_client_error());
        assert!(!NarrError::config("bad").is_client_error());
        assert!(!NarrError::Template("boom".into()).is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = NarrError::UnknownStructure("freytag".into());
        assert_eq!(err.to_string(), "Unknown structure: freytag");
    }
}
