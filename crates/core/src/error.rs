//! Error types for deliverable generation and deck assembly.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating deliverables.
///
/// Outline parsing never produces an error; malformed outlines degrade to a
/// single fallback slide instead.
#[derive(Error, Debug)]
pub enum Error {
    /// No API key was passed explicitly or found in the environment.
    #[error(
        "No OpenAI API key was provided. Set the OPENAI_API_KEY environment variable or pass --api-key."
    )]
    MissingApiKey,

    /// The business idea was empty after normalization.
    #[error("The business idea must not be empty")]
    EmptyIdea,

    /// A configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request never produced an HTTP response.
    #[error("Failed to call OpenAI API: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("OpenAI API returned HTTP {status}: {body}")]
    UpstreamStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response did not have the expected completion shape.
    #[error("Unexpected response format from OpenAI API: {0}")]
    MalformedResponse(String),

    /// The deck assembler was handed no slides.
    #[error("No slides provided to the deck assembler")]
    EmptyDeck,

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),
}

impl Error {
    /// Whether this error was raised before any network traffic.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingApiKey | Error::EmptyIdea | Error::InvalidConfig(_)
        )
    }

    /// Whether this error came from the completion service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::UpstreamStatus { .. } | Error::MalformedResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(Error::MissingApiKey.is_configuration());
        assert!(Error::EmptyIdea.is_configuration());
        assert!(!Error::MissingApiKey.is_upstream());

        let status = Error::UpstreamStatus {
            status: 401,
            body: "bad key".to_string(),
        };
        assert!(status.is_upstream());
        assert_eq!(status.to_string(), "OpenAI API returned HTTP 401: bad key");

        assert!(!Error::EmptyDeck.is_configuration());
        assert!(!Error::EmptyDeck.is_upstream());
    }
}
