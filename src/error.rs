//! Error types for bidline

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while editing or submitting a proposal
#[derive(Debug, Error)]
pub enum Error {
    /// The draft failed local validation; every message is kept
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// No opportunity is attached to the session
    #[error("No opportunity selected. Please reopen the proposal form and try again.")]
    MissingOpportunity,

    /// More files attached than the endpoint accepts
    #[error("You can attach a maximum of {max} attachments ({count} selected).")]
    TooManyAttachments {
        /// Number of files in the draft
        count: usize,
        /// Allowed maximum
        max: usize,
    },

    /// A single attachment is over the size limit
    #[error("File \"{file_name}\" exceeds the maximum size of 10 MB.")]
    AttachmentTooLarge {
        /// Offending file
        file_name: String,
        /// Its size in bytes
        size: u64,
    },

    /// A milestone index outside the current list
    #[error("No milestone at position {0}")]
    MilestoneNotFound(usize),

    /// An attachment index outside the current list
    #[error("No attachment at position {0}")]
    AttachmentNotFound(usize),

    /// A submission is already running for this session
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// The endpoint rejected the proposal; message is the server's own
    #[error("{0}")]
    Submission(String),

    /// Transport failure talking to the endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No usable credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Bad configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Messages to show the user, one per line
    ///
    /// Validation errors expand to every collected message; everything else
    /// is a single line.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Whether the failure happened before any network call
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Submission(_) | Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_all_messages() {
        let err = Error::Validation(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.messages(), vec!["first", "second"]);
        assert_eq!(err.to_string(), "first\nsecond");
        assert!(err.is_local());
    }

    #[test]
    fn test_submission_error_is_verbatim() {
        let err = Error::Submission("You have already applied".to_string());
        assert_eq!(err.to_string(), "You have already applied");
        assert!(!err.is_local());
    }

    #[test]
    fn test_attachment_limit_message() {
        let err = Error::TooManyAttachments { count: 4, max: 3 };
        assert!(err.to_string().contains("maximum of 3 attachments"));
    }
}
