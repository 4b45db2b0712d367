//! Error types for content acquisition.
//!
//! Every failure the store can observe collapses into a [`ContentError`].
//! The view never sees structured codes, only [`ContentError::user_message`].

use thiserror::Error;

/// Failure of a content listing, scrape, or configuration step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The request could not complete (connection refused, DNS, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("server responded with HTTP {status}")]
    Server { status: u16 },

    /// The response body did not match the listing contract.
    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ContentError {
    /// Human-readable message shown in place of the article grid.
    pub fn user_message(&self) -> String {
        match self {
            ContentError::Network(_) => {
                "Could not reach the content server. Check your connection and try again.".to_string()
            }
            ContentError::Server { status } => {
                format!("The content server returned an error (HTTP {status}). Please try again.")
            }
            ContentError::Decode(_) => {
                "The content server sent a response we could not read. Please try again.".to_string()
            }
            ContentError::InvalidUrl(url) => format!("The content server address is invalid: {url}"),
            ContentError::Config(reason) => format!("Configuration problem: {reason}"),
        }
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ContentError::Server {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            ContentError::Decode(e.to_string())
        } else {
            ContentError::Network(e.to_string())
        }
    }
}

impl From<url::ParseError> for ContentError {
    fn from(e: url::ParseError) -> Self {
        ContentError::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = [
            ContentError::Network("refused".into()),
            ContentError::Server { status: 503 },
            ContentError::Decode("EOF".into()),
            ContentError::InvalidUrl("nope".into()),
            ContentError::Config("missing".into()),
        ];
        for e in errors {
            assert!(!e.user_message().is_empty(), "{e:?}");
        }
    }

    #[test]
    fn test_server_message_carries_status() {
        let e = ContentError::Server { status: 502 };
        assert!(e.user_message().contains("502"));
        assert_eq!(e.to_string(), "server responded with HTTP 502");
    }

    #[test]
    fn test_url_parse_error_maps_to_invalid_url() {
        let err = url::Url::parse("not a url").unwrap_err();
        let e: ContentError = err.into();
        assert!(matches!(e, ContentError::InvalidUrl(_)));
    }
}
