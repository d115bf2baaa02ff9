//! Error type shared by the client, the resource managers and the
//! tool dispatcher.
//!
//! Every failure carries enough structure to be classified with
//! [`Error::kind`], but the text rendering stays flat: at the tool
//! boundary all of them become `"Error: <message>"`.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced an HTTP response.
    #[error("{message}")]
    Transport { message: String },

    /// Meilisearch answered with a non-success status.
    #[error("{message}{}", .code.as_deref().map(|c| format!(" (code: {c})")).unwrap_or_default())]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A success response whose body could not be decoded.
    #[error("invalid response from Meilisearch: {0}")]
    InvalidResponse(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid Meilisearch URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Failed to {operation}: {source}")]
    Failed {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Meilisearch could not be reached or answered garbage.
    Transport,
    /// Meilisearch rejected the request.
    Remote,
    /// The caller supplied arguments that do not satisfy a contract.
    InvalidInput,
    UnknownTool,
    /// Connection coordinates are unusable.
    Configuration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } | Error::InvalidResponse(_) => ErrorKind::Transport,
            Error::Remote { .. } => ErrorKind::Remote,
            Error::InvalidArguments { .. } | Error::UnknownResource(_) => ErrorKind::InvalidInput,
            Error::UnknownTool(_) => ErrorKind::UnknownTool,
            Error::InvalidUrl { .. } => ErrorKind::Configuration,
            Error::Failed { source, .. } => source.kind(),
        }
    }

    /// HTTP status of the underlying remote rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Failed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Build a `map_err` adapter wrapping the error as
    /// `"Failed to <operation>: <cause>"`.
    pub(crate) fn failed(operation: &'static str) -> impl FnOnce(Error) -> Error {
        move |source| Error::Failed {
            operation,
            source: Box::new(source),
        }
    }

    pub(crate) fn invalid_arguments(tool: &str, message: impl Into<String>) -> Self {
        Error::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_wraps_message_and_keeps_kind() {
        let remote = Error::Remote {
            status: 404,
            code: Some("index_not_found".into()),
            message: "Index `movies` not found.".into(),
        };
        let wrapped = Error::failed("get settings")(remote);
        assert_eq!(
            wrapped.to_string(),
            "Failed to get settings: Index `movies` not found. (code: index_not_found)"
        );
        assert_eq!(wrapped.kind(), ErrorKind::Remote);
        assert_eq!(wrapped.status(), Some(404));
    }

    #[test]
    fn remote_without_code_renders_message_only() {
        let err = Error::Remote {
            status: 500,
            code: None,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn transport_kind_survives_nesting() {
        let err = Error::failed("search")(Error::failed("list indexes")(Error::Transport {
            message: "connection refused".into(),
        }));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "Failed to search: Failed to list indexes: connection refused"
        );
    }
}
