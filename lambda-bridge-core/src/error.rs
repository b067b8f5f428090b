//! Adapter error types

use thiserror::Error;

/// Errors surfaced by the invocation and binding adapters
#[derive(Debug, Error)]
pub enum Error {
    /// The Lambda service rejected the request or it never reached it
    #[error("{}: {message}", .code.as_deref().unwrap_or("TransportError"))]
    Transport {
        code: Option<String>,
        message: String,
    },

    /// The invoked function ran but reported an error
    #[error(
        "Function {function_name} failed ({kind}): {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    FunctionError {
        function_name: String,
        kind: String,
        message: Option<String>,
    },

    #[error("Invalid payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The context was never bound to a trigger event
    #[error("No gateway response callback bound to this context")]
    ResponderMissing,

    #[error("Gateway response already sent for this context")]
    ResponseAlreadySent,

    /// The context was bound again before its response was sent
    #[error("Gateway response superseded by a new binding")]
    ResponseSuperseded,

    /// The handler finished without sending a gateway response
    #[error("Gateway response was never sent")]
    ResponseDropped,
}

impl Error {
    /// Short stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "Transport",
            Self::FunctionError { .. } => "FunctionError",
            Self::Serialize(_) => "Serialize",
            Self::Config(_) => "Config",
            Self::ResponderMissing => "ResponderMissing",
            Self::ResponseAlreadySent => "ResponseAlreadySent",
            Self::ResponseSuperseded => "ResponseSuperseded",
            Self::ResponseDropped => "ResponseDropped",
        }
    }

    /// Build a transport error from an AWS error code and message
    pub fn transport(code: Option<impl Into<String>>, message: impl Into<String>) -> Self {
        Self::Transport {
            code: code.map(Into::into),
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
