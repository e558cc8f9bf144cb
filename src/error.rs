use thiserror::Error;

use crate::domain::CommandKind;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Login and session errors. None of these leave a session behind.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("password is required")]
    MissingPassword,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("login endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("failed to persist session token: {0}")]
    Storage(String),
}

/// Client-side pre-flight failures for manual trades.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("symbol is required")]
    EmptySymbol,

    #[error("symbol '{symbol}' is not in the tradable set")]
    UnknownSymbol { symbol: String },

    #[error("side must be buy or sell, got '{side}'")]
    InvalidSide { side: String },

    #[error("order type must be market or limit, got '{order_type}'")]
    InvalidOrderType { order_type: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A command turned away locally, before any network call.
    #[error("{0}")]
    Rejected(String),
}

impl Error {
    /// True for transport-level failures (connect, timeout, broken body).
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Connection(_) | Self::Timeout(_)
        )
    }

    /// True when the server rejected the credentials or the token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl From<CommandError> for Error {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Remote(e) => e,
            CommandError::Validation(e) => Self::Validation(e),
            other => Self::Rejected(other.to_string()),
        }
    }
}

/// Outcome of an operator command that did not succeed.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} is already in flight")]
    InFlight(CommandKind),

    #[error("bot is already running")]
    AlreadyRunning,

    #[error("trading is disabled by the bot's risk limits")]
    TradingDisabled,

    #[error("not logged in")]
    NotAuthenticated,

    #[error("at least one symbol is required")]
    NoSymbols,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] Error),
}

impl CommandError {
    /// True when the command was turned away before any network call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Remote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_only_status_401() {
        let err = Error::Server {
            status: 401,
            detail: "bad token".into(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_network());

        let err = Error::Server {
            status: 500,
            detail: "boom".into(),
        };
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn connection_and_timeout_are_network() {
        assert!(Error::Connection("refused".into()).is_network());
        assert!(Error::Timeout(std::time::Duration::from_secs(2)).is_network());
    }

    #[test]
    fn validation_message_matches_operator_text() {
        assert_eq!(
            ValidationError::NonPositiveQuantity.to_string(),
            "quantity must be positive"
        );
    }

    #[test]
    fn local_rejections_are_flagged() {
        assert!(CommandError::AlreadyRunning.is_local());
        assert!(CommandError::InFlight(CommandKind::Start).is_local());
        assert!(!CommandError::Remote(Error::Connection("x".into())).is_local());
    }

    #[test]
    fn command_errors_flatten_into_crate_error() {
        let err: Error = CommandError::AlreadyRunning.into();
        assert_eq!(err.to_string(), "bot is already running");

        let err: Error = CommandError::Validation(ValidationError::NonPositiveQuantity).into();
        assert!(matches!(err, Error::Validation(_)));

        let err: Error = CommandError::Remote(Error::Timeout(std::time::Duration::from_secs(1))).into();
        assert!(err.is_network());
    }
}
