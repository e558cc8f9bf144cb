use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Operator command kinds. Each kind is self-serializing: at most one call
/// of a kind is in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Start,
    Stop,
    EmergencyStop,
    ManualTrade,
    UpdateStrategy,
    UpdateSymbols,
    ResolveError,
}

impl CommandKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::EmergencyStop => "emergency-stop",
            Self::ManualTrade => "manual trade",
            Self::UpdateStrategy => "strategy update",
            Self::UpdateSymbols => "symbols update",
            Self::ResolveError => "resolve error",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server acknowledgement of a command.
///
/// The bot answers commands with loosely shaped JSON
/// (`{"status": "starting", "message": "..."}`); only the two common
/// fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandAck {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl CommandAck {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            status: field("status"),
            message: field("message"),
        }
    }

    /// Human-readable one-liner for banners and CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        match (&self.status, &self.message) {
            (_, Some(message)) => message.clone(),
            (Some(status), None) => status.replace('_', " "),
            (None, None) => "ok".to_string(),
        }
    }
}
