//! Handlers for `errors list` and `errors resolve`.

use serde_json::json;
use tabled::Tabled;

use super::view::local_time;
use super::{one_shot_console, output};
use crate::config::Config;
use crate::domain::SystemError;
use crate::error::Result;

#[derive(Tabled)]
struct ErrorRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Resolved")]
    resolved: String,
}

impl From<&SystemError> for ErrorRow {
    fn from(error: &SystemError) -> Self {
        Self {
            id: error.id.clone(),
            time: local_time(error.timestamp),
            severity: error.severity.to_string(),
            message: error.message.clone(),
            resolved: if error.resolved { "yes" } else { "no" }.to_string(),
        }
    }
}

pub async fn list(config: &Config, all: bool) -> Result<()> {
    let console = one_shot_console(config);
    let log = console.error_log();
    let entries = if all {
        log.list().await?
    } else {
        log.refresh().await?;
        log.unresolved()
    };

    if output::is_json() {
        output::json_output(json!({ "command": "errors.list", "errors": entries }));
        return Ok(());
    }

    output::section("Errors");
    let empty = if all { "No errors" } else { "No unresolved errors" };
    output::table(entries.iter().map(ErrorRow::from).collect(), empty);
    Ok(())
}

pub async fn resolve(config: &Config, id: &str) -> Result<()> {
    let console = one_shot_console(config);
    let outcome = console.error_log().resolve(id).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "errors.resolve",
            "id": outcome.id,
            "confirmed": outcome.confirmed,
        }));
        return Ok(());
    }

    if outcome.confirmed {
        output::success(&format!("Resolved {id}"));
    } else {
        output::warning(&format!("The bot still reports {id} as open"));
    }
    Ok(())
}
