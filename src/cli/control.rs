//! Lifecycle and trading commands: `start`, `stop`, `emergency-stop` and
//! `trade`.

use serde_json::json;

use super::command::TradeArgs;
use super::{one_shot_console, output};
use crate::application::Console;
use crate::config::Config;
use crate::domain::{CommandAck, CommandKind, ManualTradeDraft};
use crate::error::{CommandError, Result};

/// Attach to the persisted session so guards see the bot's current state.
async fn attached(config: &Config) -> Console {
    let console = one_shot_console(config);
    if !console.attach().await {
        tracing::debug!("No persisted session");
    }
    console
}

pub async fn start(config: &Config, symbols: &[String]) -> Result<()> {
    let console = attached(config).await;
    let outcome = console.commands().start(symbols).await;
    report(&console, CommandKind::Start, outcome)
}

pub async fn stop(config: &Config) -> Result<()> {
    let console = attached(config).await;
    let outcome = console.commands().stop().await;
    report(&console, CommandKind::Stop, outcome)
}

pub async fn emergency_stop(config: &Config) -> Result<()> {
    let console = attached(config).await;
    let outcome = console.commands().emergency_stop().await;
    report(&console, CommandKind::EmergencyStop, outcome)
}

pub async fn trade(config: &Config, args: &TradeArgs) -> Result<()> {
    let draft = ManualTradeDraft::new(&args.symbol, &args.side, args.quantity, &args.order_type);
    let console = attached(config).await;
    let outcome = console.commands().manual_trade(&draft).await;
    report(&console, CommandKind::ManualTrade, outcome)
}

/// Print the outcome and the bot state that followed it.
pub(crate) fn report(
    console: &Console,
    kind: CommandKind,
    outcome: std::result::Result<CommandAck, CommandError>,
) -> Result<()> {
    let ack = match outcome {
        Ok(ack) => ack,
        Err(CommandError::NotAuthenticated) => {
            output::hint("run `helmsman login` first");
            return Err(CommandError::NotAuthenticated.into());
        }
        Err(e) => return Err(e.into()),
    };

    let running = console.store().bot_state().map(|b| b.running);
    if output::is_json() {
        output::json_output(json!({
            "command": kind,
            "ack": ack,
            "running": running,
        }));
        return Ok(());
    }

    output::success(&format!("{kind}: {}", ack.summary()));
    if let Some(running) = running {
        output::field("Running", running);
    }
    Ok(())
}
