//! Interactive supervision (`watch`).
//!
//! Resumes the persisted session (or logs in), keeps every feed polled in
//! the background and reads console commands from stdin, one per line.
//! Commands run as their own tasks so a slow start never blocks an
//! emergency stop.

use std::str::FromStr;
use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::view::{render_snapshot, TradeRow};
use super::{build_console, output};
use crate::adapter::notifier::ChannelNotifier;
use crate::application::Console;
use crate::config::Config;
use crate::domain::ManualTradeDraft;
use crate::error::{Error, Result};
use crate::port::ConsoleEvent;

const HELP: &str = "status | trades | errors | start [symbols..] | stop | estop | \
trade <side> <symbol> <qty> [type] | resolve <id> | dismiss | logout | quit";

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Status,
    Trades,
    Errors,
    Start(Vec<String>),
    Stop,
    EmergencyStop,
    Trade(ManualTradeDraft),
    Resolve(String),
    Dismiss,
    Logout,
    Help,
    Quit,
}

impl FromStr for WatchCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let rest: Vec<String> = words.map(str::to_string).collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "status" | "s" => Self::Status,
            "trades" | "t" => Self::Trades,
            "errors" | "e" => Self::Errors,
            "start" => Self::Start(rest),
            "stop" => Self::Stop,
            "estop" | "emergency-stop" => Self::EmergencyStop,
            "trade" => {
                let [side, symbol, quantity, tail @ ..] = rest.as_slice() else {
                    return Err("usage: trade <side> <symbol> <qty> [type]".to_string());
                };
                let quantity = Decimal::from_str(quantity)
                    .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
                let order_type = tail.first().map_or("market", String::as_str);
                Self::Trade(ManualTradeDraft::new(
                    symbol.as_str(),
                    side.as_str(),
                    quantity,
                    order_type,
                ))
            }
            "resolve" => match rest.first() {
                Some(id) => Self::Resolve(id.clone()),
                None => return Err("usage: resolve <id>".to_string()),
            },
            "dismiss" => Self::Dismiss,
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(command)
    }
}

pub async fn execute(config: &Config, password: Option<String>) -> Result<()> {
    let (notifier, mut events) = ChannelNotifier::channel();
    let console = Arc::new(build_console(config, Arc::new(notifier)));

    if !console.resume().await {
        let password = match password {
            Some(password) => password,
            None => Password::with_theme(&ColorfulTheme::default())
                .with_prompt("Bot password")
                .interact()?,
        };
        console.login(&password).await?;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    show_status(&console);
    output::hint(HELP);

    let mut liveness = console.session().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<WatchCommand>() {
                    Ok(WatchCommand::Quit) => break,
                    Ok(WatchCommand::Logout) => {
                        console.logout().await;
                        output::success("Logged out");
                        break;
                    }
                    Ok(command) => {
                        let console = Arc::clone(&console);
                        tokio::spawn(async move { run_command(&console, command).await });
                    }
                    Err(message) => output::warning(&message),
                }
            }
            Some(event) = events.recv() => show_event(&event),
            changed = liveness.changed() => {
                if changed.is_err() || !*liveness.borrow() {
                    output::warning("Session ended; log in again to continue");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }
    }

    console.teardown();
    Ok(())
}

async fn run_command(console: &Console, command: WatchCommand) {
    let commands = console.commands();
    let outcome = match command {
        WatchCommand::Status => {
            show_status(console);
            return;
        }
        WatchCommand::Trades => {
            let rows = console.store().trades().iter().take(10).map(TradeRow::from).collect();
            output::table(rows, "No trades yet");
            return;
        }
        WatchCommand::Errors => {
            for error in console.error_log().unresolved() {
                output::event(&error.severity.to_string(), &format!("{} {}", error.id, error.message));
            }
            return;
        }
        WatchCommand::Resolve(id) => {
            match console.error_log().resolve(&id).await {
                Ok(outcome) if outcome.confirmed => output::success(&format!("Resolved {id}")),
                Ok(_) | Err(_) => {}
            }
            return;
        }
        WatchCommand::Dismiss => {
            console.dismiss_banner();
            return;
        }
        WatchCommand::Help => {
            output::hint(HELP);
            return;
        }
        WatchCommand::Start(symbols) => commands.start(&symbols).await,
        WatchCommand::Stop => commands.stop().await,
        WatchCommand::EmergencyStop => commands.emergency_stop().await,
        WatchCommand::Trade(draft) => commands.manual_trade(&draft).await,
        WatchCommand::Logout | WatchCommand::Quit => return,
    };

    // Remote outcomes arrive as notifier events; only local rejections
    // need printing here.
    if let Err(e) = outcome {
        if e.is_local() {
            output::warning(&Error::from(e).to_string());
        }
    }
}

fn show_status(console: &Console) {
    match console.store().snapshot() {
        Some(snapshot) => render_snapshot(&snapshot, Some(console.error_log().summary())),
        None => output::warning("No status available yet"),
    }
}

fn show_event(event: &ConsoleEvent) {
    match event {
        ConsoleEvent::CommandFailed { .. } | ConsoleEvent::ResolveUnconfirmed { .. } => {
            output::error(&event.to_string());
        }
        ConsoleEvent::CommandSucceeded { .. } => output::success(&event.to_string()),
        ConsoleEvent::RefreshFailed { .. } => output::event("refresh", &event.to_string()),
        ConsoleEvent::SessionStarted | ConsoleEvent::SessionEnded => {
            output::event("session", &event.to_string());
        }
    }
}
