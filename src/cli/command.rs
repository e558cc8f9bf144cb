//! Command-line interface definitions.
//!
//! Every subcommand talks to the bot configured under `[api]`. Commands
//! that act on the bot reuse the session persisted by `helmsman login`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Operator console for a remote trading bot
#[derive(Parser, Debug)]
#[command(name = "helmsman")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session token
    Login(LoginArgs),

    /// End the session (always clears the local token)
    Logout,

    /// Show bot, portfolio and risk status
    Status,

    /// Show trade history, most recent first
    Trades(TradesArgs),

    /// Show recent market news
    News(NewsArgs),

    /// Inspect and resolve bot errors
    #[command(subcommand)]
    Errors(ErrorsCommand),

    /// Start the bot
    Start(StartArgs),

    /// Stop the bot
    Stop,

    /// Halt trading immediately, regardless of known state
    EmergencyStop,

    /// Place a manual trade
    Trade(TradeArgs),

    /// Show or update the bot's strategy
    #[command(subcommand)]
    Strategy(StrategyCommand),

    /// Show or replace the symbols the bot trades
    #[command(subcommand)]
    Symbols(SymbolsCommand),

    /// Validate configuration and reach the bot
    Check,

    /// Supervise the bot interactively
    Watch(WatchArgs),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Password; prompted for when absent
    #[arg(long, env = "HELMSMAN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Password used when no session is persisted; prompted for when absent
    #[arg(long, env = "HELMSMAN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TradesArgs {
    /// Number of trades to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Parser, Debug)]
pub struct NewsArgs {
    /// Number of items to request (defaults to `polling.news_limit`)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ErrorsCommand {
    /// List errors reported by the bot
    List(ErrorsListArgs),
    /// Ask the bot to mark an error resolved
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
pub struct ErrorsListArgs {
    /// Include resolved errors
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Error id, e.g. err_1714566600
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct StartArgs {
    /// Symbols to trade; the bot keeps its current set when omitted
    pub symbols: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct TradeArgs {
    /// buy or sell
    pub side: String,

    /// Symbol, e.g. dogecoin
    pub symbol: String,

    /// Quantity to trade
    #[arg(allow_negative_numbers = true)]
    pub quantity: Decimal,

    /// market or limit
    #[arg(long, default_value = "market")]
    pub order_type: String,
}

#[derive(Subcommand, Debug)]
pub enum StrategyCommand {
    /// Show the bot's active strategy
    Show,
    /// Push a strategy configuration from a JSON file
    Update(StrategyUpdateArgs),
}

#[derive(Parser, Debug)]
pub struct StrategyUpdateArgs {
    /// JSON file holding the strategy configuration
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum SymbolsCommand {
    /// Show the symbols the bot is trading
    Show,
    /// Replace the bot's symbol set
    Update(SymbolsUpdateArgs),
}

#[derive(Parser, Debug)]
pub struct SymbolsUpdateArgs {
    /// Symbols to trade, e.g. dogecoin cardano
    #[arg(required = true)]
    pub symbols: Vec<String>,
}
