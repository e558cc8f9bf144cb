//! Operator command line.
//!
//! One-shot subcommands attach to the persisted session, load every feed
//! once so local guards see current state, run, and exit. `watch` keeps the
//! console alive and polls until stdin closes or the operator quits.

pub mod auth;
pub mod check;
pub mod command;
pub mod control;
pub mod errors;
pub mod output;
pub mod paths;
pub mod strategy;
pub mod symbols;
pub mod view;
pub mod watch;

use std::sync::Arc;

pub use command::{Cli, Commands};

use crate::adapter::http::HttpBotApi;
use crate::adapter::notifier::LogNotifier;
use crate::adapter::token_file::FileTokenStore;
use crate::application::{Console, ConsoleSettings};
use crate::config::Config;
use crate::error::Result;
use crate::port::Notifier;
use command::{ErrorsCommand, StrategyCommand, SymbolsCommand};
use output::OutputConfig;

/// Wire a console against the configured bot.
pub fn build_console(config: &Config, notifier: Arc<dyn Notifier>) -> Console {
    Console::new(
        ConsoleSettings::from_config(config),
        Arc::new(HttpBotApi::from_config(&config.api)),
        Arc::new(FileTokenStore::new(config.session.token_path())),
        notifier,
    )
}

/// Console for one-shot commands; events only go to the log.
pub(crate) fn one_shot_console(config: &Config) -> Console {
    build_console(config, Arc::new(LogNotifier))
}

/// Run the selected subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(
        OutputConfig {
            json: cli.json,
            quiet: cli.quiet,
        },
        cli.color,
    );

    if let Commands::Check = cli.command {
        return check::execute(&cli.config).await;
    }

    let config = Config::load_or_default(&cli.config)?;
    config.init_logging();

    match cli.command {
        Commands::Login(args) => auth::login(&config, args.password).await,
        Commands::Logout => auth::logout(&config).await,
        Commands::Status => view::status(&config).await,
        Commands::Trades(args) => view::trades(&config, args.limit).await,
        Commands::News(args) => view::news(&config, args.limit).await,
        Commands::Errors(ErrorsCommand::List(args)) => errors::list(&config, args.all).await,
        Commands::Errors(ErrorsCommand::Resolve(args)) => errors::resolve(&config, &args.id).await,
        Commands::Start(args) => control::start(&config, &args.symbols).await,
        Commands::Stop => control::stop(&config).await,
        Commands::EmergencyStop => control::emergency_stop(&config).await,
        Commands::Trade(args) => control::trade(&config, &args).await,
        Commands::Strategy(StrategyCommand::Show) => strategy::show(&config).await,
        Commands::Strategy(StrategyCommand::Update(args)) => {
            strategy::update(&config, &args.file).await
        }
        Commands::Symbols(SymbolsCommand::Show) => symbols::show(&config).await,
        Commands::Symbols(SymbolsCommand::Update(args)) => {
            symbols::update(&config, &args.symbols).await
        }
        Commands::Watch(args) => watch::execute(&config, args.password).await,
        Commands::Check => Ok(()),
    }
}
