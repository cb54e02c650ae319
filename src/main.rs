mod app;
mod commands;
mod config;
mod conversation;
mod errors;
mod export;
mod markdown;
mod output;
mod parse;
mod session;
mod theme;
mod ticker;
mod tui;
mod webhook;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::Runtime;
use crate::commands::chat::ChatArgs;
use crate::commands::config::ConfigCommand;
use crate::commands::tui::TuiArgs;
use crate::errors::CliError;
use crate::output::{OutputMode, print_error};

#[derive(Debug, Parser)]
#[command(
    name = "tripchat",
    version,
    about = "Terminal chat client for the AI travel-planning workflow."
)]
struct Cli {
    #[arg(long = "webhook-url", global = true)]
    webhook_url: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, global = true)]
    quiet: bool,
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive chat (the default)
    Tui(TuiArgs),
    /// Send one request and print the reply
    Chat(ChatArgs),
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = run(cli, output.clone()).await;
    if let Err(err) = result {
        print_error(&err, &output);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli, output: OutputMode) -> Result<(), CliError> {
    let config = config::load_config()?;

    let mut runtime = Runtime {
        output,
        config,
        webhook_override: cli.webhook_url,
    };

    match cli.command {
        None => commands::tui::handle(&runtime, TuiArgs { theme: None }).await,
        Some(Commands::Tui(args)) => commands::tui::handle(&runtime, args).await,
        Some(Commands::Chat(args)) => commands::chat::handle(&runtime, args).await,
        Some(Commands::Config { command }) => commands::config::handle(&mut runtime, command).await,
    }
}
