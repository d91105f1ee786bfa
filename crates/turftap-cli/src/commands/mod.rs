//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod context;
pub mod init;
pub mod listing;
pub mod user;
pub mod vote;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use context::{GlobalArgs, Session};

/// turftap - community sports ground directory
#[derive(Debug, Parser)]
#[command(name = "turftap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the configuration)
    #[arg(long, global = true, env = "TURFTAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Act as this user (id or email)
    #[arg(long = "as", global = true, env = "TURFTAP_AS", value_name = "USER")]
    pub acting_as: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize configuration and data directory
    Init(init::InitArgs),

    /// Sign in and manage users
    #[command(subcommand)]
    User(user::UserCommand),

    /// Submit, browse and moderate grounds
    #[command(subcommand)]
    Listing(listing::ListingCommand),

    /// Vote on grounds
    #[command(subcommand)]
    Vote(vote::VoteCommand),

    /// Discuss grounds
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let globals = GlobalArgs {
        config: cli.config,
        data_dir: cli.data_dir,
        acting_as: cli.acting_as,
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Init(args) => init::execute(args, &globals),
        Commands::Config(cmd) => config::execute(cmd, &globals),
        Commands::User(cmd) => user::execute(cmd, &Session::open(&globals)?),
        Commands::Listing(cmd) => listing::execute(cmd, &Session::open(&globals)?),
        Commands::Vote(cmd) => vote::execute(cmd, &Session::open(&globals)?),
        Commands::Comment(cmd) => comment::execute(cmd, &Session::open(&globals)?),
    }
}

/// Pretty-print a value as JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
