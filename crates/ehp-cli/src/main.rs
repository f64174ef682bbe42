use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use ehp_cli::{
    CommandContext, ConfigCommands, ListArgs, OutputFormat, PointersArgs, RepackArgs, UnpackArgs,
    commands,
    config_manager::ConfigManager,
    output::{OutputStyle, format_error},
};

#[derive(Parser)]
#[command(
    name = "ehp",
    about = "Unpack and repack EHP game archives",
    version,
    author,
    long_about = "A command-line tool for EHP archives: extracts entries into a project directory, \
                  renders pointer tables as editable text and rebuilds byte-exact archives."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every entry of an archive into a directory
    Unpack(UnpackArgs),

    /// Build an archive from a project directory
    Repack(RepackArgs),

    /// List the entries of an archive
    List(ListArgs),

    /// Show a pointer table as text
    Pointers(PointersArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!(
            "{}",
            format_error(&format!("Error: {err:#}"), &OutputStyle::new())
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config {
        Some(path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };
    let mut ctx = CommandContext {
        format: cli.format,
        config,
    };

    match cli.command {
        Commands::Unpack(args) => commands::unpack::handle(args, &ctx)?,
        Commands::Repack(args) => commands::repack::handle(args, &ctx)?,
        Commands::List(args) => commands::list::handle(args, &ctx)?,
        Commands::Pointers(args) => commands::pointers::handle(args, &ctx)?,
        Commands::Config(cmd) => commands::config::handle(cmd, &mut ctx)?,
    }

    Ok(())
}
