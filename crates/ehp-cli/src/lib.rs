//! EHP archive tool library
//!
//! This library provides the command handlers behind the `ehp` binary. The
//! binary only parses arguments, sets up logging and dispatches here.

pub mod commands;
pub mod config_manager;
pub mod output;
pub mod project;

pub use crate::commands::{
    config::handle as handle_config, list::handle as handle_list,
    pointers::handle as handle_pointers, repack::handle as handle_repack,
    unpack::handle as handle_unpack,
};

use crate::config_manager::ConfigManager;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Archive to unpack
    pub archive: PathBuf,

    /// Directory receiving the entries
    pub output: PathBuf,

    /// Use the _anim-ptrs.txt/_animetc-ptrs.txt aliases
    #[arg(long)]
    pub custom_mode: bool,
}

#[derive(Args, Debug)]
pub struct RepackArgs {
    /// Project directory holding the entries
    pub input: PathBuf,

    /// Archive to write (defaults to `output_name` from the configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Map the _anim-ptrs.txt/_animetc-ptrs.txt aliases back
    #[arg(long)]
    pub custom_mode: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Archive to list
    pub archive: PathBuf,
}

#[derive(Args, Debug)]
pub struct PointersArgs {
    /// Archive holding the pointer table
    pub archive: PathBuf,

    /// Name of the pointer table entry
    pub entry: String,

    /// Accept and show custom-mode aliases
    #[arg(long)]
    pub custom_mode: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Confirm reset
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format options for the CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl OutputFormat {
    /// Check if the format is one of the JSON variants
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty)
    }

    /// Serialize `value` according to the JSON variant
    pub fn to_json<T: serde::Serialize>(self, value: &T) -> serde_json::Result<String> {
        if self == Self::JsonPretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// Context for command execution
#[derive(Debug)]
pub struct CommandContext {
    /// Output format
    pub format: OutputFormat,
    /// Loaded configuration
    pub config: ConfigManager,
}

impl CommandContext {
    /// Effective custom-mode setting: the flag or the configured default
    pub fn custom_mode(&self, flag: bool) -> bool {
        flag || self.config.config().custom_mode
    }
}
