//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for ago-backup using clap,
//! plus the two selection front ends the backup commands run through.

pub mod commands;
pub mod console;
pub mod id_list;
pub mod output;

use clap::{Parser, Subcommand};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "ago-backup.toml";

/// ago-backup - ArcGIS Online content backup
#[derive(Parser, Debug)]
#[command(name = "ago-backup")]
#[command(version, about, long_about = None)]
#[command(author = "ago-backup Contributors")]
pub struct Cli {
    /// Path to configuration file [default: ago-backup.toml]
    #[arg(short, long, env = "AGO_BACKUP_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "AGO_BACKUP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration file path, explicit or default
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
    }

    /// Whether the configuration path was named by the user
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse folders and pick items to back up interactively
    Backup(commands::backup::BackupArgs),

    /// Back up items given by ID (--ids, --ids-file or stdin)
    BackupIds(commands::backup_ids::BackupIdsArgs),

    /// List folders and backupable items
    List(commands::list::ListArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_backup() {
        let cli = Cli::parse_from(["ago-backup", "backup"]);
        assert_eq!(cli.config_path(), DEFAULT_CONFIG_PATH);
        assert!(!cli.config_is_explicit());
        assert!(matches!(cli.command, Commands::Backup(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["ago-backup", "--config", "custom.toml", "backup"]);
        assert_eq!(cli.config_path(), "custom.toml");
        assert!(cli.config_is_explicit());
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ago-backup", "--log-level", "debug", "list"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_cli_parse_backup_ids() {
        let cli = Cli::parse_from(["ago-backup", "backup-ids", "--ids", "abc,def"]);
        match cli.command {
            Commands::BackupIds(args) => assert_eq!(args.ids.as_deref(), Some("abc,def")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_ids_and_ids_file_together() {
        let result = Cli::try_parse_from([
            "ago-backup",
            "backup-ids",
            "--ids",
            "abc",
            "--ids-file",
            "ids.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["ago-backup", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ago-backup", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
