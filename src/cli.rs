//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// askme - backend for the portfolio "ask me anything" site
#[derive(Parser, Debug)]
#[command(name = "askme")]
#[command(version)]
#[command(about = "Questions, suggestions and analytics API for a portfolio site", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands; no command means `serve`
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Print an Argon2id hash for auth.admin_password_hash
    HashPassword {
        /// Password to hash (if not provided, will prompt interactively)
        #[arg(long, conflicts_with = "stdin")]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::try_parse_from(["askme"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["askme", "migrate", "-c", "prod.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate));
        assert_eq!(cli.config.as_deref(), Some("prod.toml"));
    }

    #[test]
    fn test_hash_password_flags_conflict() {
        assert!(Cli::try_parse_from(["askme", "hash-password", "--password", "x", "--stdin"]).is_err());
        let cli = Cli::try_parse_from(["askme", "hash-password", "--stdin"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::HashPassword {
                password: None,
                stdin: true
            })
        );
    }

    #[test]
    fn test_config_generate() {
        let cli = Cli::try_parse_from(["askme", "config", "generate", "out.toml", "--force"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".to_string()),
                    force: true
                }
            })
        );
    }
}
