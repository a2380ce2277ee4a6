//! CLI command definitions for the `ally` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod endpoint;
pub mod remind;
pub mod settings;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ally legal-assistance backend: chat proxy, settings, and reminders.
#[derive(Parser)]
#[command(name = "ally", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log events as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "ALLY_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,ally_core=debug,ally_infra=debug,ally_api=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat with the assistant (interactive when no message is given).
    Chat {
        /// Send a single message and print the reply.
        message: Option<String>,

        /// Conversation session to use.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show or change system settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Print the resolved generation endpoint and credential source.
    Endpoint,

    /// Send appointment reminders to a client and a lawyer.
    Remind(remind::RemindArgs),

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show current settings.
    Show,

    /// Change one or both toggles; unspecified toggles keep their current value.
    Set {
        /// Require email verification for new accounts.
        #[arg(long)]
        email_verification: Option<bool>,

        /// Send appointment reminder emails.
        #[arg(long)]
        reminders: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_directives() {
        let cli = Cli::parse_from(["ally", "--quiet", "endpoint"]);
        assert_eq!(cli.log_directive(), "error");
        let cli = Cli::parse_from(["ally", "endpoint"]);
        assert_eq!(cli.log_directive(), "warn");
        let cli = Cli::parse_from(["ally", "-vv", "endpoint"]);
        assert_eq!(cli.log_directive(), "trace");
    }

    #[test]
    fn test_settings_set_parses_bools() {
        let cli = Cli::parse_from(["ally", "settings", "set", "--reminders", "true"]);
        match cli.command {
            Commands::Settings {
                action:
                    SettingsCommand::Set {
                        email_verification,
                        reminders,
                    },
            } => {
                assert_eq!(email_verification, None);
                assert_eq!(reminders, Some(true));
            }
            _ => panic!("expected settings set"),
        }
    }
}
