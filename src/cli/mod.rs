//! Command-line interface.
//!
//! - Argument parsing
//! - Version display
//! - Session and theme commands over an [`AdminContext`]
//!
//! # Usage
//!
//! ```ignore
//! use smsadmin::cli::{parse_args, run_cli_command, AdminContext};
//!
//! let command = parse_args(std::env::args());
//! let ctx = AdminContext::from_config(&AdminConfig::from_env());
//! run_cli_command(command, &ctx).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, ThemeAction, USAGE};
pub use commands::AdminContext;
pub use version::{handle_version_command, version_line, VERSION};

use color_eyre::eyre::bail;
use color_eyre::Result;
use std::io::Write;

/// Execute a parsed command, writing its output to stdout.
///
/// `Version` never returns (it exits the process).
pub async fn run_cli_command(command: CliCommand, ctx: &AdminContext) -> Result<()> {
    let mut out = std::io::stdout();

    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            writeln!(out, "{}", USAGE)?;
            Ok(())
        }
        CliCommand::Invalid(reason) => bail!("{}\n\n{}", reason, USAGE),
        CliCommand::Login { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            commands::login(ctx, &email, &password, &mut out).await
        }
        CliCommand::Logout => commands::logout(ctx, &mut out),
        CliCommand::Whoami => commands::whoami(ctx, &mut out).await,
        CliCommand::Status => commands::status(ctx, &mut out).await,
        CliCommand::Theme(ThemeAction::Watch) => {
            let shutdown = commands::wait_for_interrupt(tokio::signal::ctrl_c());
            commands::watch_theme(ctx, shutdown, &mut out).await
        }
        CliCommand::Theme(action) => commands::theme(ctx, action, &mut out),
        CliCommand::Stats => commands::stats(ctx, &mut out).await,
    }
}
