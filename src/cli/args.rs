//! Command-line argument parsing.

use crate::theme::ThemeMode;

/// What the `theme` command should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the current mode and resolved theme
    Show,
    /// Switch to an explicit mode or back to system
    Set(ThemeMode),
    /// Flip between light and dark
    Toggle,
    /// Follow OS appearance changes until interrupted
    Watch,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Sign in; the password is prompted for
    Login { email: String },
    /// Sign out
    Logout,
    /// Verify the stored session and print the user
    Whoami,
    /// Print session phase and theme
    Status,
    /// Show or change the theme preference
    Theme(ThemeAction),
    /// Print dashboard stats as JSON
    Stats,
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments could not be understood
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: smsadmin <command>

Commands:
  login <email>                     Sign in (prompts for the password)
  logout                            Sign out and forget the stored token
  whoami                            Show the signed-in admin
  status                            Show session and theme state
  theme [light|dark|system|toggle]  Show or change the theme preference
  theme watch                       Print the resolved theme as the OS changes
  stats                             Print dashboard stats as JSON

Options:
  -h, --help                        Show this help
  -V, --version                     Show version information

Environment:
  SMSADMIN_API_URL                  Backend base URL (default http://localhost:4000)
  SMSADMIN_DATA_DIR                 Where the session and theme are stored
  RUST_LOG                          Log filter (default warn)";

/// Parse command-line arguments into a [`CliCommand`].
///
/// `--version`/`--help` anywhere win over the subcommand.
///
/// # Examples
///
/// ```
/// use smsadmin::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["smsadmin".to_string(), "logout".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Logout);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let mut rest = args.iter().map(String::as_str);
    let Some(command) = rest.next() else {
        return CliCommand::Help;
    };
    let operand = rest.next();
    if let Some(extra) = rest.next() {
        return CliCommand::Invalid(format!("unexpected argument '{}'", extra));
    }

    match (command, operand) {
        ("login", Some(email)) => CliCommand::Login {
            email: email.to_string(),
        },
        ("login", None) => CliCommand::Invalid("login requires an email address".to_string()),
        ("logout", None) => CliCommand::Logout,
        ("whoami", None) => CliCommand::Whoami,
        ("status", None) => CliCommand::Status,
        ("stats", None) => CliCommand::Stats,
        ("theme", None) => CliCommand::Theme(ThemeAction::Show),
        ("theme", Some("toggle")) => CliCommand::Theme(ThemeAction::Toggle),
        ("theme", Some("watch")) => CliCommand::Theme(ThemeAction::Watch),
        ("theme", Some(mode)) => match mode.parse::<ThemeMode>() {
            Ok(mode) => CliCommand::Theme(ThemeAction::Set(mode)),
            Err(e) => CliCommand::Invalid(e.to_string()),
        },
        ("logout" | "whoami" | "status" | "stats", Some(extra)) => {
            CliCommand::Invalid(format!("unexpected argument '{}'", extra))
        }
        (other, _) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}
