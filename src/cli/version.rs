//! `--version` output.

/// Crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name used in help and version output.
pub const BIN_NAME: &str = "smsadmin";

pub fn version_line() -> String {
    format!("{} {}", BIN_NAME, VERSION)
}

/// Print the version and exit successfully.
pub fn handle_version_command() -> ! {
    println!("{}", version_line());
    std::process::exit(0)
}
