use smsadmin::cli::{parse_args, run_cli_command, AdminContext, CliCommand};
use smsadmin::config::AdminConfig;
use smsadmin::logging::init_tracing;

use color_eyre::Result;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        smsadmin::cli::handle_version_command();
    }

    color_eyre::install()?;
    init_tracing();

    let config = AdminConfig::from_env();
    tracing::debug!(api = %config.api_base_url, data_dir = %config.data_dir.display(), "Loaded config");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let ctx = AdminContext::from_config(&config);
        run_cli_command(command, &ctx).await
    })
}
