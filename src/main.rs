use clap::Parser;
use tracing::debug;

use scanerr::config::CliArgs;
use scanerr::{commands, output};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing
    let default_filter = if args.verbose { "scanerr=debug" } else { "scanerr=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    debug!("scanerr v{}", env!("CARGO_PKG_VERSION"));

    match commands::execute(args).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output::failure(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
