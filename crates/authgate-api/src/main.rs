//! Main entry point for authgate

use authgate_api::{config::Config, server::Server};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "authgate", about = "HTTP facade over an AWS Cognito user pool", version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    gen_config: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.gen_config {
        println!("{}", Config::generate_example()?);
        return Ok(());
    }

    authgate_common::logging::init_logging(
        &args.verbosity,
        "authgate=info,authgate_api=info,tower_http=info",
    )?;

    info!("Starting authgate v{}", authgate_api::VERSION);

    let config = Config::load(args.config.as_deref())?;
    info!(
        "Configuration loaded, binding to {}",
        config.server.bind_address
    );

    let server = Server::new(config).await.map_err(|e| {
        error!("Startup failed: {}", e);
        e
    })?;

    match server.run().await {
        Ok(()) => {
            info!("authgate shut down gracefully");
            Ok(())
        }
        Err(e) => {
            error!("authgate error: {}", e);
            Err(e.into())
        }
    }
}
