//! Binary entry point: parse arguments, connect, dispatch, exit.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qrng_client::transport::QrngBus;
use qrng_client::{run_sequential, Cli, Dispatcher, Result, RunConfig};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cfg: RunConfig) -> Result<()> {
    let bus = QrngBus::connect(cfg.system).await?;
    tracing::debug!(
        "connected to {} bus",
        if cfg.system { "system" } else { "session" }
    );

    let aggregate = if cfg.concurrency == 1 {
        run_sequential(&bus, &cfg).await?
    } else {
        Dispatcher::new(bus, cfg.clone()).run().await?
    };

    tracing::debug!(
        "run finished: {} sent, {} succeeded, {} failed",
        aggregate.sent,
        aggregate.succeeded,
        aggregate.failed
    );
    aggregate.verdict()
}

// All submission, event pumping and completion handling interleaves on one
// thread of control; in-flight calls overlap only logically.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match RunConfig::from_cli(cli) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("qrng-client: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
