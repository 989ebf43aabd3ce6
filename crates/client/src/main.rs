//! Production-line calculator binary.
//!
//! Composition root: loads `.env`, configures logging, builds the runtime
//! from `PLCALC_*` variables and runs the console transport on stdin.
//!
//! ```bash
//! PLCALC_DATA_DIR=./data cargo run -p plcalc-client
//! ```

use anyhow::Result;
use plcalc_client::{WriterSink, logging, run_console};
use runtime::{Runtime, RuntimeConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::setup_logging();

    let config = RuntimeConfig::from_env();
    tracing::info!("Starting production-line calculator");
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Command prefix: {}", config.command_prefix);

    let runtime = Runtime::builder().config(config).build().await?;
    tracing::info!("Runtime built, reading commands from stdin");

    let sink = WriterSink::new(tokio::io::stdout());
    run_console(&runtime, BufReader::new(tokio::io::stdin()), &sink).await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}
