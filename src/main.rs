use stockroom::{config::Config, driver};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional path to a JSON config file
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with_thread_names(true)
        .init();

    info!("Stockroom starting...");
    info!(
        "Comparing {:?} with {} workers x {} keys",
        config.store.kind, config.driver.workers, config.driver.keys_per_worker
    );

    let token = CancellationToken::new();

    tokio::select! {
        reports = driver::run(&config, token.clone()) => {
            for report in reports? {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        _ = tokio::signal::ctrl_c() => warn!("Interrupted, stopping store owners"),
    }

    token.cancel();
    Ok(())
}
