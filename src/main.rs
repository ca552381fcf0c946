use anyhow::Context;
use config_manager::{ConfigurationError, SystemConfig};
use dex_client::{DexScreenerClient, HeliusClient};
use job_orchestrator::{BuyerScanOrchestrator, ScanSettings};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,early_buyers=debug,job_orchestrator=debug".into()),
        )
        .init();

    let config = match SystemConfig::load() {
        Ok(config) => config,
        Err(err @ ConfigurationError::MissingCredential) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            eprintln!("Check config.toml and SNIFFER__* environment variables.");
            return ExitCode::from(2);
        }
    };
    info!("Configuration loaded successfully");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("❌ Scan failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SystemConfig) -> anyhow::Result<()> {
    let market = DexScreenerClient::new(config.dexscreener.clone())
        .context("failed to build DexScreener client")?;
    let chain = HeliusClient::new(config.helius.clone()).context("failed to build Helius client")?;

    let orchestrator = BuyerScanOrchestrator::new(market, chain, ScanSettings::from_config(&config));
    let summary = orchestrator.run().await?;

    for pool in &summary.pools {
        info!(
            "Pool {} ({}): {} signatures, {} transactions in window, {} buyer observations",
            pool.pair_address,
            pool.dex_id.as_deref().unwrap_or("unknown"),
            pool.signatures,
            pool.transactions_in_window,
            pool.observations
        );
    }
    info!(
        "Done: {} unique buyers -> {}",
        summary.unique_buyers,
        summary.report_path.display()
    );

    Ok(())
}
