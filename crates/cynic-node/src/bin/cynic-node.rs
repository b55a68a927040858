// Path: crates/cynic-node/src/bin/cynic-node.rs
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use tracing::{info, warn};

use cynic_crypto::sign::Ed25519KeyPair;
use cynic_node::controller::NodeController;
use cynic_node::scheduler;
use cynic_storage::CynicStore;
use cynic_types::config::CynicConfig;

#[derive(Parser, Debug)]
#[clap(name = "cynic-node", about = "A CYNIC protocol validator node")]
struct Opts {
    /// Directory holding this node's identity, configuration, and storage.
    #[clap(long, default_value = "./cynic-data")]
    data_dir: PathBuf,

    /// Address the telemetry HTTP server (`/metrics`, `/healthz`,
    /// `/readyz`) binds to.
    #[clap(long, default_value = "127.0.0.1:9100")]
    telemetry_addr: std::net::SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    cynic_telemetry::init::init_tracing().context("failed to install tracing subscriber")?;
    cynic_telemetry::prometheus_sink::init().context("failed to install prometheus sink")?;

    let opts = Opts::parse();
    fs::create_dir_all(&opts.data_dir)
        .with_context(|| format!("failed to create data dir {}", opts.data_dir.display()))?;

    let keypair = load_or_generate_identity(&opts.data_dir)?;
    let config = load_config(&opts.data_dir)?;
    let ratios = cynic_constants::init(config.timing.timing_base_ms)
        .map_err(|e| anyhow::anyhow!("failed to initialize ratio kernel: {e}"))?;

    let store_path = opts.data_dir.join("store.redb");
    let _store = CynicStore::open(&store_path)
        .with_context(|| format!("failed to open store at {}", store_path.display()))?;

    info!(
        target: "node",
        data_dir = %opts.data_dir.display(),
        telemetry_addr = %opts.telemetry_addr,
        "starting node"
    );

    let mut controller = NodeController::new(config, keypair);
    let (shutdown, shutdown_rx) = scheduler::shutdown_channel();

    let telemetry_task = tokio::spawn(cynic_telemetry::http::run_server(opts.telemetry_addr));
    let scheduler_task = tokio::spawn(async move {
        scheduler::run(&mut controller, ratios, shutdown_rx).await;
        controller
    });

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(target: "node", error = %e, "failed to install ctrl-c handler");
            }
            shutdown.shutdown();
        }
    }

    let _controller = scheduler_task.await.context("scheduler task panicked")?;
    telemetry_task.abort();
    info!(target: "node", "node stopped");
    Ok(())
}

/// Loads this node's identity seed from `data_dir/identity.seed`, generating
/// and persisting a fresh one on first run.
fn load_or_generate_identity(data_dir: &std::path::Path) -> Result<Ed25519KeyPair> {
    let seed_path = data_dir.join("identity.seed");
    if seed_path.exists() {
        let bytes = fs::read(&seed_path)
            .with_context(|| format!("failed to read {}", seed_path.display()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("identity.seed is not 32 bytes"))?;
        Ed25519KeyPair::from_seed(&seed).map_err(|e| anyhow::anyhow!("bad identity seed: {e}"))
    } else {
        info!(target: "node", "no identity found, generating a new one");
        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        fs::write(&seed_path, seed)
            .with_context(|| format!("failed to write {}", seed_path.display()))?;
        Ed25519KeyPair::from_seed(&seed).map_err(|e| anyhow::anyhow!("bad generated seed: {e}"))
    }
}

/// Loads `data_dir/config.toml` if present, otherwise falls back to a
/// default configuration seeded with the minimal genesis dimension set.
fn load_config(data_dir: &std::path::Path) -> Result<CynicConfig> {
    let config_path = data_dir.join("config.toml");
    if config_path.exists() {
        let s = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        CynicConfig::from_toml_str(&s).map_err(|e| anyhow::anyhow!("invalid config.toml: {e}"))
    } else {
        Ok(CynicConfig::default())
    }
}
