// Path: crates/cynic-node/src/scheduler.rs
//! Drives a [`NodeController`] through its slot/block/epoch cadence: one
//! `tokio::select!` loop over a handful of `tokio::time::interval` timers
//! plus a shutdown watch channel, all missed-tick behavior set to `Skip` so a
//! stalled tick never causes a burst of catch-up work.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use cynic_constants::Ratios;
use cynic_crypto::hash::sha256;

use crate::controller::NodeController;

/// Requests the scheduler loop stop after its current iteration.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signals every running [`run`] loop built from this handle's receiver
    /// to begin shutting down.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Builds a fresh shutdown channel, returning the handle callers signal on
/// and the receiver the scheduler loop watches.
#[must_use]
pub fn shutdown_channel() -> (ShutdownHandle, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, rx)
}

/// Derives a placeholder state root for slot `slot`. A full implementation
/// would fold the root over the judgment/knowledge Merkle roots sealed that
/// slot; until those are wired through the scheduler, hashing the slot
/// index keeps every sealed block's `state_root` distinct and deterministic.
fn slot_state_root(slot: u64) -> [u8; 32] {
    sha256(slot.to_le_bytes()).unwrap_or([0u8; 32])
}

/// Runs the node's slot cadence until `shutdown_rx` observes a shutdown
/// signal. Advances the controller's slot counter on every `SLOT_MS` tick,
/// sealing any pending judgment and knowledge batches; advances the epoch
/// counter on every `EPOCH_MS` tick, pruning the chain log below the
/// previous cycle boundary.
pub async fn run(
    controller: &mut NodeController,
    ratios: Ratios,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    controller.mark_ready();

    let mut slot_ticker = time::interval(Duration::from_millis(ratios.slot_ms.max(1)));
    slot_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut epoch_ticker = time::interval(Duration::from_millis(ratios.epoch_ms.max(1)));
    epoch_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut slot: u64 = 0;
    let mut cycle_boundary: u64 = 0;

    info!(
        target: "node",
        slot_ms = ratios.slot_ms,
        epoch_ms = ratios.epoch_ms,
        "scheduler started"
    );

    loop {
        tokio::select! {
            biased;

            _ = slot_ticker.tick() => {
                slot += 1;
                on_slot(controller, slot);
            }
            _ = epoch_ticker.tick() => {
                on_epoch(controller, slot, &mut cycle_boundary);
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    controller.begin_shutdown();
    info!(target: "node", final_slot = slot, "scheduler stopped");
}

fn on_slot(controller: &mut NodeController, slot: u64) {
    if controller.pending.is_empty() {
        return;
    }
    let state_root = slot_state_root(slot);
    if let Err(e) = controller.seal_next_judgment_block(slot, state_root, slot) {
        warn!(target: "node", error = %e, slot, "failed to seal judgment block");
    }
    if let Err(e) = controller.seal_next_knowledge_block(slot, state_root, slot) {
        warn!(target: "node", error = %e, slot, "failed to seal knowledge block");
    }
}

fn on_epoch(controller: &mut NodeController, slot: u64, cycle_boundary: &mut u64) {
    let cycle_len = controller
        .config
        .chain
        .epochs_per_cycle
        .saturating_mul(controller.config.chain.slots_per_epoch);
    if cycle_len == 0 || slot < *cycle_boundary + cycle_len {
        return;
    }
    *cycle_boundary += cycle_len;
    let operator = controller.operator.pubkey.clone();
    controller.chain.prune_below(&operator, *cycle_boundary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cynic_crypto::sign::Ed25519KeyPair;
    use cynic_types::config::CynicConfig;

    #[tokio::test(start_paused = true)]
    async fn scheduler_stops_promptly_on_shutdown_signal() {
        let keypair = Ed25519KeyPair::generate().expect("keygen");
        let mut controller = NodeController::new(CynicConfig::default(), keypair);
        let ratios = cynic_constants::ratios();
        let (handle, rx) = shutdown_channel();

        let slot_ms = ratios.slot_ms.max(1);
        let task = tokio::spawn(async move {
            run(&mut controller, ratios, rx).await;
            controller
        });

        time::advance(Duration::from_millis(slot_ms * 2)).await;
        handle.shutdown();
        let controller = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("scheduler task joined")
            .expect("scheduler task did not panic");

        assert_eq!(controller.state, crate::controller::NodeState::ShuttingDown);
    }
}
