// Path: crates/cynic-node/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! The node controller: wires the judgment engine, chain log, knowledge
//! store, gossip peer set, and consensus trackers into one state machine,
//! and exposes the external interface other processes (a CLI, an RPC
//! gateway, a future HTTP API) call into.

pub mod controller;
pub mod scheduler;

pub use controller::{NodeController, NodeState};
