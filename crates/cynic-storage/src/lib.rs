// Path: crates/cynic-storage/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! Durable persistence, backed by `redb`. Keys reuse the path-shaped
//! identifiers from [`cynic_types::keys`] directly as table keys — the same
//! convention the node's on-disk layout uses, so a key here and a file path
//! there are the same string.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use thiserror::Error;

use cynic_types::keys;

const CHAIN_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("chain");
const KNOWLEDGE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("knowledge");
const OPERATOR_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("operator");
const PEERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("peers");
const PROPOSALS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("proposals");

/// Errors from the durable storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying `redb` backend reported an error.
    #[error("backend error: {0}")]
    Backend(String),
    /// The requested key was not present.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<redb::Error> for StorageError {
    fn from(e: redb::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<redb::TableError> for StorageError {
    fn from(e: redb::TableError) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(e: redb::StorageError) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(e: redb::CommitError) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(e: redb::DatabaseError) -> Self {
        Self::Backend(e.to_string())
    }
}

/// A handle to the node's on-disk store.
pub struct CynicStore {
    db: Database,
}

impl CynicStore {
    /// Opens (creating if absent) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path)?;
        let write = db.begin_write()?;
        {
            let _ = write.open_table(CHAIN_TABLE)?;
            let _ = write.open_table(KNOWLEDGE_TABLE)?;
            let _ = write.open_table(OPERATOR_TABLE)?;
            let _ = write.open_table(PEERS_TABLE)?;
            let _ = write.open_table(PROPOSALS_TABLE)?;
        }
        write.commit()?;
        Ok(Self { db })
    }

    fn put(&self, table: TableDefinition<&str, &[u8]>, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let write = self.db.begin_write()?;
        {
            let mut t = write.open_table(table)?;
            t.insert(key, value)?;
        }
        write.commit()?;
        Ok(())
    }

    fn get(&self, table: TableDefinition<&str, &[u8]>, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let read = self.db.begin_read()?;
        let t = read.open_table(table)?;
        Ok(t.get(key)?.map(|v| v.value().to_vec()))
    }

    /// Persists a sealed block's canonical bytes under its operator/slot key.
    pub fn put_block(&self, operator_pubkey_hex: &str, slot: u64, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(CHAIN_TABLE, &keys::chain_block_path(operator_pubkey_hex, slot), bytes)
    }

    /// Loads a sealed block's bytes, if present.
    pub fn get_block(&self, operator_pubkey_hex: &str, slot: u64) -> Result<Option<Vec<u8>>, StorageError> {
        self.get(CHAIN_TABLE, &keys::chain_block_path(operator_pubkey_hex, slot))
    }

    /// Persists one knowledge-store leaf (a pattern or learning record).
    pub fn put_knowledge_leaf(&self, axiom_tag: u8, leaf_id: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(KNOWLEDGE_TABLE, &keys::knowledge_leaf_path(axiom_tag, leaf_id), bytes)
    }

    /// Loads one knowledge-store leaf, if present.
    pub fn get_knowledge_leaf(&self, axiom_tag: u8, leaf_id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.get(KNOWLEDGE_TABLE, &keys::knowledge_leaf_path(axiom_tag, leaf_id))
    }

    /// Persists this node's own operator state.
    pub fn put_operator_state(&self, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(OPERATOR_TABLE, keys::OPERATOR_FILE, bytes)
    }

    /// Loads this node's own operator state, if present.
    pub fn get_operator_state(&self) -> Result<Option<Vec<u8>>, StorageError> {
        self.get(OPERATOR_TABLE, keys::OPERATOR_FILE)
    }

    /// Persists the known peer set.
    pub fn put_peers(&self, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(PEERS_TABLE, keys::PEERS_FILE, bytes)
    }

    /// Loads the known peer set, if present.
    pub fn get_peers(&self) -> Result<Option<Vec<u8>>, StorageError> {
        self.get(PEERS_TABLE, keys::PEERS_FILE)
    }

    /// Persists a governance proposal.
    pub fn put_proposal(&self, proposal_id: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(PROPOSALS_TABLE, &keys::proposal_path(proposal_id), bytes)
    }

    /// Loads a governance proposal, if present.
    pub fn get_proposal(&self, proposal_id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.get(PROPOSALS_TABLE, &keys::proposal_path(proposal_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_tmp() -> (CynicStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cynic.redb");
        let store = CynicStore::open(path).expect("open store");
        (store, dir)
    }

    #[test]
    fn block_roundtrips() {
        let (store, _dir) = open_tmp();
        store.put_block("op1", 5, b"block-bytes").expect("put");
        let got = store.get_block("op1", 5).expect("get").expect("present");
        assert_eq!(got, b"block-bytes");
    }

    #[test]
    fn missing_block_is_none() {
        let (store, _dir) = open_tmp();
        assert!(store.get_block("op1", 5).expect("get").is_none());
    }

    #[test]
    fn operator_state_roundtrips() {
        let (store, _dir) = open_tmp();
        store.put_operator_state(b"{}").expect("put");
        assert_eq!(store.get_operator_state().expect("get"), Some(b"{}".to_vec()));
    }

    #[test]
    fn knowledge_leaf_roundtrips_across_axioms() {
        let (store, _dir) = open_tmp();
        store.put_knowledge_leaf(0, "pat1", b"a").expect("put a");
        store.put_knowledge_leaf(1, "pat1", b"b").expect("put b");
        assert_eq!(store.get_knowledge_leaf(0, "pat1").expect("get"), Some(b"a".to_vec()));
        assert_eq!(store.get_knowledge_leaf(1, "pat1").expect("get"), Some(b"b".to_vec()));
    }
}
