// Path: crates/cynic-node/src/controller.rs
use std::collections::BTreeMap;

use tracing::{info, warn};

use cynic_chain::{seal_judgment_block, seal_knowledge_block, ChainLog, PendingBatch};
use cynic_consensus::{
    ConsensusRound, EquivocationTracker, FinalityTracker, GovernanceRound, SoftConsensusTracker,
};
use cynic_crypto::sign::{Ed25519KeyPair, SerializableKey, SigningKeyPair};
use cynic_gossip::PeerSet;
use cynic_judgment::{judge, EvalContext, EvaluatorRegistry};
use cynic_knowledge::KnowledgeStore;
use cynic_types::app::{
    Block, Choice, Dimension, GovernanceAction, GovernanceProposal, Item, Judgment, OperatorState,
    ProposalStatus,
};
use cynic_types::config::CynicConfig;
use cynic_types::error::DimensionError;

/// The node's high-level lifecycle state. The node controller transitions
/// through these states at slot boundaries; several sub-states
/// (`Judging`/`Sealing`/`Voting`/`Syncing`) may be active concurrently in a
/// full async scheduler, but a single controller reports the dominant one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Constructed but not yet started.
    Dormant,
    /// Loading state from disk and connecting to peers.
    Booting,
    /// Idle, awaiting the next scheduled task.
    Ready,
    /// Actively evaluating a submitted item.
    Judging,
    /// Actively sealing a pending batch into a block.
    Sealing,
    /// Actively participating in a consensus round.
    Voting,
    /// Actively pulling blocks to catch up with a peer's head.
    Syncing,
    /// Draining in-flight work before process exit.
    ShuttingDown,
}

/// The node controller: the single owner of all mutable protocol state.
pub struct NodeController {
    /// Current lifecycle state.
    pub state: NodeState,
    /// This node's signing identity.
    pub keypair: Ed25519KeyPair,
    /// Installed configuration (timing, consensus, gossip, chain, genesis).
    pub config: CynicConfig,
    /// This node's own reputation/weight record.
    pub operator: OperatorState,
    /// The currently installed dimension set.
    pub dimensions: Vec<Dimension>,
    /// Evaluators for each installed dimension's `evaluator_ref`.
    pub registry: EvaluatorRegistry,
    /// The sealed block log.
    pub chain: ChainLog,
    /// Judgments and knowledge updates awaiting the next seal.
    pub pending: PendingBatch,
    /// The axiom-sharded knowledge store.
    pub knowledge: KnowledgeStore,
    /// The local gossip peer view.
    pub peers: PeerSet,
    /// Soft-consensus pattern-emergence tracker.
    pub soft_consensus: SoftConsensusTracker,
    /// In-flight hard-consensus rounds, keyed by proposed block hash.
    pub rounds: BTreeMap<[u8; 32], ConsensusRound>,
    /// Finality tracking across committed slots.
    pub finality: FinalityTracker,
    /// Double-vote detection.
    pub equivocation: EquivocationTracker,
    /// Judgments produced locally, cached by id for `get_judgment`.
    judgments: BTreeMap<String, Judgment>,
    /// Governance proposals currently open, by id.
    proposals: BTreeMap<String, (GovernanceProposal, ProposalStatus)>,
    /// Ballot tallies for in-flight governance proposals, by id.
    governance_rounds: BTreeMap<String, GovernanceRound>,
}

impl NodeController {
    /// Builds a freshly booted controller from `config`, seeding the
    /// dimension set from `config.genesis`.
    #[must_use]
    pub fn new(config: CynicConfig, keypair: Ed25519KeyPair) -> Self {
        let operator_pubkey = keypair.public_key().to_hex();
        Self {
            state: NodeState::Dormant,
            dimensions: config.genesis.seed_dimensions.clone(),
            operator: OperatorState::new(operator_pubkey),
            keypair,
            config,
            registry: EvaluatorRegistry::new(),
            chain: ChainLog::new(),
            pending: PendingBatch::default(),
            knowledge: KnowledgeStore::new(),
            peers: PeerSet::new(),
            soft_consensus: SoftConsensusTracker::new(),
            rounds: BTreeMap::new(),
            finality: FinalityTracker::new(),
            equivocation: EquivocationTracker::new(),
            judgments: BTreeMap::new(),
            proposals: BTreeMap::new(),
            governance_rounds: BTreeMap::new(),
        }
    }

    /// Marks the controller ready to serve requests, after any storage
    /// replay and peer discovery the caller has already performed.
    pub fn mark_ready(&mut self) {
        self.state = NodeState::Ready;
        info!(target: "node", operator = %self.operator.pubkey, "node ready");
    }

    /// Evaluates `item` across the installed dimensions, signs the result,
    /// enqueues it for the next sealed block, and caches it for later
    /// lookup by id.
    pub fn submit_item(
        &mut self,
        id: impl Into<String>,
        item: &Item<'_>,
        ctx: &EvalContext,
        timestamp_ms: u64,
    ) -> Result<Judgment, DimensionError> {
        self.state = NodeState::Judging;
        let id = id.into();
        let result = judge(
            id.clone(),
            item,
            ctx,
            &self.dimensions,
            &self.registry,
            &self.keypair,
            timestamp_ms,
        );
        self.state = NodeState::Ready;
        let j = result?;
        self.judgments.insert(id, j.clone());
        self.pending.push_judgment(j.clone());
        cynic_telemetry::judgment_metrics().inc_judgments_total(verdict_label(&j));
        if j.partial {
            cynic_telemetry::judgment_metrics().inc_partial_judgments();
        }
        Ok(j)
    }

    /// Returns a previously produced judgment by id.
    #[must_use]
    pub fn get_judgment(&self, id: &str) -> Option<&Judgment> {
        self.judgments.get(id)
    }

    /// Seals the pending judgment batch into a new block at `slot`, linking
    /// it to the current head (or genesis if this is the first block).
    pub fn seal_next_judgment_block(
        &mut self,
        slot: u64,
        state_root: [u8; 32],
        timestamp_ms: u64,
    ) -> Result<Block, cynic_crypto::error::IntegrityError> {
        self.state = NodeState::Sealing;
        let prev_hash = self
            .chain
            .head(&self.operator.pubkey)
            .unwrap_or(cynic_types::app::GENESIS_PREV_HASH);
        let block = seal_judgment_block(
            &mut self.pending,
            slot,
            prev_hash,
            state_root,
            timestamp_ms,
            self.config.chain.max_judgments_per_block,
            &self.keypair,
        )?;
        self.state = NodeState::Ready;
        cynic_telemetry::chain_metrics().inc_blocks_sealed("judgment");
        Ok(block)
    }

    /// Seals the pending knowledge-update batch into a new block at `slot`.
    pub fn seal_next_knowledge_block(
        &mut self,
        slot: u64,
        state_root: [u8; 32],
        timestamp_ms: u64,
    ) -> Result<Block, cynic_crypto::error::IntegrityError> {
        self.state = NodeState::Sealing;
        let prev_hash = self
            .chain
            .head(&self.operator.pubkey)
            .unwrap_or(cynic_types::app::GENESIS_PREV_HASH);
        let block = seal_knowledge_block(
            &mut self.pending,
            slot,
            prev_hash,
            state_root,
            timestamp_ms,
            self.config.chain.max_knowledge_updates_per_block,
            &self.keypair,
        )?;
        self.state = NodeState::Ready;
        cynic_telemetry::chain_metrics().inc_blocks_sealed("knowledge");
        Ok(block)
    }

    /// Appends a block this node just sealed itself to the chain log. Not
    /// for peer-originated blocks — use [`Self::receive_peer_block`], which
    /// validates before appending.
    pub fn append_block(&mut self, block: Block) -> Result<[u8; 32], cynic_crypto::error::IntegrityError> {
        let hash = self.chain.append(block)?;
        if let Some(slot) = self.chain.head_slot(&self.operator.pubkey) {
            cynic_telemetry::chain_metrics().set_head_slot(slot);
        }
        Ok(hash)
    }

    /// Validates a block received from a peer against that peer's own known
    /// head (looked up by `block.header.operator_pubkey`, not this node's
    /// identity) before appending it to the chain log.
    pub fn receive_peer_block(&mut self, block: Block) -> Result<[u8; 32], cynic_types::error::CynicError> {
        let sender = block.header.operator_pubkey.clone();
        let known_head_slot = self.chain.head_slot(&sender);
        let known_head_hash = self.chain.head(&sender);
        cynic_chain::validate_incoming(
            &block,
            known_head_slot,
            known_head_hash,
            self.config.chain.max_judgments_per_block,
            self.config.chain.max_knowledge_updates_per_block,
        )?;
        let hash = self.chain.append(block)?;
        if let Some(slot) = self.chain.head_slot(&self.operator.pubkey) {
            cynic_telemetry::chain_metrics().set_head_slot(slot);
        }
        Ok(hash)
    }

    /// Returns this node's locally sealed chain head, if any.
    #[must_use]
    pub fn get_head(&self) -> Option<([u8; 32], u64)> {
        self.chain
            .head(&self.operator.pubkey)
            .zip(self.chain.head_slot(&self.operator.pubkey))
    }

    /// Looks up a sealed block by hash.
    #[must_use]
    pub fn get_block(&self, hash: &[u8; 32]) -> Option<&Block> {
        self.chain.get_block(hash)
    }

    /// Verifies a knowledge-store inclusion proof against a claimed root.
    #[must_use]
    pub fn verify_inclusion(
        leaf_bytes: &[u8],
        proof: &cynic_merkle::InclusionProof,
        root: [u8; 32],
    ) -> bool {
        cynic_merkle::verify(root, leaf_bytes, proof)
    }

    /// Opens a new governance proposal, awaiting PREVOTE ballots.
    pub fn propose(&mut self, id: impl Into<String>, action: GovernanceAction, proposer_pubkey: impl Into<String>) {
        let id = id.into();
        let proposal = GovernanceProposal {
            id: id.clone(),
            action,
            proposer_pubkey: proposer_pubkey.into(),
        };
        self.governance_rounds
            .insert(id.clone(), GovernanceRound::new(proposal.clone()));
        self.proposals.insert(id, (proposal, ProposalStatus::Deferred));
    }

    /// Records a ballot on an open proposal, re-tallying against
    /// `total_network_weight`. A no-op if `id` names no open proposal.
    pub fn vote_on_proposal(
        &mut self,
        id: &str,
        voter_pubkey: impl Into<String>,
        choice: Choice,
        weight: f64,
        total_network_weight: f64,
    ) {
        let Some(round) = self.governance_rounds.get_mut(id) else {
            return;
        };
        round.record_vote(voter_pubkey, choice, weight, total_network_weight);
        let status = round.status;
        if let Some(entry) = self.proposals.get_mut(id) {
            entry.1 = status;
        }
    }

    /// Force-resolves a proposal's status, e.g. once COMMIT's confirmation
    /// slot elapses with no contrary majority.
    pub fn resolve_proposal(&mut self, id: &str, status: ProposalStatus) {
        if let Some(entry) = self.proposals.get_mut(id) {
            entry.1 = status;
        }
    }

    /// Returns a proposal and its current status, if known.
    #[must_use]
    pub fn get_proposal(&self, id: &str) -> Option<&(GovernanceProposal, ProposalStatus)> {
        self.proposals.get(id)
    }

    /// Summarizes the local peer set for an external status query.
    #[must_use]
    pub fn peer_status(&self) -> Vec<(String, i64)> {
        self.peers
            .peers()
            .into_iter()
            .map(|p| (p.pubkey.clone(), p.status.score))
            .collect()
    }

    /// Summarizes this node's chain status for an external status query.
    #[must_use]
    pub fn chain_status(&self) -> (Option<[u8; 32]>, Option<u64>) {
        (
            self.chain.head(&self.operator.pubkey),
            self.chain.head_slot(&self.operator.pubkey),
        )
    }

    /// Runs the knowledge store's epoch-boundary maintenance pass, archiving
    /// any pattern that has sat below the archival floor for a full epoch.
    /// Call once per epoch boundary with the current slot.
    pub fn run_epoch_maintenance(&mut self, current_slot: u64) -> Vec<String> {
        let ratios = cynic_constants::ratios();
        let epoch_len_slots = (ratios.epoch_ms as f64 / ratios.block_ms as f64).round() as u64;
        self.knowledge.run_epoch_maintenance(current_slot, epoch_len_slots.max(1))
    }

    /// Transitions into shutdown; callers should stop feeding new work and
    /// wait for any in-flight seal/vote to finish before dropping.
    pub fn begin_shutdown(&mut self) {
        self.state = NodeState::ShuttingDown;
        warn!(target: "node", "node entering shutdown");
    }
}

fn verdict_label(j: &Judgment) -> &'static str {
    use cynic_types::app::Verdict;
    match j.verdict {
        Verdict::Howl => "howl",
        Verdict::Wag => "wag",
        Verdict::Growl => "growl",
        Verdict::Bark => "bark",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cynic_types::config::CynicConfig;

    struct ConstEvaluator(f64);
    impl cynic_judgment::Evaluator for ConstEvaluator {
        fn evaluate(&self, _item: &Item<'_>, _ctx: &EvalContext) -> Result<f64, String> {
            Ok(self.0)
        }
    }

    fn controller() -> NodeController {
        let config = CynicConfig::default();
        let kp = Ed25519KeyPair::generate().expect("keygen");
        NodeController::new(config, kp)
    }

    #[test]
    fn submit_item_enqueues_and_caches_judgment() {
        let mut node = controller();
        for dim in node.dimensions.clone() {
            node.registry.register(dim.evaluator_ref.clone(), Box::new(ConstEvaluator(90.0)));
        }
        let item = Item::new(b"hello");
        let j = node
            .submit_item("j1", &item, &EvalContext::default(), 0)
            .expect("submit_item");
        assert_eq!(node.get_judgment("j1"), Some(&j));
        assert!(!node.pending.is_empty());
    }

    #[test]
    fn sealing_first_block_links_to_genesis() {
        let mut node = controller();
        for dim in node.dimensions.clone() {
            node.registry.register(dim.evaluator_ref.clone(), Box::new(ConstEvaluator(90.0)));
        }
        let item = Item::new(b"hello");
        node.submit_item("j1", &item, &EvalContext::default(), 0).expect("submit");
        let block = node.seal_next_judgment_block(0, [0u8; 32], 1000).expect("seal");
        assert_eq!(block.header.prev_hash, cynic_types::app::GENESIS_PREV_HASH);
        node.append_block(block).expect("append");
        assert_eq!(node.get_head().map(|(_, slot)| slot), Some(0));
    }

    #[test]
    fn receive_peer_block_appends_a_well_formed_block() {
        let mut node = controller();
        let peer_kp = Ed25519KeyPair::generate().expect("keygen");
        let mut batch = PendingBatch::default();
        let block = cynic_chain::seal_judgment_block(
            &mut batch,
            0,
            cynic_types::app::GENESIS_PREV_HASH,
            [0u8; 32],
            1000,
            node.config.chain.max_judgments_per_block,
            &peer_kp,
        )
        .expect("seal");
        node.receive_peer_block(block).expect("peer block validates and appends");
        assert_eq!(node.chain.head_slot(&peer_kp.public_key().to_hex()), Some(0));
    }

    #[test]
    fn receive_peer_block_rejects_a_forged_signature() {
        let mut node = controller();
        let peer_kp = Ed25519KeyPair::generate().expect("keygen");
        let mut batch = PendingBatch::default();
        let mut block = cynic_chain::seal_judgment_block(
            &mut batch,
            0,
            cynic_types::app::GENESIS_PREV_HASH,
            [0u8; 32],
            1000,
            node.config.chain.max_judgments_per_block,
            &peer_kp,
        )
        .expect("seal");
        let attacker = Ed25519KeyPair::generate().expect("keygen");
        block.operator_sig = attacker.sign(b"forged").expect("sign").to_hex();
        assert!(node.receive_peer_block(block).is_err());
        assert_eq!(node.chain.head_slot(&peer_kp.public_key().to_hex()), None);
    }

    #[test]
    fn run_epoch_maintenance_archives_a_decayed_pattern() {
        use cynic_types::app::Axiom;

        let mut node = controller();
        let weak = cynic_types::app::Pattern {
            id: "weak-pattern".into(),
            content_hash: [7; 32],
            axiom: Axiom::Culture,
            strength: cynic_constants::PATTERN_STRENGTH_FLOOR - 0.01,
            sources: 3,
            first_seen_slot: 0,
            merkle_path: None,
            below_floor_since_slot: None,
        };
        node.knowledge.put_pattern(weak);
        assert!(node.run_epoch_maintenance(0).is_empty());

        let epoch_len = (cynic_constants::ratios().epoch_ms as f64
            / cynic_constants::ratios().block_ms as f64)
            .round() as u64;
        let archived = node.run_epoch_maintenance(epoch_len.max(1));
        assert_eq!(archived, vec!["weak-pattern".to_string()]);
        assert!(node.knowledge.is_archived(Axiom::Culture, "weak-pattern"));
    }

    #[test]
    fn governance_proposal_round_trips() {
        let mut node = controller();
        node.propose(
            "prop1",
            GovernanceAction::ChangeTimingBase { new_timing_base_ms: 200 },
            "proposer",
        );
        node.resolve_proposal("prop1", ProposalStatus::Passed);
        let (_, status) = node.get_proposal("prop1").expect("proposal present");
        assert_eq!(*status, ProposalStatus::Passed);
    }

    #[test]
    fn five_weighted_operators_pass_add_dimension_on_three_agrees() {
        let mut node = controller();
        node.propose(
            "prop-falsifiability",
            GovernanceAction::AddDimension {
                dimension_bytes: vec![0xAB; 8],
            },
            "op0",
        );
        let total_weight = 1050.0;
        node.vote_on_proposal("prop-falsifiability", "op0", Choice::Agree, 300.0, total_weight);
        node.vote_on_proposal("prop-falsifiability", "op1", Choice::Agree, 300.0, total_weight);
        node.vote_on_proposal("prop-falsifiability", "op2", Choice::Agree, 200.0, total_weight);
        node.vote_on_proposal("prop-falsifiability", "op3", Choice::Disagree, 150.0, total_weight);
        node.vote_on_proposal("prop-falsifiability", "op4", Choice::Abstain, 100.0, total_weight);
        let (_, status) = node.get_proposal("prop-falsifiability").expect("proposal present");
        assert_eq!(*status, ProposalStatus::Passed);
    }
}
