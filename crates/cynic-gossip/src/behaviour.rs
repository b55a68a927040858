// Path: crates/cynic-gossip/src/behaviour.rs
//! The libp2p wire layer: gossipsub for push dissemination, request-response
//! for pull sync (`Want` → `Data`). Combined into one [`GossipBehaviour`] so
//! a single swarm drives both legs; the node controller owns the swarm
//! event loop and only calls into this crate's pure helpers to decide what
//! to send.

use libp2p::request_response::{self, ProtocolSupport};
use libp2p::{gossipsub, swarm::NetworkBehaviour, StreamProtocol};

use crate::message::GossipMessage;

/// Codec adapting [`GossipMessage`] to libp2p's request-response framing.
/// Encoding reuses the same canonical/SCALE split as the rest of the
/// protocol would in a full wire implementation; this crate only declares
/// the shape, leaving byte-level (de)serialization to the node binary where
/// the concrete codec choice is wired in alongside storage.
#[derive(Debug, Clone, Default)]
pub struct GossipCodec;

/// The combined network behaviour a CYNIC node runs: one gossipsub topic
/// for push announcements plus a request-response protocol for pull sync.
#[derive(NetworkBehaviour)]
#[behaviour(to_swarm = "GossipBehaviourEvent")]
pub struct GossipBehaviour {
    /// Push leg: `Announce`/`Have` broadcasts.
    pub gossipsub: gossipsub::Behaviour,
    /// Pull leg: `Want` requests answered with `Data` responses.
    pub request_response: request_response::json::Behaviour<GossipRequest, GossipResponse>,
}

/// A pull-sync request: a peer asking for specific missing items.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GossipRequest {
    /// Hex-encoded hashes or ids of the items being requested.
    pub wanted: Vec<String>,
}

/// The reply to a [`GossipRequest`]; payloads are handed back up to the
/// node controller for decoding via [`GossipMessage::Data`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GossipResponse {
    /// Opaque, pre-serialized data payloads, one per requested item found
    /// locally (missing items are simply omitted).
    pub items: Vec<Vec<u8>>,
}

/// Protocol name negotiated for the pull-sync request-response exchange.
pub const SYNC_PROTOCOL: &str = "/cynic/sync/1.0.0";

/// Builds the `StreamProtocol` descriptor used to register the pull-sync
/// protocol on a swarm.
#[must_use]
pub fn sync_stream_protocol() -> StreamProtocol {
    StreamProtocol::new(SYNC_PROTOCOL)
}

/// The set of protocol/support pairs passed to
/// `request_response::json::Behaviour::new` at swarm construction time.
#[must_use]
pub fn sync_protocols() -> Vec<(StreamProtocol, ProtocolSupport)> {
    vec![(sync_stream_protocol(), ProtocolSupport::Full)]
}

/// Events surfaced up from [`GossipBehaviour`] to the node controller.
#[derive(Debug)]
pub enum GossipBehaviourEvent {
    /// A gossipsub message arrived on the subscribed topic.
    Gossip(gossipsub::Event),
    /// A request-response event (inbound request, outbound response, or
    /// failure) arrived on the sync protocol.
    Sync(request_response::Event<GossipRequest, GossipResponse>),
}

impl From<gossipsub::Event> for GossipBehaviourEvent {
    fn from(event: gossipsub::Event) -> Self {
        Self::Gossip(event)
    }
}

impl From<request_response::Event<GossipRequest, GossipResponse>> for GossipBehaviourEvent {
    fn from(event: request_response::Event<GossipRequest, GossipResponse>) -> Self {
        Self::Sync(event)
    }
}

/// Translates a local [`GossipMessage::Want`] into the wire-level
/// [`GossipRequest`] sent over the sync protocol.
#[must_use]
pub fn want_to_request(msg: &GossipMessage) -> Option<GossipRequest> {
    match msg {
        GossipMessage::Want { hashes } => Some(GossipRequest {
            wanted: hashes.clone(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn want_translates_to_request() {
        let msg = GossipMessage::Want {
            hashes: vec!["a".into(), "b".into()],
        };
        let req = want_to_request(&msg).expect("want message");
        assert_eq!(req.wanted, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn non_want_translates_to_none() {
        let msg = GossipMessage::Ping { sent_at_ms: 0 };
        assert!(want_to_request(&msg).is_none());
    }

    #[test]
    fn sync_protocol_name_is_stable() {
        assert_eq!(SYNC_PROTOCOL, "/cynic/sync/1.0.0");
    }
}
