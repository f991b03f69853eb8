use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Client -> Server messages ──

/// Messages a subscriber sends over the WebSocket. Channels are either gig
/// ids (events about that gig) or the caller's own user id (joined
/// automatically at connect).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to a channel.
    Join { channel: Uuid },
    /// Unsubscribe from a channel.
    Leave { channel: Uuid },
}

// ── Server -> Client events ──

/// Events the server pushes to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new bid was placed on a gig.
    BidPlaced {
        gig_id: Uuid,
        bid_id: Uuid,
        message: String,
    },
    /// A bid was hired and the gig assigned.
    BidHired {
        gig_id: Uuid,
        bid_id: Uuid,
        message: String,
    },
    /// An error occurred on this connection.
    Error { message: String },
}
