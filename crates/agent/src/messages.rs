//! Message envelopes exchanged with the host page and peer subsystems.
//!
//! The wire shape is a `{type, payload}` envelope. Only `host_idle` carries
//! behavior in this core; the remaining kinds are the relay shapes used by
//! the peer-coordination and task-offload subsystems, which this agent
//! acknowledges but does not interpret.

use serde::{Deserialize, Serialize};

/// A host or peer message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Envelope {
    /// The host reports an idle period; triggers precaching of the app
    /// route list.
    HostIdle,

    /// Full-state handoff to a newly connected peer.
    StateTransfer(serde_json::Value),

    /// Broadcast that an item was appended to shared state.
    ItemAdded(serde_json::Value),

    /// Request to append an item to shared state.
    AddItem(serde_json::Value),
}

impl Envelope {
    /// Wire name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::HostIdle => "host_idle",
            Envelope::StateTransfer(_) => "state_transfer",
            Envelope::ItemAdded(_) => "item_added",
            Envelope::AddItem(_) => "add_item",
        }
    }
}
