//! Operations exchanged between sites.

use serde::{Deserialize, Serialize};

use crate::crdt::types::CharId;
use crate::crdt::wchar::WChar;

/// A single edit shipped between sites.
///
/// Inserts carry the full [`WChar`] record; the receiver transfers it into
/// its sequence once both anchors are present. Deletes only need to name
/// their target, so the rest of the record is elided on the wire.
///
/// Operations are self-describing: integrating one requires no preceding
/// handshake, only that its precondition is met. The transport may deliver
/// them in any order, delayed, or more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Place a new character into the sequence.
    Insert { wchar: WChar },
    /// Flip an existing character invisible.
    Delete { id: CharId },
}

impl Operation {
    /// The identifier of the character this operation is about.
    pub fn target(&self) -> CharId {
        match self {
            Operation::Insert { wchar } => wchar.id,
            Operation::Delete { id } => *id,
        }
    }
}
