//! WChar definition and sentinel constants for the WOOT engine.
//!
//! This module contains the WChar struct which represents individual
//! characters in the replicated string, along with the begin/end sentinel
//! identifiers that bracket every sequence.

use serde::{Deserialize, Serialize};

use crate::crdt::types::CharId;

/// Identifier of the begin sentinel. Identical on every site.
pub const BEGIN_ID: CharId = CharId::new(0, 0);

/// Identifier of the end sentinel. Identical on every site.
pub const END_ID: CharId = CharId::new(0, 1);

/// A single character of the replicated string.
///
/// Each WChar carries:
/// - a globally unique identifier that never changes,
/// - the character payload (sentinels carry none),
/// - a visibility flag that acts as a tombstone once flipped,
/// - the identifiers of its visible neighbours *at generation time*.
///
/// # Causal anchors
///
/// `prev_id` and `next_id` record the original context of the insertion and
/// never change afterwards; the current neighbours in the sequence may differ
/// arbitrarily once concurrent inserts have been integrated. Anchors are
/// identifier values resolved by lookup, never live references.
///
/// # Tombstones
///
/// Deletion never removes a WChar. It flips `visible` to false, and the
/// record stays in the sequence so that any future insert anchored on it can
/// still be placed. Visibility only ever transitions true → false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WChar {
    /// Unique identifier, immutable after creation
    pub id: CharId,
    /// The character payload; `None` only for sentinels
    pub value: Option<char>,
    /// Whether this character is part of the visible string
    pub visible: bool,
    /// Identifier of the visible predecessor at generation time
    pub prev_id: Option<CharId>,
    /// Identifier of the visible successor at generation time
    pub next_id: Option<CharId>,
}

impl WChar {
    /// Creates a new visible user character anchored between two existing
    /// characters.
    pub fn new(id: CharId, value: char, prev_id: CharId, next_id: CharId) -> Self {
        WChar {
            id,
            value: Some(value),
            visible: true,
            prev_id: Some(prev_id),
            next_id: Some(next_id),
        }
    }

    /// The begin sentinel. Permanently occupies index 0 of every sequence.
    pub fn begin() -> Self {
        WChar {
            id: BEGIN_ID,
            value: None,
            visible: true,
            prev_id: None,
            next_id: None,
        }
    }

    /// The end sentinel. Permanently occupies the last index of every
    /// sequence.
    pub fn end() -> Self {
        WChar {
            id: END_ID,
            value: None,
            visible: true,
            prev_id: Some(BEGIN_ID),
            next_id: None,
        }
    }

    /// Returns true if this is the begin or end sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.id == BEGIN_ID || self.id == END_ID
    }

    /// Returns true if this character contributes to the visible string,
    /// i.e. it is visible and not a sentinel.
    pub fn is_visible_value(&self) -> bool {
        self.visible && !self.is_sentinel()
    }

    /// Both causal anchors, or `None` for sentinels.
    pub fn anchors(&self) -> Option<(CharId, CharId)> {
        match (self.prev_id, self.next_id) {
            (Some(prev), Some(next)) => Some((prev, next)),
            _ => None,
        }
    }

    /// Flips this character invisible, turning it into a tombstone.
    /// Sentinels refuse. Returns whether the flag changed.
    pub fn hide(&mut self) -> bool {
        if self.is_sentinel() || !self.visible {
            return false;
        }
        self.visible = false;
        true
    }
}
