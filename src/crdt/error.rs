//! Error types for the WOOT engine.
//!
//! All failure modes here indicate either caller misuse (bad position, bad
//! range) or a broken invariant (missing anchor); the host must surface
//! them. Duplicate deliveries, re-deletes, and no-progress drain passes are
//! not errors and are absorbed silently.

use thiserror::Error;

use crate::crdt::types::CharId;

/// Errors surfaced by the replicated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WootError {
    /// A sub-range was requested whose end does not occur after its start.
    /// Always a programming error in the caller; integration never asks for
    /// an invalid range by construction.
    #[error("invalid range: {to} does not occur after {from}")]
    BadRange { from: CharId, to: CharId },

    /// A local edit named a visible position outside the valid range.
    /// No identifier is minted and the clock does not advance.
    #[error("visible position {pos} out of range (limit {limit})")]
    PositionOutOfRange { pos: usize, limit: usize },

    /// An identifier that must be present in the sequence was not found.
    /// Executability is checked before execution, so this indicates a broken
    /// invariant rather than an expected runtime condition.
    #[error("required character {0} is not present in the sequence")]
    AnchorMissing(CharId),
}
