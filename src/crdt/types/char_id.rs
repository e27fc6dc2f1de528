//! Character identifier for the replicated string.
//!
//! This module contains the CharId struct which serves as the globally unique
//! identifier for each character, providing both identity and the total order
//! used to break ties between concurrent inserts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crdt::types::site::SiteId;

/// A globally unique identifier for a character in the replicated string.
///
/// The identifier is the pair of the minting site and that site's logical
/// clock value at generation time. Uniqueness follows from per-site clock
/// monotonicity; no two characters ever share an identifier.
///
/// # Ordering
///
/// Identifiers are ordered lexicographically: first by site, then by clock.
/// This total order is the tie-breaker that makes insert integration
/// deterministic across sites. Equality and hashing are structural, so the
/// identifier can key any associative container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharId {
    /// The site that minted this identifier
    pub site: SiteId,
    /// The minting site's clock value at generation time
    pub clock: u64,
}

impl CharId {
    /// Creates a new identifier from a site and clock value.
    pub const fn new(site: SiteId, clock: u64) -> Self {
        CharId { site, clock }
    }
}

impl fmt::Display for CharId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.site, self.clock)
    }
}
