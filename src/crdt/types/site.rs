//! Site identifier type.
//!
//! Each participant (replica) in the collaborative editing system carries a
//! unique site identifier, assigned externally.

/// A unique identifier for each site (collaborator) in the distributed system.
///
/// Site `0` is reserved for the begin/end sentinels; replicas must use
/// non-zero identifiers. Identity assignment is the host's responsibility.
pub type SiteId = u64;
