//! # WOOT CRDT - collaborative text editing without operational transformation
//!
//! A Conflict-free Replicated Data Type (CRDT) implementation of the WOOT
//! algorithm (Oster et al. 2005) for collaborative text editing, where
//! concurrent modifications from independent sites merge consistently
//! without coordination.
//!
//! ## Features
//!
//! - **Conflict-free**: operations can be delivered in any order and all
//!   sites converge to the same visible text
//! - **Intention-preserving**: a character inserted between two visible
//!   characters stays between them
//! - **Tombstone-based deletion**: deleted characters stay in the sequence
//!   so concurrent inserts anchored on them still integrate
//! - **Pending pool**: operations whose causal prerequisites have not yet
//!   arrived wait and are drained once executable
//!
//! ## Example
//!
//! ```rust
//! use crdt_woot::WootString;
//!
//! let mut alice = WootString::new(1);
//! let mut bob = WootString::new(2);
//!
//! let op = alice.generate_insert(0, 'a').unwrap();
//! bob.receive(op);
//! bob.drain().unwrap();
//!
//! assert_eq!(alice.value(), bob.value());
//! ```

pub mod crdt;
pub mod server;

// Re-export the main public API from the CRDT module
pub use crdt::{BEGIN_ID, CharId, END_ID, Operation, Sequence, SiteClock, SiteId, WChar};
pub use crdt::{WootError, WootString};
