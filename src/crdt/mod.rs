//! WOOT (WithOut Operational Transformation) engine module.
//!
//! This module contains the replicated string implementation and all its
//! supporting types and structures.

pub mod engine;
pub mod error;
pub mod op;
pub mod sequence;
pub mod types;
pub mod wchar;

pub use engine::WootString;
pub use error::WootError;
pub use op::Operation;
pub use sequence::Sequence;
pub use types::{CharId, SiteClock, SiteId};
pub use wchar::{BEGIN_ID, END_ID, WChar};
