//! Block versioning for audit history and point-in-time retrieval.
//!
//! Every accepted mutation of a block appends a new immutable version
//! snapshot, enabling revert to any past version and queries like
//! "what did this block contain last week?"

mod version;

pub use version::{BlockVersion, VersionSummary};
