//! strata-core - Core library for strata.
//!
//! This crate provides the versioned content-block model used by
//! strata-backed CMS deployments: blocks with full version history,
//! soft delete, revert, point-in-time retrieval, and page connectors.
//!
//! # Example
//!
//! ```ignore
//! use strata_core::{BlockFields, BlockStoreConfig, Blocks};
//!
//! let blocks = Blocks::new(&BlockStoreConfig::default())?;
//!
//! // Create a block, then change it
//! let block = blocks.create(BlockFields::new("Welcome", "<h1>Hi</h1>"), None, None)?;
//! blocks.update(block.id, BlockFields::new("Welcome", "<h1>Hello</h1>"), None, None)?;
//!
//! // Look at what it used to say, then put it back
//! let old = blocks.as_of_version(block.id, 1)?;
//! blocks.revert_to(block.id, Some(1), "editor@example.com")?;
//! ```

pub mod blocks;
pub mod config;
pub mod error;
pub mod types;
pub mod versioning;

// Re-export commonly used types
pub use blocks::{BlockStore, Blocks, SqliteBlockStore};
pub use config::BlockStoreConfig;
pub use error::{ErrorCode, StrataError, StrataResult};
pub use types::{BlockFields, BlockStatus, ConnectTo, Connector, HtmlBlock};
pub use versioning::{BlockVersion, VersionSummary};
