//! Immutable version snapshots of block state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{BlockFields, BlockStatus, HtmlBlock};

/// A snapshot of a block's versioned fields at a point in time.
///
/// Snapshots are never mutated or deleted once persisted. Status is
/// captured like any other field, so a soft delete is just one more
/// version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockVersion {
    /// Unique version identifier.
    pub version_id: Uuid,
    /// Block this version belongs to.
    pub block_id: Uuid,
    /// Sequential version number within this block (1, 2, 3...).
    pub version_number: u32,
    /// Name at this version.
    pub name: String,
    /// Content at this version.
    pub content: String,
    /// Status at this version.
    pub status: BlockStatus,
    /// When this version was created. A revert never rewrites this on
    /// existing snapshots; the new snapshot gets its own timestamp.
    pub created_at: DateTime<Utc>,
    /// Actor who made the change (if applicable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl BlockVersion {
    /// Capture the block's current state under its current version
    /// number.
    pub fn capture(block: &HtmlBlock) -> Self {
        Self {
            version_id: Uuid::new_v4(),
            block_id: block.id,
            version_number: block.version,
            name: block.name.clone(),
            content: block.content.clone(),
            status: block.status,
            created_at: Utc::now(),
            created_by: None,
        }
    }

    /// Builder: set the actor attribution.
    pub fn created_by(mut self, actor: impl Into<String>) -> Self {
        self.created_by = Some(actor.into());
        self
    }

    /// The versioned attribute set stored in this snapshot.
    pub fn fields(&self) -> BlockFields {
        BlockFields::new(self.name.clone(), self.content.clone())
    }

    /// Materialize this snapshot as a block-shaped view.
    ///
    /// The result carries the live block's identity but this snapshot's
    /// field values and version number. It is a plain owned value, so
    /// callers can still traverse associations through it, and it never
    /// reports itself as the current version.
    pub fn materialize(&self, block: &HtmlBlock) -> HtmlBlock {
        HtmlBlock {
            id: block.id,
            name: self.name.clone(),
            content: self.content.clone(),
            status: self.status,
            version: self.version_number,
            created_at: block.created_at,
            updated_at: self.created_at,
            connect_to_page_id: block.connect_to_page_id,
            connect_to_container: block.connect_to_container.clone(),
            live: false,
        }
    }
}

/// Summary of version history for a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSummary {
    pub block_id: Uuid,
    pub total_versions: u32,
    pub latest_version: u32,
    pub first_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}
