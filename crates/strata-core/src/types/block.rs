//! The live content-block entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::BlockFields;

/// Lifecycle status of a block. Deletion is a status change, never a
/// row removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockStatus {
    Active,
    Deleted,
}

impl BlockStatus {
    /// Convert to string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Deleted => "DELETED",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// A live, mutable content block with a current version pointer.
///
/// Historical views materialized by `as_of_version` are values of this
/// same type, so callers can use them interchangeably for display; they
/// are distinguished only by `is_current_version()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlBlock {
    /// Stable identifier for the lifetime of the logical block.
    pub id: Uuid,
    /// Display name of the block.
    pub name: String,
    /// HTML content of the block.
    pub content: String,
    /// Lifecycle status.
    pub status: BlockStatus,
    /// Current version pointer. Equals the number of the most recently
    /// created snapshot for this block.
    pub version: u32,
    /// When the block was created.
    pub created_at: DateTime<Utc>,
    /// When the block was last mutated.
    pub updated_at: DateTime<Utc>,
    /// Page this block is connected to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_to_page_id: Option<Uuid>,
    /// Container slot on the connected page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_to_container: Option<String>,
    /// True for the persisted record, false for materialized
    /// historical views.
    #[serde(skip)]
    pub(crate) live: bool,
}

impl HtmlBlock {
    /// Create a new block at version 1.
    pub fn new(fields: BlockFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            content: fields.content,
            status: BlockStatus::Active,
            version: 1,
            created_at: now,
            updated_at: now,
            connect_to_page_id: None,
            connect_to_container: None,
            live: true,
        }
    }

    /// Builder: set the connector attributes.
    pub fn with_connect_to(mut self, page_id: Uuid, container: impl Into<String>) -> Self {
        self.connect_to_page_id = Some(page_id);
        self.connect_to_container = Some(container.into());
        self
    }

    /// The versioned attribute set, for snapshot comparison.
    pub fn fields(&self) -> BlockFields {
        BlockFields::new(self.name.clone(), self.content.clone())
    }

    /// Overwrite the versioned attributes and touch `updated_at`.
    pub fn apply_fields(&mut self, fields: BlockFields) {
        self.name = fields.name;
        self.content = fields.content;
        self.updated_at = Utc::now();
    }

    /// Render the block. Html blocks render as their raw content.
    pub fn render(&self) -> &str {
        &self.content
    }

    /// Whether this block has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.status == BlockStatus::Deleted
    }

    /// True only for the live record. Every view returned by
    /// `as_of_version` reports false, even when it reconstructs the
    /// latest version.
    pub fn is_current_version(&self) -> bool {
        self.live
    }
}
