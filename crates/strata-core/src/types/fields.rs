//! The versioned attribute set of a content block.

use serde::{Deserialize, Serialize};

use crate::error::{StrataError, StrataResult};

/// The mutable domain attributes captured by each version snapshot.
///
/// Compared by value to decide whether an update warrants a new
/// version; every field participates in the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFields {
    /// Display name of the block.
    pub name: String,
    /// HTML content of the block.
    pub content: String,
}

impl BlockFields {
    /// Create a new field set.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Check domain constraints.
    pub fn validate(&self) -> StrataResult<()> {
        if self.name.trim().is_empty() {
            return Err(StrataError::validation_with_suggestion(
                "Block name must not be blank",
                "Give the block a non-empty name",
            ));
        }
        Ok(())
    }
}
