//! Page-to-block association types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to connect a block to a container slot on a page, passed
/// alongside create or update. Plain attribute state: it never
/// participates in versioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectTo {
    /// Page to connect the block to.
    pub page_id: Uuid,
    /// Container slot on that page.
    pub container: String,
}

impl ConnectTo {
    /// Create a new connection request.
    pub fn new(page_id: Uuid, container: impl Into<String>) -> Self {
        Self {
            page_id,
            container: container.into(),
        }
    }
}

/// A persisted join row between a page container and a block, visible
/// as a reverse lookup from the page side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    /// Unique connector identifier.
    pub connector_id: Uuid,
    /// Page side of the association.
    pub page_id: Uuid,
    /// Block side of the association.
    pub block_id: Uuid,
    /// Container slot on the page.
    pub container: String,
    /// When the association was created.
    pub created_at: DateTime<Utc>,
}

impl Connector {
    /// Create a new connector row.
    pub fn new(page_id: Uuid, block_id: Uuid, container: impl Into<String>) -> Self {
        Self {
            connector_id: Uuid::new_v4(),
            page_id,
            block_id,
            container: container.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_links_page_and_block() {
        let page_id = Uuid::new_v4();
        let block_id = Uuid::new_v4();
        let connector = Connector::new(page_id, block_id, "sidebar");

        assert_eq!(connector.page_id, page_id);
        assert_eq!(connector.block_id, block_id);
        assert_eq!(connector.container, "sidebar");
    }
}
