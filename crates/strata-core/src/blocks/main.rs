//! Core block lifecycle implementation.
//!
//! `Blocks` owns the versioning policy: which mutations append a
//! snapshot, how revert replays past values forward, and how historical
//! views are materialized. All mutations route through the store's
//! per-block atomic "append snapshot, bump pointer" transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::blocks::store::{BlockStore, SqliteBlockStore};
use crate::config::BlockStoreConfig;
use crate::error::{StrataError, StrataResult};
use crate::types::{BlockFields, BlockStatus, ConnectTo, Connector, HtmlBlock};
use crate::versioning::{BlockVersion, VersionSummary};

/// Main entry point for working with versioned content blocks.
pub struct Blocks {
    store: Arc<dyn BlockStore>,
}

impl Blocks {
    /// Create a new instance backed by the configured SQLite store.
    pub fn new(config: &BlockStoreConfig) -> StrataResult<Self> {
        debug!(path = %config.blocks_db_path.display(), "Opening block store");
        let store = SqliteBlockStore::new(&config.blocks_db_path)?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Create an instance backed by an in-memory store (for testing).
    pub fn in_memory() -> StrataResult<Self> {
        Ok(Self {
            store: Arc::new(SqliteBlockStore::in_memory()?),
        })
    }

    /// Create an instance over an existing store implementation.
    pub fn with_store(store: Arc<dyn BlockStore>) -> Self {
        Self { store }
    }

    /// Create a new block. Persists the record together with snapshot
    /// #1; when `connect` is given, also connects the block to the
    /// page's container slot.
    pub fn create(
        &self,
        fields: BlockFields,
        connect: Option<ConnectTo>,
        actor: Option<&str>,
    ) -> StrataResult<HtmlBlock> {
        fields.validate()?;

        let mut block = HtmlBlock::new(fields);
        if let Some(ref c) = connect {
            block = block.with_connect_to(c.page_id, c.container.clone());
        }

        let mut v1 = BlockVersion::capture(&block);
        if let Some(actor) = actor {
            v1 = v1.created_by(actor);
        }
        self.store.insert_block(&block, &v1)?;

        if let Some(c) = connect {
            self.store
                .insert_connector(&Connector::new(c.page_id, block.id, c.container))?;
        }

        info!(block_id = %block.id, "Created block at version 1");
        Ok(block)
    }

    /// Get the live block by id.
    pub fn get(&self, block_id: Uuid) -> StrataResult<HtmlBlock> {
        self.store
            .get_block(block_id)?
            .ok_or_else(|| StrataError::not_found(block_id.to_string()))
    }

    /// Render a block: html blocks render as their raw content.
    pub fn render(&self, block_id: Uuid) -> StrataResult<String> {
        Ok(self.get(block_id)?.content)
    }

    /// Update a block's versioned fields.
    ///
    /// When every proposed field equals the current snapshot's value,
    /// the update is a no-op: no snapshot is created and the version
    /// pointer stays put. Connector attributes are plain state and are
    /// applied either way.
    pub fn update(
        &self,
        block_id: Uuid,
        fields: BlockFields,
        connect: Option<ConnectTo>,
        actor: Option<&str>,
    ) -> StrataResult<HtmlBlock> {
        fields.validate()?;
        let mut block = self.get(block_id)?;

        if let Some(c) = connect {
            self.store
                .set_connect_attrs(block_id, c.page_id, &c.container)?;
            self.store
                .insert_connector(&Connector::new(c.page_id, block_id, c.container.clone()))?;
            block = block.with_connect_to(c.page_id, c.container);
        }

        let current = self.current_snapshot(block_id)?;
        if fields == current.fields() {
            debug!(block_id = %block_id, version = block.version, "Update matched current values, skipping version");
            return Ok(block);
        }

        block.apply_fields(fields);
        block.version += 1;
        self.append_version(&block, actor)?;

        info!(block_id = %block_id, version = block.version, "Updated block");
        Ok(block)
    }

    /// Soft-delete a block. Always appends a snapshot with status
    /// DELETED; the row itself is never removed, so existence queries
    /// keep finding it while active listings no longer do.
    pub fn mark_deleted(&self, block_id: Uuid, actor: &str) -> StrataResult<HtmlBlock> {
        let mut block = self.get(block_id)?;

        block.status = BlockStatus::Deleted;
        block.version += 1;
        block.updated_at = Utc::now();
        self.append_version(&block, Some(actor))?;

        info!(block_id = %block_id, version = block.version, "Soft-deleted block");
        Ok(block)
    }

    /// Revert a block to a past version.
    ///
    /// Copies the target snapshot's field values forward and runs the
    /// same logic as update, so a successful revert appends a brand-new
    /// snapshot under the next sequential number rather than rewinding
    /// the counter. Only field values travel; the new snapshot gets its
    /// own creation timestamp.
    pub fn revert_to(
        &self,
        block_id: Uuid,
        target_version: Option<u32>,
        actor: &str,
    ) -> StrataResult<HtmlBlock> {
        let mut block = self.get(block_id)?;

        let target_version = target_version.ok_or(StrataError::MissingVersion)?;
        let target = self
            .store
            .find_version(block_id, target_version)?
            .ok_or_else(|| StrataError::version_not_found(target_version))?;

        let current = self.current_snapshot(block_id)?;
        if target.fields() == current.fields() && target.status == current.status {
            debug!(block_id = %block_id, target_version, "Revert target matches current values, skipping version");
            return Ok(block);
        }

        block.apply_fields(target.fields());
        block.status = target.status;
        block.version += 1;
        self.append_version(&block, Some(actor))?;

        info!(
            block_id = %block_id,
            target_version,
            version = block.version,
            "Reverted block"
        );
        Ok(block)
    }

    /// Materialize the block as it stood at the given version.
    ///
    /// Returns a block-shaped view: same id as the live record, field
    /// values from the snapshot, `version` set to the requested number,
    /// and `is_current_version()` false.
    pub fn as_of_version(&self, block_id: Uuid, version_number: u32) -> StrataResult<HtmlBlock> {
        match self.store.block_with_version(block_id, version_number)? {
            None => Err(StrataError::not_found(block_id.to_string())),
            Some((_, None)) => Err(StrataError::version_not_found(version_number)),
            Some((block, Some(version))) => Ok(version.materialize(&block)),
        }
    }

    /// Materialize the block as it stood at the given time, if it had
    /// any version by then.
    pub fn as_of_time(
        &self,
        block_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> StrataResult<Option<HtmlBlock>> {
        match self.store.block_with_version_at(block_id, timestamp)? {
            None => Err(StrataError::not_found(block_id.to_string())),
            Some((_, None)) => Ok(None),
            Some((block, Some(version))) => Ok(Some(version.materialize(&block))),
        }
    }

    /// Get a specific version snapshot, if it exists.
    pub fn find_version(
        &self,
        block_id: Uuid,
        version_number: u32,
    ) -> StrataResult<Option<BlockVersion>> {
        self.store.find_version(block_id, version_number)
    }

    /// Get all version snapshots of a block, oldest first.
    pub fn versions(&self, block_id: Uuid) -> StrataResult<Vec<BlockVersion>> {
        self.store.versions_for(block_id)
    }

    /// Get the version history summary for a block.
    pub fn version_summary(&self, block_id: Uuid) -> StrataResult<Option<VersionSummary>> {
        self.store.version_summary(block_id)
    }

    /// Reverse lookup: all connectors pointing at a page.
    pub fn connectors_for_page(&self, page_id: Uuid) -> StrataResult<Vec<Connector>> {
        self.store.connectors_for_page(page_id)
    }

    /// Count blocks that have not been soft-deleted.
    pub fn count_active(&self) -> StrataResult<usize> {
        self.store.count_active()
    }

    /// Count all blocks, soft-deleted included.
    pub fn count_all(&self) -> StrataResult<usize> {
        self.store.count_all()
    }

    /// List blocks that have not been soft-deleted.
    pub fn list_active(&self) -> StrataResult<Vec<HtmlBlock>> {
        self.store.list_active()
    }

    fn current_snapshot(&self, block_id: Uuid) -> StrataResult<BlockVersion> {
        self.store.latest_version(block_id)?.ok_or_else(|| {
            StrataError::Internal(format!("block {} has no version history", block_id))
        })
    }

    fn append_version(&self, block: &HtmlBlock, actor: Option<&str>) -> StrataResult<()> {
        let mut version = BlockVersion::capture(block);
        if let Some(actor) = actor {
            version = version.created_by(actor);
        }
        self.store.apply_version(block, &version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_produces_single_version() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("Hello", "<p>hi</p>"), None, None)
            .unwrap();

        assert_eq!(block.version, 1);
        let versions = blocks.versions(block.id).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version_number, 1);
        assert_eq!(versions[0].name, "Hello");
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let blocks = Blocks::in_memory().unwrap();
        let err = blocks
            .create(BlockFields::new("", "content"), None, None)
            .unwrap_err();
        assert!(matches!(err, StrataError::Validation { .. }));
    }

    #[test]
    fn test_update_with_unchanged_values_is_noop() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("Original Value", "c"), None, None)
            .unwrap();

        let after = blocks
            .update(block.id, BlockFields::new("Original Value", "c"), None, None)
            .unwrap();

        assert_eq!(after.version, 1);
        assert_eq!(blocks.versions(block.id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_with_changed_values_appends_version() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("Original Value", "c"), None, None)
            .unwrap();

        let after = blocks
            .update(
                block.id,
                BlockFields::new("Something Different", "c"),
                None,
                None,
            )
            .unwrap();

        assert_eq!(after.version, 2);
        assert_eq!(after.name, "Something Different");

        let versions = blocks.versions(block.id).unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].name, "Original Value");
        assert_eq!(versions[1].name, "Something Different");
    }

    #[test]
    fn test_update_unknown_block() {
        let blocks = Blocks::in_memory().unwrap();
        let err = blocks
            .update(Uuid::new_v4(), BlockFields::new("n", "c"), None, None)
            .unwrap_err();
        assert!(matches!(err, StrataError::NotFound { .. }));
    }

    #[test]
    fn test_mark_deleted_always_versions() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("b", "c"), None, None)
            .unwrap();

        let deleted = blocks.mark_deleted(block.id, "editor").unwrap();
        assert!(deleted.is_deleted());
        assert_eq!(deleted.version, 2);

        // Deleting an already-deleted block still appends a version
        let again = blocks.mark_deleted(block.id, "editor").unwrap();
        assert_eq!(again.version, 3);

        assert_eq!(blocks.count_all().unwrap(), 1);
        assert_eq!(blocks.count_active().unwrap(), 0);
        assert!(blocks.get(block.id).is_ok());
    }

    #[test]
    fn test_revert_missing_version_parameter() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("b", "c"), None, None)
            .unwrap();

        let err = blocks.revert_to(block.id, None, "editor").unwrap_err();
        assert_eq!(err.to_string(), "Version parameter missing");
        assert_eq!(blocks.versions(block.id).unwrap().len(), 1);
    }

    #[test]
    fn test_revert_unknown_version() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("b", "c"), None, None)
            .unwrap();

        let err = blocks.revert_to(block.id, Some(99), "editor").unwrap_err();
        assert_eq!(err.to_string(), "Could not find version 99");
        assert_eq!(blocks.versions(block.id).unwrap().len(), 1);
    }

    #[test]
    fn test_revert_creates_new_sequential_version() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("Version One", "c"), None, None)
            .unwrap();
        blocks
            .update(block.id, BlockFields::new("Version Two", "c"), None, None)
            .unwrap();

        let reverted = blocks.revert_to(block.id, Some(1), "editor").unwrap();
        assert_eq!(reverted.version, 3);
        assert_eq!(reverted.name, "Version One");

        let v3 = blocks.find_version(block.id, 3).unwrap().unwrap();
        assert_eq!(v3.name, "Version One");
        assert_eq!(v3.created_by.as_deref(), Some("editor"));
    }

    #[test]
    fn test_revert_to_current_values_is_noop() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("same", "c"), None, None)
            .unwrap();

        let after = blocks.revert_to(block.id, Some(1), "editor").unwrap();
        assert_eq!(after.version, 1);
        assert_eq!(blocks.versions(block.id).unwrap().len(), 1);
    }

    #[test]
    fn test_as_of_version_materializes_old_state() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("V1", "one"), None, None)
            .unwrap();
        blocks
            .update(block.id, BlockFields::new("V2", "two"), None, None)
            .unwrap();

        let view = blocks.as_of_version(block.id, 1).unwrap();
        assert_eq!(view.id, block.id);
        assert_eq!(view.name, "V1");
        assert_eq!(view.content, "one");
        assert_eq!(view.version, 1);
        assert!(!view.is_current_version());
    }

    #[test]
    fn test_as_of_version_is_never_current() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("V1", "one"), None, None)
            .unwrap();
        blocks
            .update(block.id, BlockFields::new("V2", "two"), None, None)
            .unwrap();

        let live = blocks.get(block.id).unwrap();
        assert!(live.is_current_version());

        // Even the view of the latest version is flagged non-current
        let latest_view = blocks.as_of_version(block.id, live.version).unwrap();
        assert!(!latest_view.is_current_version());
    }

    #[test]
    fn test_as_of_version_errors() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("b", "c"), None, None)
            .unwrap();

        assert!(matches!(
            blocks.as_of_version(Uuid::new_v4(), 1).unwrap_err(),
            StrataError::NotFound { .. }
        ));
        assert_eq!(
            blocks.as_of_version(block.id, 5).unwrap_err().to_string(),
            "Could not find version 5"
        );
    }

    #[test]
    fn test_render() {
        let blocks = Blocks::in_memory().unwrap();
        let block = blocks
            .create(BlockFields::new("b", "<h1>Title</h1>"), None, None)
            .unwrap();

        assert_eq!(blocks.render(block.id).unwrap(), "<h1>Title</h1>");
    }

    #[test]
    fn test_connect_on_create_and_update() {
        let blocks = Blocks::in_memory().unwrap();
        let page_id = Uuid::new_v4();

        let block = blocks
            .create(
                BlockFields::new("b", "c"),
                Some(ConnectTo::new(page_id, "main")),
                None,
            )
            .unwrap();
        assert_eq!(block.connect_to_page_id, Some(page_id));
        assert_eq!(block.connect_to_container.as_deref(), Some("main"));

        let connectors = blocks.connectors_for_page(page_id).unwrap();
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].block_id, block.id);

        // Connector placement alone does not version the block
        let other_page = Uuid::new_v4();
        let after = blocks
            .update(
                block.id,
                BlockFields::new("b", "c"),
                Some(ConnectTo::new(other_page, "sidebar")),
                None,
            )
            .unwrap();
        assert_eq!(after.version, 1);
        assert_eq!(after.connect_to_page_id, Some(other_page));
        assert_eq!(blocks.connectors_for_page(other_page).unwrap().len(), 1);
    }
}
