//! Block storage layer with version history and connector support.
//!
//! Provides SQLite-backed persistence for blocks, their version
//! snapshots, and page connectors. Mutations that touch both the block
//! row and the version table run inside a single transaction, so the
//! "append snapshot, bump pointer" step is atomic per block.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{StrataError, StrataResult};
use crate::types::{BlockStatus, Connector, HtmlBlock};
use crate::versioning::{BlockVersion, VersionSummary};

/// Trait for block storage operations.
pub trait BlockStore: Send + Sync {
    /// Persist a new block together with its first version snapshot.
    fn insert_block(&self, block: &HtmlBlock, first_version: &BlockVersion) -> StrataResult<()>;

    /// Append a version snapshot and advance the block row to match.
    ///
    /// The version table's uniqueness constraint on
    /// (block_id, version_number) rejects a duplicate sequence number,
    /// so two racing writers cannot both claim the same slot.
    fn apply_version(&self, block: &HtmlBlock, version: &BlockVersion) -> StrataResult<()>;

    /// Update the connector attributes on the block row without
    /// versioning.
    fn set_connect_attrs(
        &self,
        block_id: Uuid,
        page_id: Uuid,
        container: &str,
    ) -> StrataResult<()>;

    /// Get a block by id. Soft-deleted blocks are still found.
    fn get_block(&self, block_id: Uuid) -> StrataResult<Option<HtmlBlock>>;

    /// Get all blocks that have not been soft-deleted.
    fn list_active(&self) -> StrataResult<Vec<HtmlBlock>>;

    /// Count blocks that have not been soft-deleted.
    fn count_active(&self) -> StrataResult<usize>;

    /// Count all block rows, soft-deleted included.
    fn count_all(&self) -> StrataResult<usize>;

    /// Get a specific version by number.
    fn find_version(
        &self,
        block_id: Uuid,
        version_number: u32,
    ) -> StrataResult<Option<BlockVersion>>;

    /// Get the latest version of a block.
    fn latest_version(&self, block_id: Uuid) -> StrataResult<Option<BlockVersion>>;

    /// Get all versions of a block (ordered by version number).
    fn versions_for(&self, block_id: Uuid) -> StrataResult<Vec<BlockVersion>>;

    /// Count versions of a block.
    fn version_count(&self, block_id: Uuid) -> StrataResult<usize>;

    /// Read a block together with one of its versions under a single
    /// lock, so the pair is consistent. The inner option is `None` when
    /// the block exists but the version does not.
    fn block_with_version(
        &self,
        block_id: Uuid,
        version_number: u32,
    ) -> StrataResult<Option<(HtmlBlock, Option<BlockVersion>)>>;

    /// Like `block_with_version`, but resolves the latest version
    /// created at or before the given timestamp.
    fn block_with_version_at(
        &self,
        block_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> StrataResult<Option<(HtmlBlock, Option<BlockVersion>)>>;

    /// Get version summary for a block.
    fn version_summary(&self, block_id: Uuid) -> StrataResult<Option<VersionSummary>>;

    /// Persist a page connector row.
    fn insert_connector(&self, connector: &Connector) -> StrataResult<()>;

    /// Reverse lookup: connectors pointing at the given page.
    fn connectors_for_page(&self, page_id: Uuid) -> StrataResult<Vec<Connector>>;
}

/// SQLite-backed block store.
pub struct SqliteBlockStore {
    conn: Mutex<Connection>,
}

impl SqliteBlockStore {
    /// Create a new store at the given path.
    pub fn new(path: impl AsRef<Path>) -> StrataResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = if path.as_ref().to_str() == Some(":memory:") {
            Connection::open_in_memory()
        } else {
            Connection::open(path.as_ref())
        }?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> StrataResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StrataResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS html_blocks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL,
                version INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                connect_to_page_id TEXT,
                connect_to_container TEXT
            );

            CREATE TABLE IF NOT EXISTS block_versions (
                version_id TEXT PRIMARY KEY,
                block_id TEXT NOT NULL,
                version_number INTEGER NOT NULL,
                name TEXT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                created_by TEXT,
                UNIQUE(block_id, version_number)
            );

            CREATE TABLE IF NOT EXISTS connectors (
                connector_id TEXT PRIMARY KEY,
                page_id TEXT NOT NULL,
                block_id TEXT NOT NULL,
                container TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Index for getting latest version
            CREATE INDEX IF NOT EXISTS idx_block_versions_block_num
                ON block_versions(block_id, version_number DESC);

            -- Index for point-in-time queries
            CREATE INDEX IF NOT EXISTS idx_block_versions_block_time
                ON block_versions(block_id, created_at);

            -- Index for page reverse lookups
            CREATE INDEX IF NOT EXISTS idx_connectors_page
                ON connectors(page_id);
        "#,
        )?;
        Ok(())
    }

    fn parse_uuid(s: &str) -> StrataResult<Uuid> {
        Uuid::parse_str(s).map_err(|e| StrataError::parse(e.to_string()))
    }

    fn parse_timestamp(s: &str) -> StrataResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StrataError::parse(e.to_string()))
    }

    fn parse_status(s: &str) -> StrataResult<BlockStatus> {
        BlockStatus::from_str(s)
            .ok_or_else(|| StrataError::parse(format!("unknown block status '{}'", s)))
    }

    fn row_to_block(row: &rusqlite::Row<'_>) -> StrataResult<HtmlBlock> {
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        let content: String = row.get(2)?;
        let status: String = row.get(3)?;
        let version: u32 = row.get(4)?;
        let created_at: String = row.get(5)?;
        let updated_at: String = row.get(6)?;
        let connect_to_page_id: Option<String> = row.get(7)?;
        let connect_to_container: Option<String> = row.get(8)?;

        Ok(HtmlBlock {
            id: Self::parse_uuid(&id)?,
            name,
            content,
            status: Self::parse_status(&status)?,
            version,
            created_at: Self::parse_timestamp(&created_at)?,
            updated_at: Self::parse_timestamp(&updated_at)?,
            connect_to_page_id: connect_to_page_id
                .as_deref()
                .map(Self::parse_uuid)
                .transpose()?,
            connect_to_container,
            live: true,
        })
    }

    fn row_to_version(row: &rusqlite::Row<'_>) -> StrataResult<BlockVersion> {
        let version_id: String = row.get(0)?;
        let block_id: String = row.get(1)?;
        let version_number: u32 = row.get(2)?;
        let name: String = row.get(3)?;
        let content: String = row.get(4)?;
        let status: String = row.get(5)?;
        let created_at: String = row.get(6)?;
        let created_by: Option<String> = row.get(7)?;

        Ok(BlockVersion {
            version_id: Self::parse_uuid(&version_id)?,
            block_id: Self::parse_uuid(&block_id)?,
            version_number,
            name,
            content,
            status: Self::parse_status(&status)?,
            created_at: Self::parse_timestamp(&created_at)?,
            created_by,
        })
    }

    fn row_to_connector(row: &rusqlite::Row<'_>) -> StrataResult<Connector> {
        let connector_id: String = row.get(0)?;
        let page_id: String = row.get(1)?;
        let block_id: String = row.get(2)?;
        let container: String = row.get(3)?;
        let created_at: String = row.get(4)?;

        Ok(Connector {
            connector_id: Self::parse_uuid(&connector_id)?,
            page_id: Self::parse_uuid(&page_id)?,
            block_id: Self::parse_uuid(&block_id)?,
            container,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }

    fn query_block(conn: &Connection, block_id: Uuid) -> StrataResult<Option<HtmlBlock>> {
        let mut stmt = conn.prepare(
            r#"SELECT id, name, content, status, version, created_at, updated_at,
                      connect_to_page_id, connect_to_container
               FROM html_blocks
               WHERE id = ?1"#,
        )?;

        stmt.query_row(params![block_id.to_string()], |row| {
            Ok(Self::row_to_block(row))
        })
        .optional()?
        .transpose()
    }

    fn query_version(
        conn: &Connection,
        block_id: Uuid,
        version_number: u32,
    ) -> StrataResult<Option<BlockVersion>> {
        let mut stmt = conn.prepare(
            r#"SELECT version_id, block_id, version_number, name, content, status,
                      created_at, created_by
               FROM block_versions
               WHERE block_id = ?1 AND version_number = ?2"#,
        )?;

        stmt.query_row(params![block_id.to_string(), version_number], |row| {
            Ok(Self::row_to_version(row))
        })
        .optional()?
        .transpose()
    }

    fn query_version_at(
        conn: &Connection,
        block_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> StrataResult<Option<BlockVersion>> {
        let mut stmt = conn.prepare(
            r#"SELECT version_id, block_id, version_number, name, content, status,
                      created_at, created_by
               FROM block_versions
               WHERE block_id = ?1 AND created_at <= ?2
               ORDER BY version_number DESC
               LIMIT 1"#,
        )?;

        stmt.query_row(
            params![block_id.to_string(), timestamp.to_rfc3339()],
            |row| Ok(Self::row_to_version(row)),
        )
        .optional()?
        .transpose()
    }

    fn insert_version_row(tx: &rusqlite::Transaction<'_>, version: &BlockVersion) -> StrataResult<()> {
        tx.execute(
            r#"INSERT INTO block_versions
               (version_id, block_id, version_number, name, content, status,
                created_at, created_by)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                version.version_id.to_string(),
                version.block_id.to_string(),
                version.version_number,
                version.name,
                version.content,
                version.status.as_str(),
                version.created_at.to_rfc3339(),
                version.created_by,
            ],
        )?;
        Ok(())
    }
}

impl BlockStore for SqliteBlockStore {
    fn insert_block(&self, block: &HtmlBlock, first_version: &BlockVersion) -> StrataResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO html_blocks
               (id, name, content, status, version, created_at, updated_at,
                connect_to_page_id, connect_to_container)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                block.id.to_string(),
                block.name,
                block.content,
                block.status.as_str(),
                block.version,
                block.created_at.to_rfc3339(),
                block.updated_at.to_rfc3339(),
                block.connect_to_page_id.map(|id| id.to_string()),
                block.connect_to_container,
            ],
        )?;
        Self::insert_version_row(&tx, first_version)?;

        tx.commit()?;
        Ok(())
    }

    fn apply_version(&self, block: &HtmlBlock, version: &BlockVersion) -> StrataResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        Self::insert_version_row(&tx, version)?;
        let updated = tx.execute(
            r#"UPDATE html_blocks
               SET name = ?2, content = ?3, status = ?4, version = ?5, updated_at = ?6,
                   connect_to_page_id = ?7, connect_to_container = ?8
               WHERE id = ?1"#,
            params![
                block.id.to_string(),
                block.name,
                block.content,
                block.status.as_str(),
                block.version,
                block.updated_at.to_rfc3339(),
                block.connect_to_page_id.map(|id| id.to_string()),
                block.connect_to_container,
            ],
        )?;
        if updated == 0 {
            // Transaction rolls back on drop
            return Err(StrataError::not_found(block.id.to_string()));
        }

        tx.commit()?;
        Ok(())
    }

    fn set_connect_attrs(
        &self,
        block_id: Uuid,
        page_id: Uuid,
        container: &str,
    ) -> StrataResult<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            r#"UPDATE html_blocks
               SET connect_to_page_id = ?2, connect_to_container = ?3
               WHERE id = ?1"#,
            params![block_id.to_string(), page_id.to_string(), container],
        )?;
        if updated == 0 {
            return Err(StrataError::not_found(block_id.to_string()));
        }
        Ok(())
    }

    fn get_block(&self, block_id: Uuid) -> StrataResult<Option<HtmlBlock>> {
        let conn = self.conn.lock().unwrap();
        Self::query_block(&conn, block_id)
    }

    fn list_active(&self) -> StrataResult<Vec<HtmlBlock>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"SELECT id, name, content, status, version, created_at, updated_at,
                      connect_to_page_id, connect_to_container
               FROM html_blocks
               WHERE status != 'DELETED'
               ORDER BY created_at ASC"#,
        )?;

        let results = stmt.query_map([], |row| Ok(Self::row_to_block(row)))?;

        results
            .map(|r| r.map_err(|e| e.into()).and_then(|inner| inner))
            .collect()
    }

    fn count_active(&self) -> StrataResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM html_blocks WHERE status != 'DELETED'",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn count_all(&self) -> StrataResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM html_blocks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn find_version(
        &self,
        block_id: Uuid,
        version_number: u32,
    ) -> StrataResult<Option<BlockVersion>> {
        let conn = self.conn.lock().unwrap();
        Self::query_version(&conn, block_id, version_number)
    }

    fn latest_version(&self, block_id: Uuid) -> StrataResult<Option<BlockVersion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"SELECT version_id, block_id, version_number, name, content, status,
                      created_at, created_by
               FROM block_versions
               WHERE block_id = ?1
               ORDER BY version_number DESC
               LIMIT 1"#,
        )?;

        stmt.query_row(params![block_id.to_string()], |row| {
            Ok(Self::row_to_version(row))
        })
        .optional()?
        .transpose()
    }

    fn versions_for(&self, block_id: Uuid) -> StrataResult<Vec<BlockVersion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"SELECT version_id, block_id, version_number, name, content, status,
                      created_at, created_by
               FROM block_versions
               WHERE block_id = ?1
               ORDER BY version_number ASC"#,
        )?;

        let results = stmt.query_map(params![block_id.to_string()], |row| {
            Ok(Self::row_to_version(row))
        })?;

        results
            .map(|r| r.map_err(|e| e.into()).and_then(|inner| inner))
            .collect()
    }

    fn version_count(&self, block_id: Uuid) -> StrataResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM block_versions WHERE block_id = ?1",
            params![block_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn block_with_version(
        &self,
        block_id: Uuid,
        version_number: u32,
    ) -> StrataResult<Option<(HtmlBlock, Option<BlockVersion>)>> {
        let conn = self.conn.lock().unwrap();
        match Self::query_block(&conn, block_id)? {
            None => Ok(None),
            Some(block) => {
                let version = Self::query_version(&conn, block_id, version_number)?;
                Ok(Some((block, version)))
            }
        }
    }

    fn block_with_version_at(
        &self,
        block_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> StrataResult<Option<(HtmlBlock, Option<BlockVersion>)>> {
        let conn = self.conn.lock().unwrap();
        match Self::query_block(&conn, block_id)? {
            None => Ok(None),
            Some(block) => {
                let version = Self::query_version_at(&conn, block_id, timestamp)?;
                Ok(Some((block, version)))
            }
        }
    }

    fn version_summary(&self, block_id: Uuid) -> StrataResult<Option<VersionSummary>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"SELECT
                COUNT(*) as total,
                MAX(version_number) as latest,
                MIN(created_at) as first,
                MAX(created_at) as last
               FROM block_versions
               WHERE block_id = ?1"#,
        )?;

        let result = stmt
            .query_row(params![block_id.to_string()], |row| {
                let total: u32 = row.get(0)?;
                if total == 0 {
                    return Ok(None);
                }

                let latest: u32 = row.get(1)?;
                let first: String = row.get(2)?;
                let last: String = row.get(3)?;

                Ok(Some((latest, first, last, total)))
            })
            .optional()?
            .flatten();

        match result {
            None => Ok(None),
            Some((latest, first, last, total)) => Ok(Some(VersionSummary {
                block_id,
                total_versions: total,
                latest_version: latest,
                first_created: Self::parse_timestamp(&first)?,
                last_modified: Self::parse_timestamp(&last)?,
            })),
        }
    }

    fn insert_connector(&self, connector: &Connector) -> StrataResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"INSERT INTO connectors
               (connector_id, page_id, block_id, container, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                connector.connector_id.to_string(),
                connector.page_id.to_string(),
                connector.block_id.to_string(),
                connector.container,
                connector.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn connectors_for_page(&self, page_id: Uuid) -> StrataResult<Vec<Connector>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"SELECT connector_id, page_id, block_id, container, created_at
               FROM connectors
               WHERE page_id = ?1
               ORDER BY created_at ASC"#,
        )?;

        let results = stmt.query_map(params![page_id.to_string()], |row| {
            Ok(Self::row_to_connector(row))
        })?;

        results
            .map(|r| r.map_err(|e| e.into()).and_then(|inner| inner))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockFields;

    fn seeded_block(store: &SqliteBlockStore, name: &str, content: &str) -> HtmlBlock {
        let block = HtmlBlock::new(BlockFields::new(name, content));
        let v1 = BlockVersion::capture(&block);
        store.insert_block(&block, &v1).unwrap();
        block
    }

    #[test]
    fn test_insert_and_get_block() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let block = seeded_block(&store, "Hello", "<p>world</p>");

        let loaded = store.get_block(block.id).unwrap().unwrap();
        assert_eq!(loaded.id, block.id);
        assert_eq!(loaded.name, "Hello");
        assert_eq!(loaded.version, 1);
        assert!(loaded.is_current_version());

        assert_eq!(store.version_count(block.id).unwrap(), 1);
        let v1 = store.find_version(block.id, 1).unwrap().unwrap();
        assert_eq!(v1.name, "Hello");
    }

    #[test]
    fn test_apply_version_advances_block_row() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let mut block = seeded_block(&store, "V1", "one");

        block.apply_fields(BlockFields::new("V2", "two"));
        block.version = 2;
        let v2 = BlockVersion::capture(&block);
        store.apply_version(&block, &v2).unwrap();

        let loaded = store.get_block(block.id).unwrap().unwrap();
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.name, "V2");

        let all = store.versions_for(block.id).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].version_number, 1);
        assert_eq!(all[1].version_number, 2);
    }

    #[test]
    fn test_duplicate_version_number_rejected() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let block = seeded_block(&store, "V1", "one");

        // A second snapshot claiming version 1 violates the sequence
        let dup = BlockVersion::capture(&block);
        assert!(store.apply_version(&block, &dup).is_err());

        // Failed mutation leaves the store untouched
        assert_eq!(store.version_count(block.id).unwrap(), 1);
        assert_eq!(store.get_block(block.id).unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_apply_version_unknown_block_rolls_back() {
        let store = SqliteBlockStore::in_memory().unwrap();

        let orphan = HtmlBlock::new(BlockFields::new("ghost", "none"));
        let v = BlockVersion::capture(&orphan);
        assert!(store.apply_version(&orphan, &v).is_err());

        // The snapshot insert must not survive the failed pointer bump
        assert_eq!(store.version_count(orphan.id).unwrap(), 0);
    }

    #[test]
    fn test_latest_version() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let mut block = seeded_block(&store, "V1", "one");

        block.apply_fields(BlockFields::new("V2", "two"));
        block.version = 2;
        store
            .apply_version(&block, &BlockVersion::capture(&block))
            .unwrap();

        let latest = store.latest_version(block.id).unwrap().unwrap();
        assert_eq!(latest.version_number, 2);
        assert_eq!(latest.name, "V2");
    }

    #[test]
    fn test_point_in_time_query() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let block = HtmlBlock::new(BlockFields::new("V1", "one"));

        let mut v1 = BlockVersion::capture(&block);
        v1.created_at = Utc::now() - chrono::Duration::days(2);
        store.insert_block(&block, &v1).unwrap();

        let mut newer = block.clone();
        newer.apply_fields(BlockFields::new("V2", "two"));
        newer.version = 2;
        let mut v2 = BlockVersion::capture(&newer);
        v2.created_at = Utc::now() - chrono::Duration::days(1);
        store.apply_version(&newer, &v2).unwrap();

        let (_, at_36h) = store
            .block_with_version_at(block.id, Utc::now() - chrono::Duration::hours(36))
            .unwrap()
            .unwrap();
        assert_eq!(at_36h.unwrap().name, "V1");

        let (_, at_now) = store
            .block_with_version_at(block.id, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(at_now.unwrap().name, "V2");

        let (_, before_everything) = store
            .block_with_version_at(block.id, Utc::now() - chrono::Duration::days(3))
            .unwrap()
            .unwrap();
        assert!(before_everything.is_none());
    }

    #[test]
    fn test_counts_split_on_status() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let mut block = seeded_block(&store, "doomed", "c");
        seeded_block(&store, "survivor", "c");

        assert_eq!(store.count_all().unwrap(), 2);
        assert_eq!(store.count_active().unwrap(), 2);

        block.status = BlockStatus::Deleted;
        block.version = 2;
        store
            .apply_version(&block, &BlockVersion::capture(&block))
            .unwrap();

        assert_eq!(store.count_all().unwrap(), 2);
        assert_eq!(store.count_active().unwrap(), 1);
        let active = store.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "survivor");

        // Existence queries still find the soft-deleted row
        assert!(store.get_block(block.id).unwrap().is_some());
    }

    #[test]
    fn test_version_summary() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let mut block = seeded_block(&store, "V1", "one");

        assert!(store.version_summary(Uuid::new_v4()).unwrap().is_none());

        block.apply_fields(BlockFields::new("V2", "two"));
        block.version = 2;
        store
            .apply_version(&block, &BlockVersion::capture(&block))
            .unwrap();

        let summary = store.version_summary(block.id).unwrap().unwrap();
        assert_eq!(summary.total_versions, 2);
        assert_eq!(summary.latest_version, 2);
        assert!(summary.first_created <= summary.last_modified);
    }

    #[test]
    fn test_connector_round_trip() {
        let store = SqliteBlockStore::in_memory().unwrap();
        let block = seeded_block(&store, "b", "c");
        let page_id = Uuid::new_v4();

        store
            .insert_connector(&Connector::new(page_id, block.id, "main"))
            .unwrap();

        let connectors = store.connectors_for_page(page_id).unwrap();
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].block_id, block.id);
        assert_eq!(connectors[0].container, "main");

        assert!(store.connectors_for_page(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("blocks.db");

        let store = SqliteBlockStore::new(&path).unwrap();
        let block = seeded_block(&store, "persisted", "c");
        drop(store);

        let reopened = SqliteBlockStore::new(&path).unwrap();
        let loaded = reopened.get_block(block.id).unwrap().unwrap();
        assert_eq!(loaded.name, "persisted");
        assert_eq!(reopened.version_count(block.id).unwrap(), 1);
    }
}
