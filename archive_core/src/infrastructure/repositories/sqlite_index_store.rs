// /////////////////////////////////////////////////////////////////////////////
// Archive Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite IndexStore
//!
//! The concrete `IndexStore` (§4.9) backing `PartScheduler::index_closed_part`:
//! one `storage` row per durably-closed part, one child row per entry in a
//! per-kind table. Built the way the teacher's `SqlitePipelineRepository`
//! talks to its own tables — `sqlx::query` with positional binds over a
//! `SqlitePool`, no compile-time-checked `query!` macro since the workspace
//! doesn't carry the `sqlx` `macros` feature.

use archive_core_domain::repositories::{EntryTableKind, IndexEntryRow, IndexStore, StorageRow, StorageState};
use archive_core_domain::ArchiveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

fn db_err(e: sqlx::Error) -> ArchiveError {
    ArchiveError::database(e.to_string())
}

/// Translates a `*`/`?` glob (the same dialect `compress_exclude_patterns`
/// uses, §4.3) into a SQL `LIKE` pattern, escaping the characters `LIKE`
/// already treats specially.
fn glob_to_like(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('%'),
            '?' => out.push('_'),
            other => out.push(other),
        }
    }
    out
}

fn row_to_storage(row: sqlx::sqlite::SqliteRow) -> Result<StorageRow, ArchiveError> {
    let state_str: String = row.get("state");
    let last_checked: Option<String> = row.get("last_checked");
    Ok(StorageRow {
        id: row.get("id"),
        name: row.get("name"),
        size: row.get::<i64, _>("size") as u64,
        state: StorageState::from_str(&state_str)?,
        last_checked: last_checked
            .map(|s| DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)))
            .transpose()
            .map_err(|e| ArchiveError::database(format!("bad last_checked timestamp: {e}")))?,
        error_message: row.get("error_message"),
    })
}

/// `IndexStore` implementation over a `sqlx` SQLite pool.
pub struct SqliteIndexStore {
    pool: SqlitePool,
}

impl SqliteIndexStore {
    /// Opens (creating if missing) the database at `database_url` and runs
    /// pending migrations (`../migrations`, shared across workspace crates).
    pub async fn connect(database_url: &str) -> Result<Self, ArchiveError> {
        let pool = super::schema::initialize_database(database_url).await.map_err(db_err)?;
        Ok(Self { pool })
    }

    /// Wraps an already-migrated pool, for callers that manage the pool's
    /// lifecycle themselves (tests, or a process sharing one pool across
    /// several stores).
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn clear_child_tables(&self, storage_id: i64) -> Result<(), ArchiveError> {
        const TABLES: [&str; 6] =
            ["file_entries", "image_entries", "dir_entries", "link_entries", "hardlink_entries", "special_entries"];
        for table in TABLES {
            sqlx::query(&format!("DELETE FROM {table} WHERE storage_id = ?"))
                .bind(storage_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl IndexStore for SqliteIndexStore {
    async fn add_storage(&self, name: &str, size: u64) -> Result<i64, ArchiveError> {
        // §4.9 "Idempotence": re-indexing the same archive locates the
        // existing row by name, clears its children, and rewrites it rather
        // than inserting a duplicate (`name` is UNIQUE).
        if let Some(existing) = self.find_storage_by_name(name).await? {
            self.clear_child_tables(existing.id).await?;
            self.update_storage(existing.id, name, size).await?;
            self.set_storage_state(existing.id, StorageState::Create, Utc::now(), None).await?;
            return Ok(existing.id);
        }

        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO storage (name, size, state, last_checked, error_message) VALUES (?, ?, ?, ?, NULL)",
        )
        .bind(name)
        .bind(size as i64)
        .bind(StorageState::Create.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_storage(&self, id: i64, name: &str, size: u64) -> Result<(), ArchiveError> {
        sqlx::query("UPDATE storage SET name = ?, size = ? WHERE id = ?")
            .bind(name)
            .bind(size as i64)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn set_storage_state(
        &self,
        id: i64,
        state: StorageState,
        checked_at: DateTime<Utc>,
        error_message: Option<&str>,
    ) -> Result<(), ArchiveError> {
        sqlx::query("UPDATE storage SET state = ?, last_checked = ?, error_message = ? WHERE id = ?")
            .bind(state.as_str())
            .bind(checked_at.to_rfc3339())
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_storage(&self, id: i64) -> Result<(), ArchiveError> {
        // Child rows go with it via `ON DELETE CASCADE`.
        sqlx::query("DELETE FROM storage WHERE id = ?").bind(id).execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }

    async fn clear_storage(&self, id: i64) -> Result<(), ArchiveError> {
        self.clear_child_tables(id).await
    }

    async fn add_entry(&self, storage_id: i64, kind: EntryTableKind, row: IndexEntryRow) -> Result<(), ArchiveError> {
        match kind {
            EntryTableKind::File => {
                sqlx::query(
                    "INSERT INTO file_entries (storage_id, path, size, mtime, uid, gid, fragment_offset, fragment_size) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(storage_id)
                .bind(&row.path)
                .bind(row.size.map(|v| v as i64))
                .bind(row.mtime.map(|t| t.to_rfc3339()))
                .bind(row.uid.map(|v| v as i64))
                .bind(row.gid.map(|v| v as i64))
                .bind(row.fragment_offset.map(|v| v as i64))
                .bind(row.fragment_size.map(|v| v as i64))
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            }
            EntryTableKind::Image => {
                sqlx::query(
                    "INSERT INTO image_entries (storage_id, path, size, mtime, uid, gid, block_offset, block_count) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(storage_id)
                .bind(&row.path)
                .bind(row.size.map(|v| v as i64))
                .bind(row.mtime.map(|t| t.to_rfc3339()))
                .bind(row.uid.map(|v| v as i64))
                .bind(row.gid.map(|v| v as i64))
                .bind(row.block_offset.map(|v| v as i64))
                .bind(row.block_count.map(|v| v as i64))
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            }
            EntryTableKind::Dir => {
                sqlx::query("INSERT INTO dir_entries (storage_id, path, mtime, uid, gid) VALUES (?, ?, ?, ?, ?)")
                    .bind(storage_id)
                    .bind(&row.path)
                    .bind(row.mtime.map(|t| t.to_rfc3339()))
                    .bind(row.uid.map(|v| v as i64))
                    .bind(row.gid.map(|v| v as i64))
                    .execute(&self.pool)
                    .await
                    .map_err(db_err)?;
            }
            EntryTableKind::Link => {
                sqlx::query(
                    "INSERT INTO link_entries (storage_id, path, mtime, uid, gid, destination) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(storage_id)
                .bind(&row.path)
                .bind(row.mtime.map(|t| t.to_rfc3339()))
                .bind(row.uid.map(|v| v as i64))
                .bind(row.gid.map(|v| v as i64))
                .bind(&row.destination)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            }
            EntryTableKind::HardLink => {
                sqlx::query(
                    "INSERT INTO hardlink_entries (storage_id, path, mtime, uid, gid, destination) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(storage_id)
                .bind(&row.path)
                .bind(row.mtime.map(|t| t.to_rfc3339()))
                .bind(row.uid.map(|v| v as i64))
                .bind(row.gid.map(|v| v as i64))
                .bind(&row.destination)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            }
            EntryTableKind::Special => {
                sqlx::query(
                    "INSERT INTO special_entries (storage_id, path, mtime, uid, gid, special_type, major, minor) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(storage_id)
                .bind(&row.path)
                .bind(row.mtime.map(|t| t.to_rfc3339()))
                .bind(row.uid.map(|v| v as i64))
                .bind(row.gid.map(|v| v as i64))
                .bind(row.special_type.map(|v| v as i64))
                .bind(row.major.map(|v| v as i64))
                .bind(row.minor.map(|v| v as i64))
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            }
        }
        Ok(())
    }

    async fn find_storage_by_name(&self, name: &str) -> Result<Option<StorageRow>, ArchiveError> {
        let row = sqlx::query("SELECT id, name, size, state, last_checked, error_message FROM storage WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(row_to_storage).transpose()
    }

    async fn list_storage_by_name_glob(&self, pattern: &str) -> Result<Vec<StorageRow>, ArchiveError> {
        let like = glob_to_like(pattern);
        let rows = sqlx::query(
            "SELECT id, name, size, state, last_checked, error_message FROM storage WHERE name LIKE ? ESCAPE '\\'",
        )
        .bind(like)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(row_to_storage).collect()
    }

    async fn list_storage_by_state(&self, state: StorageState) -> Result<Vec<StorageRow>, ArchiveError> {
        let rows = sqlx::query("SELECT id, name, size, state, last_checked, error_message FROM storage WHERE state = ?")
            .bind(state.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(row_to_storage).collect()
    }
}
