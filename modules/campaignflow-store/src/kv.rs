//! KvStore — the two-keyspace persistence boundary: JSON records by key,
//! plus duplicate-free indexes of member ids.
//!
//! `index_add` is atomic by contract. The original read-whole-index,
//! append, write-back dance loses entries under concurrent writers; both
//! backends here implement add-to-set natively instead (set insert under a
//! lock in memory, `ON CONFLICT DO NOTHING` against a primary key in
//! Postgres).

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch a record. Absence is `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Upsert a record by key.
    async fn put(&self, key: &str, value: Value) -> Result<()>;

    /// Add a member to an index, atomically and duplicate-free.
    async fn index_add(&self, index: &str, member: &str) -> Result<()>;

    /// Read all members of an index in insertion order.
    async fn index_read(&self, index: &str) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// MemoryKv
// ---------------------------------------------------------------------------

/// In-memory backend. The store behind every test and a valid runtime
/// choice for single-process use.
#[derive(Default)]
pub struct MemoryKv {
    records: Mutex<HashMap<String, Value>>,
    indexes: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        self.records.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn index_add(&self, index: &str, member: &str) -> Result<()> {
        let mut indexes = self.indexes.lock().unwrap();
        let members = indexes.entry(index.to_string()).or_default();
        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
        Ok(())
    }

    async fn index_read(&self, index: &str) -> Result<Vec<String>> {
        Ok(self
            .indexes
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// PgKv
// ---------------------------------------------------------------------------

/// Postgres backend: one JSONB table for records, one two-column table for
/// index membership.
#[derive(Clone)]
pub struct PgKv {
    pool: PgPool,
}

impl PgKv {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the two tables if they do not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_index (
                index_key TEXT NOT NULL,
                member TEXT NOT NULL,
                added_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (index_key, member)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl KvStore for PgKv {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query_as::<_, (Value,)>("SELECT value FROM kv_entries WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.0))
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn index_add(&self, index: &str, member: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_index (index_key, member)
            VALUES ($1, $2)
            ON CONFLICT (index_key, member) DO NOTHING
            "#,
        )
        .bind(index)
        .bind(member)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn index_read(&self, index: &str) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT member FROM kv_index
            WHERE index_key = $1
            ORDER BY added_at ASC, member ASC
            "#,
        )
        .bind(index)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
