//! # SQLite Gateway
//!
//! `DictionaryStore` backed by a single `rusqlite` connection. Every
//! operation is one statement; batch inserts rely on SQLite executing the
//! multi-row `INSERT` atomically.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params_from_iter, Connection, Row};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::dictionary::{Column, DictionaryConfig, DictionaryEntry};
use crate::normalizer::{parse_id, CanonicalPayload, FilterSpec, QueryError, QueryNormalizer, WriteMode};

use super::errors::{ErrorCode, GatewayError, GatewayResult};
use super::schema::{ensure_schema, ident};
use super::sql::{self, Statement};
use super::DictionaryStore;

/// Sample rows: a distinct pair, an identical pair, target only, source only
/// and the single both-blank row
pub const SAMPLE_ROWS: [(Option<&str>, Option<&str>); 5] = [
    (Some("相棒"), Some("AIBOU: Tokyo Detective Duo")),
    (Some("Hunter × Hunter"), Some("Hunter × Hunter")),
    (None, Some("Homestuck")),
    (Some("世界制服をたくらむモララー"), None),
    (Some(""), Some("")),
];

/// SQLite-backed dictionary gateway
pub struct SqliteGateway {
    conn: Mutex<Connection>,
    normalizer: QueryNormalizer,
}

impl std::fmt::Debug for SqliteGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteGateway")
            .field("config", self.config())
            .finish_non_exhaustive()
    }
}

impl SqliteGateway {
    /// Open (or create) a database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>, config: DictionaryConfig) -> GatewayResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn, config)
    }

    /// Open a private in-memory database
    pub fn open_in_memory(config: DictionaryConfig) -> GatewayResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection, config: DictionaryConfig) -> GatewayResult<Self> {
        config
            .validate()
            .map_err(|e| GatewayError::store(format!("Invalid dictionary config: {}", e)))?;
        ensure_schema(&conn, &config)?;

        Ok(Self {
            conn: Mutex::new(conn),
            normalizer: QueryNormalizer::new(config),
        })
    }

    /// Rows matching a normalized filter
    pub fn select(&self, filter: &FilterSpec) -> GatewayResult<Vec<DictionaryEntry>> {
        self.run(&sql::select(self.config(), filter))
    }

    /// Zero or one row
    pub fn select_by_id(&self, id: i64) -> GatewayResult<Vec<DictionaryEntry>> {
        self.run(&sql::select_by_id(self.config(), id))
    }

    /// Bulk insert of canonical payloads; rows come back in insertion order
    pub fn insert_payloads(&self, payloads: &[CanonicalPayload]) -> GatewayResult<Vec<DictionaryEntry>> {
        if payloads.is_empty() {
            return Err(QueryError::EmptyBatch.into());
        }

        let mut rows = self.run(&sql::insert(self.config(), payloads))?;
        // ids are assigned in insertion order; RETURNING order is not guaranteed
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }

    /// Update present keys of one row; zero rows when the id is absent
    pub fn update_payload(&self, id: i64, payload: &CanonicalPayload) -> GatewayResult<Vec<DictionaryEntry>> {
        if payload.is_empty() {
            return Err(QueryError::NoRecognizedKeys.into());
        }
        self.run(&sql::update(self.config(), id, payload))
    }

    /// Delete one row; zero rows when the id is absent
    pub fn delete_id(&self, id: i64) -> GatewayResult<Vec<DictionaryEntry>> {
        self.run(&sql::delete(self.config(), id))
    }

    /// Replace every row with `rows`, inserted verbatim.
    ///
    /// Bypasses normalization, so values such as `""` are stored as given.
    /// The delete and the inserts commit together; ids keep counting up.
    pub fn seed_raw(&self, rows: &[(Option<&str>, Option<&str>)]) -> GatewayResult<usize> {
        let mut conn = self.lock()?;
        let config = self.config();
        let table = ident(&config.table);
        let insert = format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?)",
            table,
            ident(config.key(Column::Ja)),
            ident(config.key(Column::En)),
        );

        let seed = |tx: &rusqlite::Transaction<'_>| -> rusqlite::Result<usize> {
            let removed = tx.execute(&format!("DELETE FROM {}", table), [])?;
            debug!(removed, "cleared table before seeding");

            let mut stmt = tx.prepare(&insert)?;
            let mut inserted = 0;
            for (ja, en) in rows {
                inserted += stmt.execute(rusqlite::params![ja, en])?;
            }
            Ok(inserted)
        };

        let tx = conn.transaction().map_err(|e| observe_error(e.into()))?;
        let inserted = seed(&tx).map_err(|e| observe_error(e.into()))?;
        tx.commit().map_err(|e| observe_error(e.into()))?;
        Ok(inserted)
    }

    fn lock(&self) -> GatewayResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GatewayError::store("connection lock poisoned"))
    }

    fn run(&self, statement: &Statement) -> GatewayResult<Vec<DictionaryEntry>> {
        let conn = self.lock()?;
        debug!(sql = %statement.sql, params = statement.params.len(), "executing statement");

        match query_rows(&conn, statement).map_err(GatewayError::from) {
            Ok(rows) => {
                debug!(rows = rows.len(), "statement complete");
                Ok(rows)
            }
            Err(e) => Err(observe_error(e)),
        }
    }
}

fn query_rows(conn: &Connection, statement: &Statement) -> rusqlite::Result<Vec<DictionaryEntry>> {
    let mut stmt = conn.prepare(&statement.sql)?;
    let rows = stmt
        .query_map(params_from_iter(statement.params.iter()), read_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn read_entry(row: &Row<'_>) -> rusqlite::Result<DictionaryEntry> {
    Ok(DictionaryEntry::new(row.get(0)?, row.get(1)?, row.get(2)?))
}

fn observe_error(err: GatewayError) -> GatewayError {
    match err.code() {
        ErrorCode::ConstraintViolation => warn!(error = %err, "write rejected by unique constraint"),
        ErrorCode::StoreError(code) => error!(code, error = %err, "store failure"),
        ErrorCode::InvalidQuery => {}
    }
    err
}

fn rejected(err: QueryError) -> GatewayError {
    debug!(error = %err, "query rejected before reaching the store");
    GatewayError::InvalidQuery(err)
}

impl DictionaryStore for SqliteGateway {
    fn config(&self) -> &DictionaryConfig {
        self.normalizer.config()
    }

    fn fetch_all(&self) -> GatewayResult<Vec<DictionaryEntry>> {
        self.select(&FilterSpec::match_all())
    }

    fn fetch_by_id(&self, id: &Value) -> GatewayResult<Vec<DictionaryEntry>> {
        let id = parse_id(id).map_err(rejected)?;
        self.select_by_id(id)
    }

    fn fetch_by_filter(&self, filter: &Value) -> GatewayResult<Vec<DictionaryEntry>> {
        let filter = self.normalizer.normalize_for_filter(filter).map_err(rejected)?;
        self.select(&filter)
    }

    fn insert(&self, body: &Value) -> GatewayResult<Vec<DictionaryEntry>> {
        let payloads = self.normalizer.normalize_insert(body).map_err(rejected)?;
        self.insert_payloads(&payloads)
    }

    fn update_by_id(&self, id: &Value, body: &Value) -> GatewayResult<Vec<DictionaryEntry>> {
        let id = parse_id(id).map_err(rejected)?;
        let payload = self
            .normalizer
            .normalize_for_write(body, WriteMode::Update)
            .map_err(rejected)?;
        self.update_payload(id, &payload)
    }

    fn delete_by_id(&self, id: &Value) -> GatewayResult<Vec<DictionaryEntry>> {
        let id = parse_id(id).map_err(rejected)?;
        self.delete_id(id)
    }
}
