//! # Table Schema
//!
//! One table, three columns, and the blank-aware unique indexes:
//!
//! - `ja` and `en` are each unique when non-null
//! - `(ja, blank(en))` is unique among rows whose `en` is blank
//! - `(blank(ja), en)` is unique among rows whose `ja` is blank
//! - at most one row has both columns blank

use rusqlite::Connection;

use crate::dictionary::{Column, DictionaryConfig};

/// Quote an identifier for SQLite
pub(crate) fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL expression that is true when a column is `NULL` or `''`
pub(crate) fn blank_expr(column: &str) -> String {
    let col = ident(column);
    format!("({col} IS NULL OR {col} = '')")
}

/// DDL for the dictionary table and its indexes
pub fn create_statements(config: &DictionaryConfig) -> String {
    let table = ident(&config.table);
    let ja = ident(config.key(Column::Ja));
    let en = ident(config.key(Column::En));
    let ja_blank = blank_expr(config.key(Column::Ja));
    let en_blank = blank_expr(config.key(Column::En));
    let index = |suffix: &str| ident(&format!("{}_{}", config.table, suffix));

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n\
         \x20   id INTEGER PRIMARY KEY AUTOINCREMENT,\n\
         \x20   {ja} TEXT UNIQUE,\n\
         \x20   {en} TEXT UNIQUE\n\
         );\n\
         CREATE UNIQUE INDEX IF NOT EXISTS {i1} ON {table} ({ja}, {en_blank}) WHERE {en_blank};\n\
         CREATE UNIQUE INDEX IF NOT EXISTS {i2} ON {table} ({ja_blank}, {en}) WHERE {ja_blank};\n\
         CREATE UNIQUE INDEX IF NOT EXISTS {i3} ON {table} ({ja_blank}, {en_blank}) \
         WHERE {ja_blank} AND {en_blank};\n",
        i1 = index("unique_blank_target"),
        i2 = index("unique_blank_source"),
        i3 = index("unique_blank_pair"),
    )
}

/// Create the table and indexes if missing
pub fn ensure_schema(conn: &Connection, config: &DictionaryConfig) -> rusqlite::Result<()> {
    conn.execute_batch(&create_statements(config))
}
