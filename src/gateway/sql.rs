//! # Statement Builder
//!
//! Renders canonical filters and payloads into parameterized SQL. Values are
//! always bound; only configured identifiers are spliced into the text.

use rusqlite::types::Value as SqlValue;

use crate::dictionary::{Column, DictionaryConfig, Term};
use crate::normalizer::{CanonicalPayload, FilterSpec, Predicate};

use super::schema::{blank_expr, ident};

/// SQL text plus positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

fn returning(config: &DictionaryConfig) -> String {
    format!(
        "id, {}, {}",
        ident(config.key(Column::Ja)),
        ident(config.key(Column::En))
    )
}

fn bind(term: &Term) -> SqlValue {
    match term.as_sql() {
        Some(text) => SqlValue::Text(text.to_string()),
        None => SqlValue::Null,
    }
}

fn limit(config: &DictionaryConfig) -> SqlValue {
    SqlValue::Integer(i64::try_from(config.max_rows).unwrap_or(i64::MAX))
}

/// `SELECT` with the filter's predicates, ordered by id, capped
pub fn select(config: &DictionaryConfig, filter: &FilterSpec) -> Statement {
    let mut params = Vec::new();
    let clauses: Vec<String> = [Column::Ja, Column::En]
        .into_iter()
        .filter_map(|column| {
            let key = config.key(column);
            match filter.get(column) {
                Predicate::Any => None,
                Predicate::Blank => Some(blank_expr(key)),
                Predicate::Contains(text) => {
                    params.push(SqlValue::Text(text.clone()));
                    // Unlike LIKE, instr() is case-sensitive and has no wildcards,
                    // so % and _ in the needle match themselves
                    Some(format!("instr({}, ?) > 0", ident(key)))
                }
            }
        })
        .collect();

    let mut sql = format!("SELECT {} FROM {}", returning(config), ident(&config.table));
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id LIMIT ?");
    params.push(limit(config));

    Statement { sql, params }
}

/// `SELECT` of a single id
pub fn select_by_id(config: &DictionaryConfig, id: i64) -> Statement {
    Statement {
        sql: format!(
            "SELECT {} FROM {} WHERE id = ? LIMIT ?",
            returning(config),
            ident(&config.table)
        ),
        params: vec![SqlValue::Integer(id), limit(config)],
    }
}

/// One multi-row `INSERT … RETURNING`. Absent keys insert `NULL`.
pub fn insert(config: &DictionaryConfig, payloads: &[CanonicalPayload]) -> Statement {
    let mut params = Vec::with_capacity(payloads.len() * 2);
    for payload in payloads {
        for column in [Column::Ja, Column::En] {
            params.push(payload.get(column).map(bind).unwrap_or(SqlValue::Null));
        }
    }

    let rows = vec!["(?, ?)"; payloads.len()].join(", ");
    Statement {
        sql: format!(
            "INSERT INTO {} ({}, {}) VALUES {} RETURNING {}",
            ident(&config.table),
            ident(config.key(Column::Ja)),
            ident(config.key(Column::En)),
            rows,
            returning(config)
        ),
        params,
    }
}

/// `UPDATE … RETURNING` touching only the payload's present keys
pub fn update(config: &DictionaryConfig, id: i64, payload: &CanonicalPayload) -> Statement {
    let mut params = Vec::new();
    let assignments: Vec<String> = payload
        .present()
        .map(|(column, term)| {
            params.push(bind(term));
            format!("{} = ?", ident(config.key(column)))
        })
        .collect();
    params.push(SqlValue::Integer(id));

    Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            ident(&config.table),
            assignments.join(", "),
            returning(config)
        ),
        params,
    }
}

/// `DELETE … RETURNING` of a single id
pub fn delete(config: &DictionaryConfig, id: i64) -> Statement {
    Statement {
        sql: format!(
            "DELETE FROM {} WHERE id = ? RETURNING {}",
            ident(&config.table),
            returning(config)
        ),
        params: vec![SqlValue::Integer(id)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DictionaryConfig {
        DictionaryConfig::default()
    }

    #[test]
    fn test_select_all_has_no_where() {
        let stmt = select(&config(), &FilterSpec::match_all());
        assert_eq!(
            stmt.sql,
            "SELECT id, \"ja\", \"en\" FROM \"dict\" ORDER BY id LIMIT ?"
        );
        assert_eq!(stmt.params, vec![SqlValue::Integer(256)]);
    }

    #[test]
    fn test_select_with_predicates() {
        let filter = FilterSpec::new(Predicate::Blank, Predicate::Contains("Hunter".to_string()));
        let stmt = select(&config(), &filter);
        assert_eq!(
            stmt.sql,
            "SELECT id, \"ja\", \"en\" FROM \"dict\" \
             WHERE (\"ja\" IS NULL OR \"ja\" = '') AND instr(\"en\", ?) > 0 \
             ORDER BY id LIMIT ?"
        );
        assert_eq!(
            stmt.params,
            vec![SqlValue::Text("Hunter".to_string()), SqlValue::Integer(256)]
        );
    }

    #[test]
    fn test_insert_binds_blank_and_absent_as_null() {
        let payloads = vec![
            CanonicalPayload::pair("A", ""),
            CanonicalPayload::new(None, Some(Term::from_text("B"))),
        ];
        let stmt = insert(&config(), &payloads);
        assert_eq!(
            stmt.sql,
            "INSERT INTO \"dict\" (\"ja\", \"en\") VALUES (?, ?), (?, ?) RETURNING id, \"ja\", \"en\""
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlValue::Text("A".to_string()),
                SqlValue::Null,
                SqlValue::Null,
                SqlValue::Text("B".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_sets_present_keys_only() {
        let payload = CanonicalPayload::new(None, Some(Term::Blank));
        let stmt = update(&config(), 9, &payload);
        assert_eq!(
            stmt.sql,
            "UPDATE \"dict\" SET \"en\" = ? WHERE id = ? RETURNING id, \"ja\", \"en\""
        );
        assert_eq!(stmt.params, vec![SqlValue::Null, SqlValue::Integer(9)]);
    }
}
