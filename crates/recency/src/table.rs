//! Target table definition.
//!
//! Identifiers cannot be bound as statement parameters, so they are spliced
//! into the SQL text. Everything that ends up there is validated here, once,
//! when the definition is built.

use crate::error::{ErrorKind, Result};
use crate::models::COLUMNS;
use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

/// Schema that SQLite gives the primary database of every connection.
pub const DEFAULT_SCHEMA: &str = "main";
/// Table created by the embedded migrations.
pub const DEFAULT_TABLE: &str = "json_recency";
// PostgreSQL truncates identifiers beyond 63 bytes; refuse them everywhere.
const MAX_IDENTIFIER_LENGTH: usize = 63;

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

fn identifier(kind: &str, name: impl Into<String>) -> Result<String> {
    let name = name.into();
    if name.len() > MAX_IDENTIFIER_LENGTH || !IDENTIFIER_REGEX.is_match(&name) {
        exn::bail!(ErrorKind::Validation(format!("invalid {kind} identifier: {name:?}")));
    }
    Ok(name)
}

/// Column names of the recency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    key: String,
    date: String,
    version: String,
}
impl Default for Columns {
    fn default() -> Self {
        let [key, date, version] = COLUMNS.map(String::from);
        Self { key, date, version }
    }
}
impl Columns {
    pub fn new(key: impl Into<String>, date: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let columns = Self {
            key: identifier("key column", key)?,
            date: identifier("date column", date)?,
            version: identifier("version column", version)?,
        };
        if columns.key == columns.date || columns.key == columns.version || columns.date == columns.version {
            exn::bail!(ErrorKind::Validation("column names must be distinct".to_string()));
        }
        Ok(columns)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Where recency records live: schema, table and column names.
///
/// Built once at startup (usually from configuration) and passed by reference
/// to every [`Repository`](crate::Repository) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    schema: String,
    table: String,
    columns: Columns,
}

impl Default for TableDefinition {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            table: DEFAULT_TABLE.to_string(),
            columns: Columns::default(),
        }
    }
}

impl TableDefinition {
    /// Define a recency table using the default column names.
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        Ok(Self {
            schema: identifier("schema", schema)?,
            table: identifier("table", table)?,
            columns: Columns::default(),
        })
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// `"schema"."table"`, safe to splice into SQL.
    pub(crate) fn qualified(&self) -> String {
        format!(r#""{}"."{}""#, self.schema, self.table)
    }

    /// Opening of the multi-row upsert: target and column list. The caller
    /// appends `VALUES` rows and then [`conflict_clause`](Self::conflict_clause).
    pub(crate) fn insert_prefix(&self) -> String {
        let Columns { key, date, version } = &self.columns;
        format!(r#"INSERT INTO {} ("{key}", "{date}", "{version}") "#, self.qualified())
    }

    /// Conflict clause: overwrite the value columns, never the key.
    pub(crate) fn conflict_clause(&self) -> String {
        let Columns { key, date, version } = &self.columns;
        format!(r#" ON CONFLICT ("{key}") DO UPDATE SET "{date}" = excluded."{date}", "{version}" = excluded."{version}""#)
    }

    /// Select every row, aliased to the persisted column contract.
    pub(crate) fn select_all(&self) -> String {
        let Columns { key, date, version } = &self.columns;
        format!(
            r#"SELECT "{key}" AS json_type, "{date}" AS latest_date, "{version}" AS latest_version FROM {} ORDER BY "{key}""#,
            self.qualified()
        )
    }

    pub(crate) fn select_one(&self) -> String {
        let Columns { key, date, version } = &self.columns;
        format!(
            r#"SELECT "{key}" AS json_type, "{date}" AS latest_date, "{version}" AS latest_version FROM {} WHERE "{key}" = ?"#,
            self.qualified()
        )
    }
}

impl Display for TableDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.schema, self.table)
    }
}
