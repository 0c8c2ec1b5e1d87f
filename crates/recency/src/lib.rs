//! Dataset recency tracking.
//!
//! Every MTGJSON file carries a top-level `meta` object describing when the
//! snapshot was published and which data model version it follows. This crate
//! turns that object into a [`RecencyRecord`] and keeps one current record per
//! dataset family in a relational table.
//!
//! # Architecture
//! - **Extraction** ([`extract`], [`extract_from_reader`]): pure, produces a
//!   single-row [`RecencyBatch`] so that several datasets can be accumulated
//!   before writing.
//! - **Upsert** ([`Repository::upsert`]): writes a whole batch inside a single
//!   transaction using `INSERT ... ON CONFLICT DO UPDATE`. The table is never
//!   created here; that is the job of the embedded migrations run by
//!   [`Database`].
//! - **Table definition** ([`TableDefinition`]): schema, table and column
//!   names, validated once at startup and passed by reference.

mod db;
pub mod error;
mod extract;
mod models;
mod repo;
mod table;

pub use crate::db::Database;
pub use crate::extract::{extract, extract_from_reader, extract_record};
pub use crate::models::{COLUMNS, RecencyBatch, RecencyRecord};
pub use crate::repo::Repository;
pub use crate::table::{Columns, DEFAULT_SCHEMA, DEFAULT_TABLE, TableDefinition};
