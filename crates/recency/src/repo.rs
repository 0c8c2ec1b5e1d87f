//! Repository for reading and upserting recency records.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{RecencyBatch, RecencyRecord, RecencyRow};
use crate::table::TableDefinition;
use exn::ResultExt;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::instrument;

// Three bound parameters per row; SQLite allows 32766 per statement since
// 3.32, older builds only 999. Stay below the old limit.
const ROWS_PER_STATEMENT: usize = 300;

/// Repository for the recency table.
///
/// Writes go through [`upsert`](Self::upsert), which applies a whole batch in
/// one transaction: either every row of the batch lands, or none does.
///
/// # Concurrency
/// Two processes upserting the same `json_type` at the same time resolve as
/// last-write-wins, in whatever order SQLite serializes their transactions.
/// Nothing stronger is promised.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
    dry_run: bool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), dry_run: false }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    ///
    /// In dry-run mode batches are validated but never written.
    pub fn new(pool: SqlitePool, dry_run: bool) -> Self {
        Self { pool, dry_run }
    }

    // =========================================================================
    // Upsert
    // =========================================================================

    /// Insert every record of the batch, overwriting `latest_date` and
    /// `latest_version` of rows whose key already exists.
    ///
    /// The whole batch is validated before anything is written, then applied
    /// in a single transaction. If any statement or the commit fails, the
    /// transaction is rolled back and the table is left as it was.
    ///
    /// Returns the number of rows written (or, in dry-run mode, the number
    /// that would have been written).
    ///
    /// # Errors
    /// - [`ErrorKind::Validation`] for an empty key or version, or a key that
    ///   appears twice in the batch. Nothing is written.
    /// - [`ErrorKind::Persistence`] if the store is unreachable, rejects the
    ///   statement (e.g. the table doesn't exist), or the commit fails.
    #[instrument(skip_all, fields(table = %table, rows = batch.len(), dry_run = self.dry_run))]
    pub async fn upsert(&self, table: &TableDefinition, batch: &RecencyBatch) -> Result<u64> {
        batch.validate()?;
        if batch.is_empty() {
            return Ok(0);
        }
        let rows = batch
            .iter()
            .map(RecencyRow::try_from)
            .collect::<Result<Vec<_>>>()?;
        if self.dry_run {
            tracing::info!(rows = rows.len(), "Skipping recency upsert during dry run");
            return Ok(rows.len() as u64);
        }
        // Dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Persistence)?;
        let mut written = 0;
        for chunk in rows.chunks(ROWS_PER_STATEMENT) {
            let mut builder = QueryBuilder::<Sqlite>::new(table.insert_prefix());
            builder.push_values(chunk, |mut values, row| {
                values
                    .push_bind(row.json_type.as_str())
                    .push_bind(row.latest_date.as_str())
                    .push_bind(row.latest_version.as_str());
            });
            builder.push(table.conflict_clause());
            let result = builder.build().execute(&mut *tx).await.or_raise(|| ErrorKind::Persistence)?;
            written += result.rows_affected();
        }
        tx.commit().await.or_raise(|| ErrorKind::Persistence)?;
        tracing::info!(written, "Upserted recency records");
        Ok(written)
    }

    // =========================================================================
    // Get/List
    // =========================================================================

    /// Get the current record for a dataset type, if one has ever been upserted.
    pub async fn get(&self, table: &TableDefinition, dataset_type: impl AsRef<str>) -> Result<Option<RecencyRecord>> {
        let row: Option<RecencyRow> = sqlx::query_as(&table.select_one())
            .bind(dataset_type.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Persistence)?;
        row.map(RecencyRecord::try_from).transpose()
    }

    /// List every record in the table, ordered by dataset type.
    pub async fn list(&self, table: &TableDefinition) -> Result<Vec<RecencyRecord>> {
        let rows: Vec<RecencyRow> = sqlx::query_as(&table.select_all())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Persistence)?;
        rows.into_iter().map(RecencyRecord::try_from).collect()
    }
}
