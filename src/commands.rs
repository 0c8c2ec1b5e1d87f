use crate::cli::{EmptiesArgs, PurchaseUrlsArgs, RecencyArgs, StructureArgs};
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use mtgetl_config::Config;
use mtgetl_recency::{Database, RecencyBatch, Repository, TableDefinition, extract_from_reader};
use mtgetl_setlist::product_urls;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;

// =============================================================================
// Recency
// =============================================================================

pub async fn recency(config: &Config, args: &RecencyArgs, out: &mut impl Write) -> Result<()> {
    let table = config.recency.table_definition().or_raise(|| ErrorKind::Config)?;
    let batch = collect_batch(&config.datasets)?;
    let db = Database::connect(&config.database.path).await.or_raise(|| ErrorKind::Recency)?;
    let outcome = record(&db, &table, &batch, args, out).await;
    db.close().await;
    outcome
}

/// Read only the `meta` object of each configured dataset.
#[instrument(skip_all, fields(datasets = datasets.len()))]
fn collect_batch(datasets: &BTreeMap<String, PathBuf>) -> Result<RecencyBatch> {
    if datasets.is_empty() {
        tracing::warn!("No datasets configured, nothing to record");
    }
    datasets
        .iter()
        .map(|(label, path)| {
            let failed = || ErrorKind::Dataset(path.display().to_string());
            let reader = mtgetl_dataset::open(path).or_raise(failed)?;
            extract_from_reader(reader, label).or_raise(failed)
        })
        .collect()
}

async fn record(
    db: &Database,
    table: &TableDefinition,
    batch: &RecencyBatch,
    args: &RecencyArgs,
    out: &mut impl Write,
) -> Result<()> {
    let repo = Repository::new(db.pool().clone(), args.dry_run);
    let written = repo.upsert(table, batch).await.or_raise(|| ErrorKind::Recency)?;
    tracing::info!(%table, written, dry_run = args.dry_run, "Recency table updated");
    if args.show {
        for record in repo.list(table).await.or_raise(|| ErrorKind::Recency)? {
            writeln!(out, "{record}").or_raise(|| ErrorKind::Output)?;
        }
    }
    Ok(())
}

// =============================================================================
// Inspection
// =============================================================================

fn load(path: &Path, pointer: Option<&str>) -> Result<serde_json::Value> {
    let failed = || ErrorKind::Dataset(path.display().to_string());
    match pointer {
        Some(pointer) => mtgetl_dataset::load_pointer(path, pointer).or_raise(failed),
        None => mtgetl_dataset::load(path).or_raise(failed),
    }
}

pub fn structure(args: &StructureArgs, out: &mut impl Write) -> Result<()> {
    let value = load(&args.file, args.pointer.as_deref())?;
    let written = match args.summary {
        true => mtgetl_inspect::write_summary(&mtgetl_inspect::summarize(&value), out),
        false => mtgetl_inspect::print_tree(&value, args.max_depth, out),
    };
    written.or_raise(|| ErrorKind::Output)
}

pub fn empties(args: &EmptiesArgs, out: &mut impl Write) -> Result<()> {
    let value = load(&args.file, Some(&args.pointer))?;
    let rows = value
        .as_array()
        .ok_or_raise(|| ErrorKind::NotTabular(args.pointer.clone()))?;
    let summary = mtgetl_inspect::empty_value_summary(rows);
    mtgetl_inspect::write_empty_summary(&summary, out).or_raise(|| ErrorKind::Output)
}

pub fn purchase_urls(args: &PurchaseUrlsArgs, out: &mut impl Write) -> Result<()> {
    let set_list = load(&args.file, None)?;
    let [card_kingdom, tcg_player] = mtgetl_setlist::COLUMNS;
    writeln!(out, "SET_CODE\tNAME\t{card_kingdom}\t{tcg_player}").or_raise(|| ErrorKind::Output)?;
    for product in product_urls(&set_list) {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            product.set_code,
            product.name,
            product.urls.card_kingdom.as_deref().unwrap_or_default(),
            product.urls.tcg_player.as_deref().unwrap_or_default(),
        )
        .or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}
