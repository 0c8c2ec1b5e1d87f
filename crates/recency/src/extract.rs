//! Recency extraction from MTGJSON documents.
//!
//! Every MTGJSON file starts with the same envelope:
//!
//! ```json
//! { "meta": { "date": "2024-01-15", "version": "5.2.1+20240115" }, "data": { ... } }
//! ```
//!
//! Only `meta` is of interest here; everything else is ignored.

use crate::error::{ErrorKind, Result};
use crate::models::{DATE_FORMAT, RecencyBatch, RecencyRecord};
use exn::{OptionExt, ResultExt};
use serde::de::{Deserialize, Deserializer, Error as DeError, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt::{Formatter, Result as FmtResult};
use std::io::Read;
use time::Date;
use tracing::instrument;

const META_FIELD: &str = "meta";
const DATE_FIELD: &str = "meta.date";
const VERSION_FIELD: &str = "meta.version";
// `YYYY-MM-DD`; anything after it (a time component) is ignored.
const DATE_LENGTH: usize = 10;

/// Top-level `meta` of an MTGJSON document, deserialized without the payload.
///
/// Every other entry is skipped with [`IgnoredAny`] while parsing, so `data`
/// (hundreds of megabytes for `AllPrintings`) is never materialized. Any valid
/// JSON is accepted; a document that isn't an object simply has no `meta`.
#[derive(Default)]
struct Envelope {
    meta: Option<Value>,
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(EnvelopeVisitor)
    }
}

struct EnvelopeVisitor;

impl<'de> Visitor<'de> for EnvelopeVisitor {
    type Value = Envelope;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a JSON document")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Envelope, A::Error> {
        let mut envelope = Envelope::default();
        while let Some(key) = map.next_key::<String>()? {
            // Last one wins on duplicate keys, as when parsing into a `Value`.
            if key == META_FIELD {
                envelope.meta = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(envelope)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Envelope, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Envelope::default())
    }

    fn visit_unit<E: DeError>(self) -> std::result::Result<Envelope, E> {
        Ok(Envelope::default())
    }

    fn visit_bool<E: DeError>(self, _: bool) -> std::result::Result<Envelope, E> {
        Ok(Envelope::default())
    }

    fn visit_i64<E: DeError>(self, _: i64) -> std::result::Result<Envelope, E> {
        Ok(Envelope::default())
    }

    fn visit_u64<E: DeError>(self, _: u64) -> std::result::Result<Envelope, E> {
        Ok(Envelope::default())
    }

    fn visit_f64<E: DeError>(self, _: f64) -> std::result::Result<Envelope, E> {
        Ok(Envelope::default())
    }

    fn visit_str<E: DeError>(self, _: &str) -> std::result::Result<Envelope, E> {
        Ok(Envelope::default())
    }
}

/// Extract the recency record of an already-parsed dataset.
///
/// Returns a single-row batch so that several calls can be concatenated
/// before upserting. See [`extract_record`] for the error semantics.
pub fn extract(dataset: &Value, dataset_type: impl Into<String>) -> Result<RecencyBatch> {
    extract_record(dataset, dataset_type).map(RecencyBatch::from)
}

/// Extract a single [`RecencyRecord`] from an already-parsed dataset.
///
/// # Errors
/// - [`ErrorKind::MissingMetadata`] if `meta` is absent, `null` or not an
///   object, or if `meta.date` or `meta.version` is absent or `null`.
/// - [`ErrorKind::InvalidMetadata`] if the date is not `YYYY-MM-DD` or the
///   version is not a non-empty string.
/// - [`ErrorKind::Validation`] if the dataset type label is blank or has
///   surrounding whitespace.
#[instrument(skip_all, fields(dataset_type))]
pub fn extract_record(dataset: &Value, dataset_type: impl Into<String>) -> Result<RecencyRecord> {
    let dataset_type = dataset_type.into();
    tracing::Span::current().record("dataset_type", dataset_type.as_str());
    from_meta(dataset_type, dataset.get(META_FIELD))
}

/// Extract the recency record straight from a JSON byte stream.
///
/// Only the `meta` object is kept in memory; the rest of the document is
/// parsed and discarded. Returns a single-row batch.
///
/// # Errors
/// Same as [`extract_record`], plus [`ErrorKind::InvalidDocument`] if the
/// stream is not valid JSON.
#[instrument(skip_all, fields(dataset_type))]
pub fn extract_from_reader(reader: impl Read, dataset_type: impl Into<String>) -> Result<RecencyBatch> {
    let dataset_type = dataset_type.into();
    tracing::Span::current().record("dataset_type", dataset_type.as_str());
    let envelope: Envelope = serde_json::from_reader(reader).or_raise(|| ErrorKind::InvalidDocument)?;
    from_meta(dataset_type, envelope.meta.as_ref()).map(RecencyBatch::from)
}

fn from_meta(dataset_type: String, meta: Option<&Value>) -> Result<RecencyRecord> {
    let meta = meta
        .and_then(Value::as_object)
        .ok_or_raise(|| ErrorKind::MissingMetadata(META_FIELD))?;
    build(dataset_type, meta.get("date"), meta.get("version"))
}

fn build(dataset_type: String, date: Option<&Value>, version: Option<&Value>) -> Result<RecencyRecord> {
    // An explicit `null` is treated the same as an absent field.
    let date = date.filter(|v| !v.is_null()).ok_or_raise(|| ErrorKind::MissingMetadata(DATE_FIELD))?;
    let version = version.filter(|v| !v.is_null()).ok_or_raise(|| ErrorKind::MissingMetadata(VERSION_FIELD))?;
    let record = RecencyRecord::new(dataset_type, self::date(date)?, self::version(version)?);
    record.validate()?;
    tracing::debug!(date = %record.latest_date(), version = record.latest_version(), "Extracted dataset recency");
    Ok(record)
}

fn date(value: &Value) -> Result<Date> {
    let invalid = || ErrorKind::InvalidMetadata { field: DATE_FIELD, value: value.to_string() };
    let text = value.as_str().ok_or_raise(invalid)?.trim();
    // Accept full timestamps (`2024-01-15T08:00:00Z`) by keeping the calendar date only.
    let day = match text.get(DATE_LENGTH..DATE_LENGTH + 1) {
        Some("T" | " ") => &text[..DATE_LENGTH],
        _ => text,
    };
    Date::parse(day, DATE_FORMAT).or_raise(invalid)
}

fn version(value: &Value) -> Result<String> {
    match value.as_str().map(str::trim) {
        Some(version) if !version.is_empty() => Ok(version.to_string()),
        _ => exn::bail!(ErrorKind::InvalidMetadata { field: VERSION_FIELD, value: value.to_string() }),
    }
}
