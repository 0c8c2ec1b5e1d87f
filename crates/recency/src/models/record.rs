use crate::error::{ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use time::Date;

/// How current a single dataset family is.
///
/// Fields are private: once built (usually by [`extract`](crate::extract)) a
/// record can only be read. The only way to supersede a persisted record is to
/// upsert a newer one with the same `dataset_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecencyRecord {
    /// Caller-chosen label, e.g. `AllPrintings`. Persisted as `json_type`.
    dataset_type: String,
    /// Publication date reported by the dataset's `meta.date`.
    latest_date: Date,
    /// Data model version reported by the dataset's `meta.version`.
    latest_version: String,
}

impl RecencyRecord {
    pub fn new(dataset_type: impl Into<String>, latest_date: Date, latest_version: impl Into<String>) -> Self {
        Self {
            dataset_type: dataset_type.into(),
            latest_date,
            latest_version: latest_version.into(),
        }
    }

    pub fn dataset_type(&self) -> &str {
        &self.dataset_type
    }

    pub fn latest_date(&self) -> Date {
        self.latest_date
    }

    pub fn latest_version(&self) -> &str {
        &self.latest_version
    }

    /// Check that every required field carries a usable value.
    ///
    /// The key must not be blank and must not carry surrounding whitespace
    /// (`"AllPrintings "` would silently become a second row).
    pub fn validate(&self) -> Result<()> {
        if self.dataset_type.trim().is_empty() {
            exn::bail!(ErrorKind::Validation("json_type must not be empty".to_string()));
        }
        if self.dataset_type.trim() != self.dataset_type {
            exn::bail!(ErrorKind::Validation(format!(
                "json_type has surrounding whitespace: {:?}",
                self.dataset_type
            )));
        }
        if self.latest_version.trim().is_empty() {
            exn::bail!(ErrorKind::Validation(format!(
                "latest_version must not be empty (json_type {})",
                self.dataset_type
            )));
        }
        Ok(())
    }
}

impl Display for RecencyRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {} (v{})", self.dataset_type, self.latest_date, self.latest_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    #[test]
    fn test_accessors() {
        let record = RecencyRecord::new("AllPrintings", date!(2024 - 01 - 15), "5.2.1");
        assert_eq!(record.dataset_type(), "AllPrintings");
        assert_eq!(record.latest_date(), date!(2024 - 01 - 15));
        assert_eq!(record.latest_version(), "5.2.1");
        assert_eq!(record.to_string(), "AllPrintings 2024-01-15 (v5.2.1)");
    }

    #[rstest]
    #[case("AllPrintings", "5.2.1", true)]
    #[case("SetList", "5.2.2+20240115", true)]
    #[case("", "5.2.1", false)]
    #[case("   ", "5.2.1", false)]
    #[case(" AllPrintings", "5.2.1", false)]
    #[case("AllPrintings", "", false)]
    #[case("AllPrintings", "  ", false)]
    fn test_validate(#[case] dataset_type: &str, #[case] version: &str, #[case] valid: bool) {
        let record = RecencyRecord::new(dataset_type, date!(2024 - 01 - 15), version);
        assert_eq!(record.validate().is_ok(), valid);
    }

    #[test]
    fn test_validate_reports_validation_kind() {
        let record = RecencyRecord::new("", date!(2024 - 01 - 15), "5.2.1");
        let err = record.validate().unwrap_err();
        assert!(matches!(*err, ErrorKind::Validation(_)));
    }
}
