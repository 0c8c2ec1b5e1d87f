use super::{DATE_FORMAT, RecencyRecord};
use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::Date;

#[derive(sqlx::FromRow)]
pub(crate) struct RecencyRow {
    pub(crate) json_type: String,
    pub(crate) latest_date: String,
    pub(crate) latest_version: String,
}
impl TryFrom<&RecencyRecord> for RecencyRow {
    type Error = Error;
    fn try_from(record: &RecencyRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            json_type: record.dataset_type().to_string(),
            latest_date: record.latest_date().format(DATE_FORMAT).or_raise(|| ErrorKind::InvalidData("latest_date"))?,
            latest_version: record.latest_version().to_string(),
        })
    }
}
impl TryFrom<RecencyRow> for RecencyRecord {
    type Error = Error;
    fn try_from(row: RecencyRow) -> Result<Self, Self::Error> {
        let latest_date = Date::parse(&row.latest_date, DATE_FORMAT).or_raise(|| ErrorKind::InvalidData("latest_date"))?;
        Ok(RecencyRecord::new(row.json_type, latest_date, row.latest_version))
    }
}
