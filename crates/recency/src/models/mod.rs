mod batch;
mod record;
mod row;

pub use self::batch::{COLUMNS, RecencyBatch};
pub use self::record::RecencyRecord;
pub(crate) use self::row::RecencyRow;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Calendar dates are persisted as ISO-8601 `YYYY-MM-DD` text.
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
