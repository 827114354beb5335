//! The `DD-MM-YYYY` date format used by clients and exports.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// Day, month and year separated by dashes, e.g. "31-01-2024".
pub const DAY_MONTH_YEAR: &[BorrowedFormatItem<'static>] =
    format_description!("[day]-[month]-[year]");

time::serde::format_description!(pub day_month_year, Date, "[day]-[month]-[year]");

/// Format `date` as `DD-MM-YYYY`.
pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DAY_MONTH_YEAR)
}
