use chrono::NaiveDate;

use crate::shared::constants::TRACKING_CODE_PREFIX;
use crate::shared::validation::TRACKING_CODE_REGEX;

/// The number part keeps the last four digits of the sequence
const SEQUENCE_MODULUS: i64 = 10_000;

/// Build a tracking code such as `RPT-20240315-0042` from a date and a
/// value of the global `report_tracking_seq` sequence. The sequence never
/// resets, so the number is not a per-day count; codes stay unique as long
/// as a single day sees fewer than ten thousand reports.
pub fn format_tracking_code(date: NaiveDate, sequence: i64) -> String {
    format!(
        "{}-{}-{:04}",
        TRACKING_CODE_PREFIX,
        date.format("%Y%m%d"),
        sequence.rem_euclid(SEQUENCE_MODULUS)
    )
}

pub fn is_valid_tracking_code(code: &str) -> bool {
    TRACKING_CODE_REGEX.is_match(code)
}
