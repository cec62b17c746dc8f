mod report;
mod status_history;
mod tracking_code;

pub use report::{CreateReport, PointFilter, Report, ReportPoint, ReportPriority, ReportStatus};
pub use status_history::{StatusHistoryEntry, StatusTransition};
pub use tracking_code::{format_tracking_code, is_valid_tracking_code};
