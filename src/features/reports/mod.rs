//! Citizen reports.
//!
//! | Method | Endpoint | Access |
//! |--------|----------|--------|
//! | GET | `/api/reports` | owner |
//! | GET | `/api/reports/{id}` | owner or staff |
//! | GET | `/api/reports/{id}/history` | owner or staff |
//! | PATCH | `/api/reports/{id}/status` | staff |
//! | GET | `/api/reports/track/{tracking_code}` | public |
//!
//! Reports are created through the submission flow (`features::submissions`).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use repository::{PgReportRepository, ReportRepository};
pub use services::ReportService;
