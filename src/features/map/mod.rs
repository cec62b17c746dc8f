//! Public map data.
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | GET | `/api/map/points?mode=markers\|heatmap&category=&status=` |
//! | GET | `/api/map/icons/{slug}?status=` |

pub mod dtos;
pub mod handlers;
pub mod icons;
pub mod routes;
pub mod services;

pub use services::MapService;
