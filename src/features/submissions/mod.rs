//! Report submission wizard.
//!
//! A draft moves through `category_select → photo_upload → location_select →
//! description → review` and ends in `submitted`. `next` only succeeds when
//! the current step is complete. Submit uploads the primary photo and writes
//! the report with its first history entry.
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | POST | `/api/drafts` |
//! | GET, DELETE | `/api/drafts/{id}` |
//! | PUT | `/api/drafts/{id}/category` |
//! | POST | `/api/drafts/{id}/photos` |
//! | DELETE | `/api/drafts/{id}/photos/{index}` |
//! | PUT | `/api/drafts/{id}/location` |
//! | PUT | `/api/drafts/{id}/description` |
//! | POST | `/api/drafts/{id}/next`, `/back`, `/submit` |
//! | POST | `/api/reports` (all fields at once) |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::SubmissionService;
pub use store::DraftStore;
