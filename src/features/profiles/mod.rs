//! User profiles.
//!
//! A profile row is created when a user registers and is keyed by the
//! identity provider's subject. Owners read and update their own profile;
//! the role is assigned by staff tooling, never by the owner.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/profiles/me` | Current user's profile |
//! | PATCH | `/api/profiles/me` | Update name and contact fields |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ProfileService, ProfileStore};
