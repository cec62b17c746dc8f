//! Session handling.
//!
//! Access tokens are issued by a GoTrue-compatible identity provider and
//! verified locally against its JWKS. Sign-up, sign-in, refresh and
//! sign-out are proxied to the provider; each successful change is
//! published to the caller's `/api/auth/events` stream.

mod jwks;
mod validator;

pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod session;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
