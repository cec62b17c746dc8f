pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod map;
pub mod profiles;
pub mod reports;
pub mod submissions;
