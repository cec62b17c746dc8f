mod profile;

pub use profile::{CreateProfile, UserProfile, UserRole};
