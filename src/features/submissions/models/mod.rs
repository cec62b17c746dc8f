pub mod draft;
pub mod wizard;

pub use draft::*;
pub use wizard::*;
