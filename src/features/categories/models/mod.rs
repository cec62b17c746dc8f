mod category;

pub use category::{icon_emoji, Category, FALLBACK_EMOJI};
