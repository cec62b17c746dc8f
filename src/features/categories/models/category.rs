use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Label used when a category has no icon or an unknown one
pub const FALLBACK_EMOJI: &str = "📍";

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Emoji key, e.g. "pothole" or "lightbulb"
    pub icon: Option<String>,
    /// Hex color such as "#e67e22"
    pub color: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn emoji(&self) -> &'static str {
        icon_emoji(self.icon.as_deref())
    }
}

/// Resolve an icon key to the emoji drawn on markers and pickers
pub fn icon_emoji(key: Option<&str>) -> &'static str {
    match key.map(str::trim) {
        Some("pothole") | Some("road") => "🕳️",
        Some("lightbulb") | Some("lighting") => "💡",
        Some("trash") | Some("garbage") => "🗑️",
        Some("droplet") | Some("water") => "💧",
        Some("tree") => "🌳",
        Some("traffic") | Some("car") => "🚦",
        Some("warning") => "⚠️",
        _ => FALLBACK_EMOJI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_emoji_known_keys() {
        assert_eq!(icon_emoji(Some("pothole")), "🕳️");
        assert_eq!(icon_emoji(Some("lightbulb")), "💡");
        assert_eq!(icon_emoji(Some(" droplet ")), "💧");
    }

    #[test]
    fn test_icon_emoji_falls_back_to_pin() {
        assert_eq!(icon_emoji(Some("unicorn")), FALLBACK_EMOJI);
        assert_eq!(icon_emoji(Some("")), FALLBACK_EMOJI);
        assert_eq!(icon_emoji(None), FALLBACK_EMOJI);
    }
}
