use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::Category;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Emoji resolved from `icon`
    pub emoji: String,
    pub color: Option<String>,
    pub display_order: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        let emoji = c.emoji().to_string();
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            icon: c.icon,
            emoji,
            color: c.color,
            display_order: c.display_order,
        }
    }
}
