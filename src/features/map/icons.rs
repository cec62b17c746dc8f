//! Marker icons drawn as SVG.
//!
//! A marker is a pin filled with the category color, labelled with the
//! category emoji and ringed with the report status color.

use crate::features::reports::models::ReportStatus;
use crate::shared::validation::HEX_COLOR_REGEX;

/// Fill used when a category has no color or an invalid one
pub const FALLBACK_COLOR: &str = "#6b7280";

const MARKER_WIDTH: u32 = 36;
const MARKER_HEIGHT: u32 = 48;

/// Category color if it is a valid `#rrggbb`, gray otherwise
pub fn marker_color(color: Option<&str>) -> &str {
    match color.map(str::trim) {
        Some(c) if HEX_COLOR_REGEX.is_match(c) => c,
        _ => FALLBACK_COLOR,
    }
}

/// Ring color for a report status; white when no status is given
pub fn status_ring_color(status: Option<ReportStatus>) -> &'static str {
    match status {
        None => "#ffffff",
        Some(ReportStatus::New) => "#3b82f6",
        Some(ReportStatus::InReview) => "#f59e0b",
        Some(ReportStatus::Assigned) => "#8b5cf6",
        Some(ReportStatus::InProgress) => "#06b6d4",
        Some(ReportStatus::Resolved) => "#22c55e",
        Some(ReportStatus::Rejected) => "#ef4444",
    }
}

/// Render a marker. `color` must already be sanitized with [`marker_color`].
pub fn marker_svg(color: &str, emoji: &str, status: Option<ReportStatus>) -> String {
    let ring = status_ring_color(status);
    let mut svg = String::with_capacity(640);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = MARKER_WIDTH,
        h = MARKER_HEIGHT
    ));
    svg.push_str(&format!(
        r#"<path d="M18 46 C18 46 3 28 3 17 A15 15 0 0 1 33 17 C33 28 18 46 18 46 Z" fill="{}" stroke="{}" stroke-width="3"/>"#,
        color, ring
    ));
    svg.push_str(r##"<circle cx="18" cy="17" r="11" fill="#ffffff" fill-opacity="0.9"/>"##);
    svg.push_str(&format!(
        r#"<text x="18" y="22" font-size="14" text-anchor="middle">{}</text>"#,
        emoji
    ));
    svg.push_str("</svg>");

    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_colors_fall_back_to_gray() {
        assert_eq!(marker_color(Some("#e67e22")), "#e67e22");
        assert_eq!(marker_color(Some("orange")), FALLBACK_COLOR);
        assert_eq!(marker_color(Some("#fff")), FALLBACK_COLOR);
        assert_eq!(marker_color(Some("#e67e22\" onload=\"x")), FALLBACK_COLOR);
        assert_eq!(marker_color(None), FALLBACK_COLOR);
    }

    #[test]
    fn test_marker_svg_contents() {
        let svg = marker_svg("#e67e22", "💡", Some(ReportStatus::Resolved));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r##"fill="#e67e22""##));
        assert!(svg.contains(r##"stroke="#22c55e""##));
        assert!(svg.contains("💡"));
    }

    #[test]
    fn test_every_status_has_distinct_ring() {
        let mut rings: Vec<&str> = ReportStatus::ALL
            .iter()
            .map(|s| status_ring_color(Some(*s)))
            .collect();
        rings.sort();
        rings.dedup();
        assert_eq!(rings.len(), ReportStatus::ALL.len());
    }
}
