use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    New,
    InReview,
    Assigned,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 6] = [
        ReportStatus::New,
        ReportStatus::InReview,
        ReportStatus::Assigned,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Rejected,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Rejected)
    }

    /// Position along the forward path; `None` for rejected
    fn rank(&self) -> Option<u8> {
        match self {
            ReportStatus::New => Some(0),
            ReportStatus::InReview => Some(1),
            ReportStatus::Assigned => Some(2),
            ReportStatus::InProgress => Some(3),
            ReportStatus::Resolved => Some(4),
            ReportStatus::Rejected => None,
        }
    }

    /// Forward moves (skipping allowed) or rejection, never out of a terminal state
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        if self.is_terminal() {
            return false;
        }

        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(current), Some(target)) => target > current,
            (None, Some(_)) => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::New => "new",
            ReportStatus::InReview => "in_review",
            ReportStatus::Assigned => "assigned",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown report status '{}'", s))
    }
}

/// Report priority enum matching database enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "report_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl ReportPriority {
    /// Intensity used for the heatmap layer
    pub fn heat_weight(&self) -> f64 {
        match self {
            ReportPriority::Low => 0.4,
            ReportPriority::Medium => 0.6,
            ReportPriority::High => 0.8,
            ReportPriority::Urgent => 1.0,
        }
    }
}

impl std::fmt::Display for ReportPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportPriority::Low => write!(f, "low"),
            ReportPriority::Medium => write!(f, "medium"),
            ReportPriority::High => write!(f, "high"),
            ReportPriority::Urgent => write!(f, "urgent"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub tracking_code: String,
    pub category_id: Uuid,
    /// Owner's identity subject
    pub user_id: String,
    pub description: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a report; the tracking code is allocated at insert time
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub user_id: String,
    pub category_id: Uuid,
    pub description: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    pub priority: ReportPriority,
}

/// Report projection used by the map layers
#[derive(Debug, Clone, FromRow)]
pub struct ReportPoint {
    pub id: Uuid,
    pub tracking_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub category_slug: String,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
}

/// Filter for map point queries
#[derive(Debug, Clone, Default)]
pub struct PointFilter {
    pub category_slug: Option<String>,
    pub status: Option<ReportStatus>,
    pub exclude_rejected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(ReportStatus::New.can_transition_to(ReportStatus::InReview));
        assert!(ReportStatus::InReview.can_transition_to(ReportStatus::Assigned));
        assert!(ReportStatus::Assigned.can_transition_to(ReportStatus::InProgress));
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Resolved));
        assert!(ReportStatus::New.can_transition_to(ReportStatus::Resolved));
    }

    #[test]
    fn test_backward_and_same_transitions_rejected() {
        assert!(!ReportStatus::InProgress.can_transition_to(ReportStatus::New));
        assert!(!ReportStatus::Assigned.can_transition_to(ReportStatus::Assigned));
    }

    #[test]
    fn test_rejection_from_any_open_state() {
        for status in [
            ReportStatus::New,
            ReportStatus::InReview,
            ReportStatus::Assigned,
            ReportStatus::InProgress,
        ] {
            assert!(status.can_transition_to(ReportStatus::Rejected), "{}", status);
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in ReportStatus::ALL {
            assert!(!ReportStatus::Resolved.can_transition_to(next));
            assert!(!ReportStatus::Rejected.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in ReportStatus::ALL {
            assert_eq!(status.to_string().parse::<ReportStatus>().unwrap(), status);
        }
        assert!("closed".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_heat_weights() {
        assert_eq!(ReportPriority::Low.heat_weight(), 0.4);
        assert_eq!(ReportPriority::default().heat_weight(), 0.6);
        assert_eq!(ReportPriority::High.heat_weight(), 0.8);
        assert_eq!(ReportPriority::Urgent.heat_weight(), 1.0);
    }
}
