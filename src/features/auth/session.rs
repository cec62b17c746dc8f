use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

impl AuthEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEventKind::SignedIn => "signed_in",
            AuthEventKind::SignedOut => "signed_out",
            AuthEventKind::TokenRefreshed => "token_refreshed",
        }
    }
}

/// Session change for one user
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// In-process fan-out of auth events to subscribed clients
pub struct SessionEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    pub fn publish(&self, kind: AuthEventKind, user_id: &str, session_id: Option<String>) {
        let event = AuthEvent {
            kind,
            user_id: user_id.to_string(),
            session_id,
            occurred_at: Utc::now(),
        };

        // No subscribers is fine
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::debug!(
            "Auth event {} for {} delivered to {} subscribers",
            kind.as_str(),
            user_id,
            delivered
        );
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        events.publish(AuthEventKind::SignedIn, "u-1", Some("s-1".into()));
        events.publish(AuthEventKind::TokenRefreshed, "u-1", Some("s-1".into()));
        events.publish(AuthEventKind::SignedOut, "u-1", None);

        assert_eq!(rx.recv().await.unwrap().kind, AuthEventKind::SignedIn);
        assert_eq!(rx.recv().await.unwrap().kind, AuthEventKind::TokenRefreshed);
        let last = rx.recv().await.unwrap();
        assert_eq!(last.kind, AuthEventKind::SignedOut);
        assert!(last.session_id.is_none());
    }

    #[test]
    fn test_publish_without_subscribers_does_not_fail() {
        let events = SessionEvents::new();
        events.publish(AuthEventKind::SignedIn, "u-1", None);
    }

    #[test]
    fn test_event_kind_serializes_snake_case() {
        let json = serde_json::to_value(AuthEventKind::TokenRefreshed).unwrap();
        assert_eq!(json, "token_refreshed");
    }
}
