//! Route guards.
//!
//! Access decisions are made by [`evaluate`], a pure function of the current
//! session and what the route requires. Extractors and middleware only turn
//! the decision into a response:
//!
//! | decision           | status | redirect target |
//! |--------------------|--------|-----------------|
//! | `RedirectToLogin`  | 401    | `/login`        |
//! | `RedirectToHome`   | 403    | `/`             |
//!
//! Staff are admins, supervisors and operators.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::{HOME_PATH, LOGIN_PATH};
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Staff,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

pub fn evaluate(session: Option<&AuthenticatedUser>, requirement: Requirement) -> GuardDecision {
    let Some(user) = session else {
        return GuardDecision::RedirectToLogin;
    };

    let allowed = match requirement {
        Requirement::Authenticated => true,
        Requirement::Staff => user.is_staff(),
        Requirement::Admin => user.is_admin(),
    };

    if allowed {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToHome
    }
}

/// Resolve the session user or the rejection for `requirement`
pub fn authorize(
    session: Option<&AuthenticatedUser>,
    requirement: Requirement,
) -> Result<AuthenticatedUser, AppError> {
    match (evaluate(session, requirement), session) {
        (GuardDecision::Allow, Some(user)) => Ok(user.clone()),
        _ => Err(reject(session, requirement)),
    }
}

pub fn reject(session: Option<&AuthenticatedUser>, requirement: Requirement) -> AppError {
    match evaluate(session, requirement) {
        GuardDecision::RedirectToHome => AppError::Redirect {
            status: StatusCode::FORBIDDEN,
            message: match requirement {
                Requirement::Admin => "Admin access required".to_string(),
                _ => "Staff access required".to_string(),
            },
            redirect_to: HOME_PATH.to_string(),
        },
        // Allow only reaches here when the caller had no session to hand back
        GuardDecision::RedirectToLogin | GuardDecision::Allow => AppError::Redirect {
            status: StatusCode::UNAUTHORIZED,
            message: "User not authenticated".to_string(),
            redirect_to: LOGIN_PATH.to_string(),
        },
    }
}

/// Guard for staff-only handlers (admin, supervisor, operator).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStaff(user): RequireStaff) { ... }
/// ```
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts.extensions.get::<AuthenticatedUser>(), Requirement::Staff).map(Self)
    }
}

/// Guard for admin-only handlers.
#[allow(dead_code)]
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts.extensions.get::<AuthenticatedUser>(), Requirement::Admin).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::profiles::models::UserRole;
    use crate::shared::test_helpers::{create_citizen_user, create_user, with_user};
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_missing_session_redirects_to_login() {
        for requirement in [Requirement::Authenticated, Requirement::Staff, Requirement::Admin] {
            assert_eq!(evaluate(None, requirement), GuardDecision::RedirectToLogin);
        }
    }

    #[test]
    fn test_role_matrix() {
        let cases = [
            (UserRole::Citizen, Requirement::Authenticated, GuardDecision::Allow),
            (UserRole::Citizen, Requirement::Staff, GuardDecision::RedirectToHome),
            (UserRole::Citizen, Requirement::Admin, GuardDecision::RedirectToHome),
            (UserRole::Operator, Requirement::Staff, GuardDecision::Allow),
            (UserRole::Supervisor, Requirement::Staff, GuardDecision::Allow),
            (UserRole::Supervisor, Requirement::Admin, GuardDecision::RedirectToHome),
            (UserRole::Admin, Requirement::Admin, GuardDecision::Allow),
            (UserRole::Admin, Requirement::Staff, GuardDecision::Allow),
        ];

        for (role, requirement, expected) in cases {
            let user = create_user("u", role);
            assert_eq!(
                evaluate(Some(&user), requirement),
                expected,
                "{:?} / {:?}",
                role,
                requirement
            );
        }
    }

    #[test]
    fn test_reject_carries_redirect_target() {
        match reject(None, Requirement::Staff) {
            AppError::Redirect {
                status,
                redirect_to,
                ..
            } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(redirect_to, "/login");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let citizen = create_citizen_user();
        match reject(Some(&citizen), Requirement::Staff) {
            AppError::Redirect {
                status,
                redirect_to,
                ..
            } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(redirect_to, "/");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn counting_router(hits: Arc<AtomicUsize>) -> Router {
        let staff_hits = hits.clone();
        Router::new()
            .route(
                "/mine",
                get(move |_user: AuthenticatedUser| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .route(
                "/staff",
                get(move |_staff: RequireStaff| {
                    let hits = staff_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_unauthenticated_access_is_rejected_once_and_handler_skipped() {
        let hits = Arc::new(AtomicUsize::new(0));
        let server = TestServer::new(counting_router(hits.clone())).unwrap();

        let response = server.get("/mine").await;
        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"], serde_json::json!(["redirect_to:/login"]));

        let response = server.get("/staff").await;
        response.assert_status_unauthorized();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_citizen_is_sent_home_from_staff_routes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = with_user(counting_router(hits.clone()), create_citizen_user());
        let server = TestServer::new(router).unwrap();

        server.get("/mine").await.assert_status_ok();
        let response = server.get("/staff").await;
        response.assert_status_forbidden();
        let body: serde_json::Value = response.json();
        assert_eq!(body["errors"], serde_json::json!(["redirect_to:/"]));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
