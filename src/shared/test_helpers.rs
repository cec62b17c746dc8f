#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::profiles::models::UserRole;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_user(sub: &str, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        email: Some(format!("{}@example.test", sub)),
        session_id: Some(format!("{}-session", sub)),
        role,
    }
}

#[cfg(test)]
pub fn create_citizen_user() -> AuthenticatedUser {
    create_user("citizen-1", UserRole::Citizen)
}

#[cfg(test)]
pub fn create_operator_user() -> AuthenticatedUser {
    create_user("operator-1", UserRole::Operator)
}

/// Attach `user` to every request, standing in for the JWT middleware
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
