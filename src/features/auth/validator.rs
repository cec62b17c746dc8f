use super::model::{AppMetadata, AuthenticatedUser};
use crate::core::error::AppError;
use crate::features::profiles::models::UserRole;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

/// Algorithms the identity provider signs access tokens with
const ACCEPTED_ALGORITHMS: &[Algorithm] = &[Algorithm::RS256, Algorithm::ES256];

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    /// Postgres role the provider assigns ("authenticated", "anon", ...)
    #[serde(rename = "role", default)]
    db_role: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        claims_to_user(token_data.claims)
    }
}

/// Turn validated claims into the session user.
///
/// Anonymous tokens are refused; a missing or unknown application role falls
/// back to citizen.
fn claims_to_user(claims: Claims) -> Result<AuthenticatedUser, AppError> {
    if claims.db_role.as_deref() == Some("anon") {
        return Err(AppError::Auth(
            "Anonymous tokens cannot access this service".to_string(),
        ));
    }

    let role = match claims.app_metadata.role.as_deref() {
        Some(raw) => raw.parse::<UserRole>().unwrap_or_else(|e| {
            tracing::warn!("Ignoring role claim for {}: {}", claims.sub, e);
            UserRole::Citizen
        }),
        None => UserRole::Citizen,
    };

    Ok(AuthenticatedUser {
        sub: claims.sub,
        email: claims.email,
        session_id: claims.session_id,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(db_role: Option<&str>, app_role: Option<&str>) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            _exp: 0,
            email: Some("user@example.test".to_string()),
            session_id: Some("session-1".to_string()),
            db_role: db_role.map(String::from),
            app_metadata: AppMetadata {
                role: app_role.map(String::from),
                provider: Some("email".to_string()),
            },
        }
    }

    #[test]
    fn test_claims_default_to_citizen() {
        let user = claims_to_user(claims(Some("authenticated"), None)).unwrap();
        assert_eq!(user.role, UserRole::Citizen);
        assert_eq!(user.sub, "user-1");
        assert_eq!(user.session_id.as_deref(), Some("session-1"));
    }

    #[test]
    fn test_claims_carry_staff_role() {
        let user = claims_to_user(claims(Some("authenticated"), Some("supervisor"))).unwrap();
        assert_eq!(user.role, UserRole::Supervisor);
        assert!(user.is_staff());
    }

    #[test]
    fn test_unknown_role_falls_back_to_citizen() {
        let user = claims_to_user(claims(Some("authenticated"), Some("mayor"))).unwrap();
        assert_eq!(user.role, UserRole::Citizen);
    }

    #[test]
    fn test_anonymous_token_rejected() {
        let err = claims_to_user(claims(Some("anon"), None)).unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }
}
