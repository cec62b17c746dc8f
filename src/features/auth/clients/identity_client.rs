use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::config::IdentityConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AppMetadata;

/// User record as returned by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: AppMetadata,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Token pair issued on sign-in, sign-up or refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: IdentityUser,
}

/// Sign-up either opens a session right away or waits for email confirmation
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    Session(IdentitySession),
    PendingConfirmation(IdentityUser),
}

impl SignUpOutcome {
    pub fn user(&self) -> &IdentityUser {
        match self {
            SignUpOutcome::Session(session) => &session.user,
            SignUpOutcome::PendingConfirmation(user) => user,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdentityErrorResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default, alias = "error_description", alias = "message")]
    msg: Option<String>,
}

impl IdentityErrorResponse {
    fn describe(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.error_code.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrantRequest<'a> {
    refresh_token: &'a str,
}

/// Operations the service delegates to the identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession>;

    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

/// Client for a GoTrue-compatible auth REST API
pub struct IdentityClient {
    api_url: String,
    api_key: String,
    /// Where confirmation emails send the user back to
    redirect_to: String,
    http_client: reqwest::Client,
}

impl IdentityClient {
    pub fn new(config: &IdentityConfig, frontend_url: &str) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            redirect_to: frontend_url.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> Result<reqwest::Response> {
        let response = request
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider unreachable during {}: {}", action, e);
                AppError::ExternalServiceError(format!("Failed to {}: {}", action, e))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_error_status(status, &body, action))
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        action: &str,
    ) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse identity response for {}: {}", action, e);
            AppError::ExternalServiceError(format!("Failed to parse {} response: {}", action, e))
        })
    }
}

/// Map a provider error status to the error surfaced to callers
fn map_error_status(status: StatusCode, body: &str, action: &str) -> AppError {
    let detail = serde_json::from_str::<IdentityErrorResponse>(body)
        .map(|e| e.describe())
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::BAD_REQUEST if detail.contains("Invalid login credentials") => {
            AppError::Unauthorized("Invalid credentials".to_string())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
            if detail.contains("already registered") || detail.contains("already exists") =>
        {
            AppError::Conflict("Email already registered".to_string())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(detail)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(detail),
        _ => {
            tracing::error!("Identity provider error during {}: HTTP {} - {}", action, status, body);
            AppError::ExternalServiceError(format!("Identity provider error: HTTP {}", status))
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome> {
        tracing::debug!("Signing up user: {}", email);

        let body = SignUpRequest {
            email,
            password,
            data: serde_json::json!({ "full_name": full_name }),
        };
        let request = self
            .http_client
            .post(self.url("/signup"))
            .query(&[("redirect_to", self.redirect_to.as_str())])
            .json(&body);
        let response = self.send(request, "sign up").await?;
        Self::parse(response, "sign up").await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession> {
        let request = self
            .http_client
            .post(self.url("/token?grant_type=password"))
            .json(&PasswordGrantRequest { email, password });
        let response = self.send(request, "sign in").await?;
        Self::parse(response, "sign in").await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession> {
        let request = self
            .http_client
            .post(self.url("/token?grant_type=refresh_token"))
            .json(&RefreshGrantRequest { refresh_token });
        let response = self.send(request, "refresh session").await?;
        Self::parse(response, "refresh session").await
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let request = self
            .http_client
            .post(self.url("/logout"))
            .bearer_auth(access_token);
        self.send(request, "sign out").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_outcome_with_session() {
        let raw = r#"{
            "access_token": "a", "token_type": "bearer", "expires_in": 3600,
            "refresh_token": "r",
            "user": {"id": "u-1", "email": "x@example.test", "app_metadata": {"provider": "email"}}
        }"#;
        let outcome: SignUpOutcome = serde_json::from_str(raw).unwrap();
        assert!(matches!(outcome, SignUpOutcome::Session(_)));
        assert_eq!(outcome.user().id, "u-1");
    }

    #[test]
    fn test_sign_up_outcome_pending_confirmation() {
        let raw = r#"{"id": "u-2", "email": "y@example.test", "confirmation_sent_at": "2024-01-01T00:00:00Z"}"#;
        let outcome: SignUpOutcome = serde_json::from_str(raw).unwrap();
        assert!(matches!(outcome, SignUpOutcome::PendingConfirmation(_)));
        assert_eq!(outcome.user().email.as_deref(), Some("y@example.test"));
    }

    #[test]
    fn test_error_mapping() {
        let err = map_error_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
            "sign in",
        );
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = map_error_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#,
            "sign up",
        );
        assert!(matches!(err, AppError::Conflict(_)));

        let err = map_error_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"msg":"Password should be at least 6 characters"}"#,
            "sign up",
        );
        assert!(matches!(err, AppError::Validation(_)));

        let err = map_error_status(StatusCode::SERVICE_UNAVAILABLE, "down", "sign in");
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
