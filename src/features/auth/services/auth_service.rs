use crate::core::error::Result;
use crate::features::auth::clients::{IdentityProvider, SignUpOutcome};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, RefreshTokenRequestDto,
    RegisterRequestDto, RegisterResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::session::{AuthEventKind, SessionEvents};
use crate::features::profiles::models::{CreateProfile, UserRole};
use crate::features::profiles::ProfileStore;
use std::sync::Arc;

/// Session lifecycle on top of the identity provider.
///
/// Every successful sign-in, refresh and sign-out is published on the
/// session event hub.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    events: Arc<SessionEvents>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        events: Arc<SessionEvents>,
    ) -> Self {
        Self {
            identity,
            profiles,
            events,
        }
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Register a new user and create their citizen profile
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<RegisterResponseDto> {
        let outcome = self
            .identity
            .sign_up(&dto.email, &dto.password, dto.full_name.as_deref())
            .await?;

        let user = outcome.user();
        self.profiles
            .create_for_new_user(&CreateProfile {
                id: user.id.clone(),
                email: user.email.clone().unwrap_or_else(|| dto.email.clone()),
                role: UserRole::Citizen,
                full_name: dto.full_name.clone(),
                phone: dto.phone.clone(),
            })
            .await?;

        tracing::info!("Registered user: {}", user.id);

        let user_dto = AuthUserDto::from(user);
        let response = match outcome {
            SignUpOutcome::Session(session) => {
                self.events
                    .publish(AuthEventKind::SignedIn, &session.user.id, None);
                RegisterResponseDto {
                    user: user_dto,
                    session: Some(AuthResponseDto::from(session).tokens),
                    requires_confirmation: false,
                }
            }
            SignUpOutcome::PendingConfirmation(_) => RegisterResponseDto {
                user: user_dto,
                session: None,
                requires_confirmation: true,
            },
        };

        Ok(response)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let session = self.identity.sign_in(&dto.email, &dto.password).await?;
        self.events
            .publish(AuthEventKind::SignedIn, &session.user.id, None);
        Ok(session.into())
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(&self, dto: RefreshTokenRequestDto) -> Result<AuthResponseDto> {
        let session = self.identity.refresh(&dto.refresh_token).await?;
        self.events
            .publish(AuthEventKind::TokenRefreshed, &session.user.id, None);
        Ok(session.into())
    }

    /// Revoke the caller's session at the provider
    pub async fn logout(&self, user: &AuthenticatedUser, access_token: &str) -> Result<()> {
        self.identity.sign_out(access_token).await?;
        self.events.publish(
            AuthEventKind::SignedOut,
            &user.sub,
            user.session_id.clone(),
        );
        tracing::info!("User signed out: {}", user.sub);
        Ok(())
    }

    /// Current session with the stored profile, if any
    pub async fn get_current_user(&self, user: AuthenticatedUser) -> Result<MeResponseDto> {
        let profile = self.profiles.find(&user.sub).await?.map(Into::into);
        Ok(MeResponseDto { user, profile })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::auth::clients::{IdentitySession, IdentityUser};
    use crate::features::auth::model::AppMetadata;
    use crate::features::profiles::models::UserProfile;
    use crate::shared::test_helpers::create_citizen_user;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use tokio::sync::broadcast::error::TryRecvError;

    const PASSWORD: &str = "correct horse";

    struct FakeIdentity {
        confirm_by_email: bool,
    }

    fn identity_user(email: &str) -> IdentityUser {
        IdentityUser {
            id: format!("sub-{}", email),
            email: Some(email.to_string()),
            app_metadata: AppMetadata::default(),
            user_metadata: serde_json::Value::Null,
        }
    }

    fn session_for(email: &str) -> IdentitySession {
        IdentitySession {
            access_token: "access".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            refresh_token: "refresh".to_string(),
            user: identity_user(email),
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_up(
            &self,
            email: &str,
            _password: &str,
            _full_name: Option<&str>,
        ) -> Result<SignUpOutcome> {
            if self.confirm_by_email {
                Ok(SignUpOutcome::PendingConfirmation(identity_user(email)))
            } else {
                Ok(SignUpOutcome::Session(session_for(email)))
            }
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession> {
            if password != PASSWORD {
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
            Ok(session_for(email))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<IdentitySession> {
            Ok(session_for("ana@example.test"))
        }

        async fn sign_out(&self, _access_token: &str) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeProfiles {
        rows: Mutex<Vec<UserProfile>>,
    }

    #[async_trait]
    impl ProfileStore for FakeProfiles {
        async fn create_for_new_user(&self, data: &CreateProfile) -> Result<UserProfile> {
            let now = Utc::now();
            let profile = UserProfile {
                id: data.id.clone(),
                full_name: data.full_name.clone(),
                email: data.email.clone(),
                role: data.role,
                phone: data.phone.clone(),
                address: None,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(profile.clone());
            Ok(profile)
        }

        async fn find(&self, user_id: &str) -> Result<Option<UserProfile>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == user_id)
                .cloned())
        }
    }

    fn setup(confirm_by_email: bool) -> (Arc<FakeProfiles>, AuthService) {
        let profiles = Arc::new(FakeProfiles::default());
        let service = AuthService::new(
            Arc::new(FakeIdentity { confirm_by_email }),
            profiles.clone(),
            Arc::new(SessionEvents::new()),
        );
        (profiles, service)
    }

    fn register_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            full_name: Some("Ana Quispe".to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_citizen_profile_and_signs_in() {
        let (profiles, service) = setup(false);
        let mut events = service.events().subscribe();

        let response = service
            .register(register_dto("ana@example.test"))
            .await
            .unwrap();
        assert!(response.session.is_some());
        assert!(!response.requires_confirmation);

        let profile = profiles.find("sub-ana@example.test").await.unwrap().unwrap();
        assert_eq!(profile.role, UserRole::Citizen);
        assert_eq!(profile.full_name.as_deref(), Some("Ana Quispe"));

        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedIn);
        assert_eq!(event.user_id, "sub-ana@example.test");
    }

    #[tokio::test]
    async fn test_register_pending_confirmation_publishes_nothing() {
        let (profiles, service) = setup(true);
        let mut events = service.events().subscribe();

        let response = service
            .register(register_dto("luis@example.test"))
            .await
            .unwrap();
        assert!(response.requires_confirmation);
        assert!(response.session.is_none());
        assert!(profiles.find("sub-luis@example.test").await.unwrap().is_some());
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_session_changes_are_published_in_order() {
        let (_profiles, service) = setup(false);
        let mut events = service.events().subscribe();

        service
            .login(LoginRequestDto {
                email: "ana@example.test".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();
        service
            .refresh_token(RefreshTokenRequestDto {
                refresh_token: "refresh".to_string(),
            })
            .await
            .unwrap();
        let user = create_citizen_user();
        service.logout(&user, "access").await.unwrap();

        let kinds: Vec<AuthEventKind> = (0..3).map(|_| events.try_recv().unwrap().kind).collect();
        assert_eq!(
            kinds,
            vec![
                AuthEventKind::SignedIn,
                AuthEventKind::TokenRefreshed,
                AuthEventKind::SignedOut
            ]
        );
    }

    #[tokio::test]
    async fn test_sign_out_event_carries_session_id() {
        let (_profiles, service) = setup(false);
        let mut events = service.events().subscribe();
        let user = create_citizen_user();

        service.logout(&user, "access").await.unwrap();

        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedOut);
        assert_eq!(event.user_id, user.sub);
        assert_eq!(event.session_id, user.session_id);
    }

    #[tokio::test]
    async fn test_failed_login_publishes_nothing() {
        let (_profiles, service) = setup(false);
        let mut events = service.events().subscribe();

        let err = service
            .login(LoginRequestDto {
                email: "ana@example.test".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_current_user_includes_profile_when_present() {
        let (profiles, service) = setup(false);
        let user = create_citizen_user();

        let me = service.get_current_user(user.clone()).await.unwrap();
        assert!(me.profile.is_none());

        profiles
            .create_for_new_user(&CreateProfile {
                id: user.sub.clone(),
                email: "citizen-1@example.test".to_string(),
                role: UserRole::Citizen,
                full_name: None,
                phone: None,
            })
            .await
            .unwrap();
        let me = service.get_current_user(user).await.unwrap();
        assert_eq!(me.profile.unwrap().id, "citizen-1");
    }
}
