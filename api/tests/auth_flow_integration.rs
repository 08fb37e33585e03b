//! End-to-end tests for the account lifecycle endpoints
//!
//! The whole HTTP surface runs against in-memory stores and a recording
//! notifier, so every flow from registration to password change can be
//! exercised without a database.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::RwLock;
    use uuid::Uuid;

    use cs_api::app::create_app;
    use cs_api::routes::auth::AppState;
    use cs_core::domain::{CredentialToken, CredentialTokenKind, User};
    use cs_core::errors::{AuthError, DomainError, TokenError};
    use cs_core::repositories::{CredentialTokenRepository, UserRepository};
    use cs_core::services::{
        AuthService, AuthServiceConfig, CredentialTokenConfig, CredentialTokenService,
        EmailNotifier, SigningKey, TokenService, TokenServiceConfig,
    };

    // 32 bytes, base64-encoded
    const TEST_SECRET: &str = "dGhpcnR5LXR3by1ieXRlcy1vZi10ZXN0LXNlY3JldCE=";

    struct InMemoryUserRepository {
        rows: RwLock<Vec<User>>,
    }

    impl InMemoryUserRepository {
        fn new() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
            let rows = self.rows.read().await;
            Ok(rows.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
            let rows = self.rows.read().await;
            Ok(rows.iter().find(|u| u.id == id).cloned())
        }

        async fn save(&self, user: User) -> Result<User, DomainError> {
            let mut rows = self.rows.write().await;
            if let Some(existing) = rows.iter_mut().find(|u| u.id == user.id) {
                *existing = user.clone();
            } else {
                if rows.iter().any(|u| u.username == user.username) {
                    return Err(DomainError::Auth(AuthError::UserAlreadyExists));
                }
                rows.push(user.clone());
            }
            Ok(user)
        }

        async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
            let rows = self.rows.read().await;
            Ok(rows.iter().any(|u| u.username == username))
        }
    }

    struct InMemoryCredentialTokenRepository {
        rows: RwLock<HashMap<(CredentialTokenKind, String), CredentialToken>>,
    }

    impl InMemoryCredentialTokenRepository {
        fn new() -> Self {
            Self {
                rows: RwLock::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl CredentialTokenRepository for InMemoryCredentialTokenRepository {
        async fn save(&self, token: CredentialToken) -> Result<CredentialToken, DomainError> {
            let mut rows = self.rows.write().await;
            let key = (token.kind, token.token.clone());
            if rows.contains_key(&key) {
                return Err(DomainError::Token(TokenError::GenerationFailed));
            }
            rows.insert(key, token.clone());
            Ok(token)
        }

        async fn find_by_token(
            &self,
            kind: CredentialTokenKind,
            token: &str,
        ) -> Result<Option<CredentialToken>, DomainError> {
            let rows = self.rows.read().await;
            Ok(rows.get(&(kind, token.to_string())).cloned())
        }

        async fn consume(
            &self,
            kind: CredentialTokenKind,
            token: &str,
        ) -> Result<bool, DomainError> {
            let mut rows = self.rows.write().await;
            Ok(rows.remove(&(kind, token.to_string())).is_some())
        }

        async fn delete_expired(
            &self,
            kind: CredentialTokenKind,
            now: DateTime<Utc>,
        ) -> Result<u64, DomainError> {
            let mut rows = self.rows.write().await;
            let before = rows.len();
            rows.retain(|key, row| key.0 != kind || !row.is_expired_at(now));
            Ok((before - rows.len()) as u64)
        }
    }

    // Notifier that records every outbound link instead of sending it
    struct RecordingNotifier {
        verification: RwLock<Vec<(String, String)>>,
        resets: RwLock<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                verification: RwLock::new(Vec::new()),
                resets: RwLock::new(Vec::new()),
            }
        }

        async fn last_verification_link(&self) -> Option<String> {
            self.verification
                .read()
                .await
                .last()
                .map(|(_, link)| link.clone())
        }

        async fn last_reset_link(&self) -> Option<String> {
            self.resets.read().await.last().map(|(_, link)| link.clone())
        }
    }

    #[async_trait]
    impl EmailNotifier for RecordingNotifier {
        async fn send_verification_email(
            &self,
            address: &str,
            link: &str,
        ) -> Result<(), DomainError> {
            self.verification
                .write()
                .await
                .push((address.to_string(), link.to_string()));
            Ok(())
        }

        async fn send_reset_password_email(
            &self,
            address: &str,
            link: &str,
        ) -> Result<(), DomainError> {
            self.resets
                .write()
                .await
                .push((address.to_string(), link.to_string()));
            Ok(())
        }
    }

    struct TestBackend {
        state: web::Data<
            AppState<InMemoryUserRepository, InMemoryCredentialTokenRepository, RecordingNotifier>,
        >,
        notifier: Arc<RecordingNotifier>,
        tokens: Arc<InMemoryCredentialTokenRepository>,
    }

    fn backend_full(
        token_config: CredentialTokenConfig,
        auth_config: AuthServiceConfig,
    ) -> TestBackend {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(InMemoryCredentialTokenRepository::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let token_service = Arc::new(TokenService::new(
            SigningKey::from_base64_secret(TEST_SECRET).unwrap(),
            TokenServiceConfig::with_session_ttl_ms(60_000),
        ));
        let credential_tokens = Arc::new(CredentialTokenService::new(tokens.clone(), token_config));
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            credential_tokens,
            token_service.clone(),
            notifier.clone(),
            auth_config,
        ));

        TestBackend {
            state: web::Data::new(AppState {
                auth_service,
                token_service,
                user_repository: users,
            }),
            notifier,
            tokens,
        }
    }

    fn backend() -> TestBackend {
        backend_full(CredentialTokenConfig::default(), AuthServiceConfig::default())
    }

    /// Registers and verifies an account through the service layer
    async fn seed_verified_user(backend: &TestBackend, username: &str, password: &str) {
        backend
            .state
            .auth_service
            .register(username, password, Utc::now())
            .await
            .unwrap();
        let link = backend.notifier.last_verification_link().await.unwrap();
        backend
            .state
            .auth_service
            .verify_email(token_from_link(&link), Utc::now())
            .await
            .unwrap();
    }

    fn token_from_link(link: &str) -> &str {
        link.split_once("?token=").map(|(_, token)| token).unwrap()
    }

    fn login_request(username: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "username": username,
                "password": password,
            }))
    }

    #[actix_rt::test]
    async fn test_registration_verification_and_login_flow() {
        let backend = backend();
        let app = test::init_service(create_app(backend.state.clone())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "alice@example.com",
                    "password": "hunter2hunter2",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // The account exists but cannot log in yet
        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "account_not_verified");

        // Redeem the emailed verification token
        let link = backend.notifier.last_verification_link().await.unwrap();
        let token = token_from_link(&link).to_string();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/verify-email")
                .set_json(serde_json::json!({ "token": token }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Login now issues a bearer session token
        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["token_type"], "Bearer");
        let access_token = body["access_token"].as_str().unwrap().to_string();

        // The session token resolves to the account's profile
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(("Authorization", format!("Bearer {}", access_token)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], "alice@example.com");
        assert_eq!(body["role"], "employee");

        // The verification token was burned on first use
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/verify-email")
                .set_json(serde_json::json!({ "token": token }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let backend = backend();
        seed_verified_user(&backend, "alice@example.com", "hunter2hunter2").await;
        let app = test::init_service(create_app(backend.state.clone())).await;

        let unknown = test::call_service(
            &app,
            login_request("ghost@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        let unknown_body: serde_json::Value = test::read_body_json(unknown).await;

        let wrong = test::call_service(
            &app,
            login_request("alice@example.com", "wrong-password-1").to_request(),
        )
        .await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        let wrong_body: serde_json::Value = test::read_body_json(wrong).await;

        assert_eq!(unknown_body, wrong_body);
    }

    #[actix_rt::test]
    async fn test_password_reset_flow() {
        let backend = backend();
        seed_verified_user(&backend, "alice@example.com", "hunter2hunter2").await;
        let app = test::init_service(create_app(backend.state.clone())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/forgot-password")
                .set_json(serde_json::json!({ "username": "alice@example.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let link = backend.notifier.last_reset_link().await.unwrap();
        let token = token_from_link(&link).to_string();

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/reset-password")
                .set_json(serde_json::json!({
                    "token": token,
                    "new_password": "correct-horse-battery",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // The old password no longer works, the new one does
        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "correct-horse-battery").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // The reset token was burned
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/reset-password")
                .set_json(serde_json::json!({
                    "token": token,
                    "new_password": "another-password-9",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_expired_verification_token_is_rejected_and_left_in_place() {
        let backend = backend_full(
            CredentialTokenConfig {
                verification_ttl_ms: 0,
                ..CredentialTokenConfig::default()
            },
            AuthServiceConfig::default(),
        );
        let app = test::init_service(create_app(backend.state.clone())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "alice@example.com",
                    "password": "hunter2hunter2",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let link = backend.notifier.last_verification_link().await.unwrap();
        let token = token_from_link(&link).to_string();

        // A zero lifetime expires the token the instant it is minted
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/verify-email")
                .set_json(serde_json::json!({ "token": token }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "token_expired");

        // The expired row stays for the janitor and the account stays
        // unverified
        let row = backend
            .tokens
            .find_by_token(CredentialTokenKind::EmailVerification, &token)
            .await
            .unwrap();
        assert!(row.is_some());

        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_invite_flow() {
        let backend = backend();
        seed_verified_user(&backend, "boss@example.com", "hunter2hunter2").await;
        let app = test::init_service(create_app(backend.state.clone())).await;

        // Inviting without a session is refused
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/invite")
                .set_json(serde_json::json!({
                    "username": "bob@example.com",
                    "role": "manager",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Log in and look up our own id
        let resp = test::call_service(
            &app,
            login_request("boss@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        let access_token = body["access_token"].as_str().unwrap().to_string();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(("Authorization", format!("Bearer {}", access_token)))
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        let boss_id = body["id"].as_str().unwrap().to_string();

        // Mint the invite
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/invite")
                .insert_header(("Authorization", format!("Bearer {}", access_token)))
                .set_json(serde_json::json!({
                    "username": "bob@example.com",
                    "role": "manager",
                    "manager_id": boss_id,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let invite_token = body["invite_token"].as_str().unwrap().to_string();

        // The invitee cannot log in before accepting
        let resp = test::call_service(
            &app,
            login_request("bob@example.com", "chosen-password-7").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Accept, then log in; the invited role and manager stick
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/accept-invite")
                .set_json(serde_json::json!({
                    "token": invite_token,
                    "password": "chosen-password-7",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            login_request("bob@example.com", "chosen-password-7").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let bob_token = body["access_token"].as_str().unwrap().to_string();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(("Authorization", format!("Bearer {}", bob_token)))
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["role"], "manager");
        assert_eq!(body["manager_id"], boss_id.as_str());
    }

    #[actix_rt::test]
    async fn test_change_password_flow() {
        let backend = backend();
        seed_verified_user(&backend, "alice@example.com", "hunter2hunter2").await;
        let app = test::init_service(create_app(backend.state.clone())).await;

        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        let access_token = body["access_token"].as_str().unwrap().to_string();

        // A live session alone is not enough
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/change-password")
                .insert_header(("Authorization", format!("Bearer {}", access_token)))
                .set_json(serde_json::json!({
                    "current_password": "not-my-password",
                    "new_password": "correct-horse-battery",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/change-password")
                .insert_header(("Authorization", format!("Bearer {}", access_token)))
                .set_json(serde_json::json!({
                    "current_password": "hunter2hunter2",
                    "new_password": "correct-horse-battery",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "hunter2hunter2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "correct-horse-battery").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_request_validation_failures() {
        let backend = backend();
        let app = test::init_service(create_app(backend.state.clone())).await;

        // Not an email address
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "not-an-address",
                    "password": "hunter2hunter2",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["details"]["username"].is_array());

        // Password too short
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "alice@example.com",
                    "password": "short",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Empty login password
        let resp = test::call_service(
            &app,
            login_request("alice@example.com", "").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_registration_can_be_disabled() {
        let backend = backend_full(
            CredentialTokenConfig::default(),
            AuthServiceConfig {
                allow_registration: false,
                ..AuthServiceConfig::default()
            },
        );
        let app = test::init_service(create_app(backend.state.clone())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "alice@example.com",
                    "password": "hunter2hunter2",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "registration_disabled");
    }
}
