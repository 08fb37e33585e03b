use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::dto::{AuthTokenResponse, LoginRequest};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::{AuthService, EmailNotifier, TokenService};

/// Application state that holds shared services
pub struct AppState<U, C, N>
where
    U: UserRepository,
    C: CredentialTokenRepository,
    N: EmailNotifier,
{
    pub auth_service: Arc<AuthService<U, C, N>>,
    pub token_service: Arc<TokenService>,
    pub user_repository: Arc<U>,
}

/// Handler for POST /api/v1/auth/login
///
/// Checks a username and password pair and issues a bearer session token.
/// Unknown usernames and wrong passwords produce byte-identical responses.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "alice@example.com",
///     "password": "hunter2hunter2"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJhbGciOiJIUzI1NiIs...",
///     "token_type": "Bearer",
///     "expires_in": 86400
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data
/// - 401 Unauthorized: Unknown username or wrong password
/// - 403 Forbidden: Password correct but the address is not verified
/// - 500 Internal Server Error: Database or token generation failure
pub async fn login<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialTokenRepository + 'static,
    N: EmailNotifier + 'static,
{
    // Detect language preference from request headers
    let lang = Language::from_request(&req);

    // Validate request data
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .auth_service
        .authenticate(&request.username, &request.password, Utc::now())
        .await
    {
        Ok(auth) => HttpResponse::Ok().json(AuthTokenResponse {
            access_token: auth.access_token,
            token_type: auth.token_type,
            expires_in: auth.expires_in,
        }),
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}
