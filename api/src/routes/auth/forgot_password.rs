use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::dto::{ForgotPasswordRequest, MessageResponse};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;

use super::AppState;

/// Handler for POST /api/v1/auth/forgot-password
///
/// Mints a password reset token for the account and emails the reset
/// link to it.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "alice@example.com"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Password reset link sent. Check your inbox."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data
/// - 404 Not Found: No account with that address
/// - 503 Service Unavailable: The email could not be sent
pub async fn forgot_password<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    request: web::Json<ForgotPasswordRequest>,
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
        .forgot_password(&request.username, Utc::now())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: match lang {
                Language::English => "Password reset link sent. Check your inbox.".to_string(),
                Language::Chinese => "重置链接已发送，请查收邮箱。".to_string(),
            },
        }),
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}
