use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::dto::{MessageResponse, ResetPasswordRequest};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;

use super::AppState;

/// Handler for POST /api/v1/auth/reset-password
///
/// Redeems a password reset token and stores the new password. The
/// token is burned on success; an expired token changes nothing.
///
/// # Request Body
///
/// ```json
/// {
///     "token": "af3b2c...",
///     "new_password": "correct-horse-battery"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Password has been reset. You can now log in with the new password."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data, or the token has expired
/// - 404 Not Found: Token unknown or already used
pub async fn reset_password<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    request: web::Json<ResetPasswordRequest>,
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
        .reset_password(&request.token, &request.new_password, Utc::now())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: match lang {
                Language::English => {
                    "Password has been reset. You can now log in with the new password."
                        .to_string()
                }
                Language::Chinese => "密码已重置，现在可以使用新密码登录。".to_string(),
            },
        }),
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}
