use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{ChangePasswordRequest, MessageResponse};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};
use crate::middleware::AuthenticatedUser;

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;

use super::AppState;

/// Handler for POST /api/v1/auth/change-password
///
/// Changes the password of the authenticated account. The current
/// password must be presented again; the session token alone is not
/// enough.
///
/// # Request Body
///
/// ```json
/// {
///     "current_password": "hunter2hunter2",
///     "new_password": "correct-horse-battery"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Password changed."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data
/// - 401 Unauthorized: Caller not authenticated, or current password wrong
pub async fn change_password<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    auth: AuthenticatedUser,
    request: web::Json<ChangePasswordRequest>,
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
        .change_password(auth.0.id, &request.current_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: match lang {
                Language::English => "Password changed.".to_string(),
                Language::Chinese => "密码已修改。".to_string(),
            },
        }),
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}
