use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::dto::{AcceptInviteRequest, MessageResponse};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;

use super::AppState;

/// Handler for POST /api/v1/auth/accept-invite
///
/// Redeems an invite token. The invitee picks a password and receives
/// the role and manager recorded on the token.
///
/// # Request Body
///
/// ```json
/// {
///     "token": "af3b2c...",
///     "password": "correct-horse-battery"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Invite accepted. You can now log in."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data, or the token has expired
/// - 404 Not Found: Token unknown or already used
pub async fn accept_invite<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    request: web::Json<AcceptInviteRequest>,
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
        .accept_invite(&request.token, &request.password, Utc::now())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: match lang {
                Language::English => "Invite accepted. You can now log in.".to_string(),
                Language::Chinese => "邀请已接受，现在可以登录。".to_string(),
            },
        }),
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}
