use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::dto::{InviteRequest, InviteResponse};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};
use crate::middleware::AuthenticatedUser;

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;
use cs_shared::utils::validation::mask_username;

use super::AppState;

/// Handler for POST /api/v1/auth/invite
///
/// Mints an invite token for a new account with a chosen role and an
/// optional manager. Only authenticated callers may invite. The token
/// is returned to the caller for delivery instead of being emailed.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "bob@example.com",
///     "role": "manager",
///     "manager_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "invite_token": "af3b2c...",
///     "expires_at": "2025-08-21T10:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data
/// - 401 Unauthorized: Caller is not authenticated
/// - 409 Conflict: Username already registered
pub async fn invite<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    auth: AuthenticatedUser,
    request: web::Json<InviteRequest>,
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
        .invite_user(
            &request.username,
            request.role,
            request.manager_id,
            Utc::now(),
        )
        .await
    {
        Ok(outcome) => {
            log::info!(
                "{} invited {} as {:?}",
                mask_username(&auth.0.username),
                mask_username(&outcome.username),
                request.role
            );
            HttpResponse::Created().json(InviteResponse {
                invite_token: outcome.token,
                expires_at: outcome.expires_at,
            })
        }
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}
