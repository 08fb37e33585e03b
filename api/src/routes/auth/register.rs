use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::dto::{MessageResponse, RegisterRequest};
use crate::handlers::error::{handle_domain_error_with_lang, handle_validation_errors, Language};

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an unverified account and emails it a verification link.
/// The account cannot log in until the link is redeemed.
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
/// ## Success (201 Created)
/// ```json
/// {
///     "message": "Account created. Check your inbox for the verification link."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid request data
/// - 409 Conflict: Username already registered
/// - 503 Service Unavailable: Registration disabled, or the email could not be sent
pub async fn register<U, C, N>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, N>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.username, &request.password, Utc::now())
        .await
    {
        Ok(()) => HttpResponse::Created().json(MessageResponse {
            message: match lang {
                Language::English => {
                    "Account created. Check your inbox for the verification link.".to_string()
                }
                Language::Chinese => "账户已创建。请查收邮箱中的验证链接。".to_string(),
            },
        }),
        Err(error) => handle_domain_error_with_lang(error, lang),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_bad_address() {
        let request = RegisterRequest {
            username: "not-an-address".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let request = RegisterRequest {
            username: "alice@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        let request = RegisterRequest {
            username: "alice@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
