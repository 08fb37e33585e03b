use actix_web::HttpResponse;

use crate::dto::{ErrorResponse, ProfileResponse};
use crate::middleware::RequestPrincipal;

use cs_core::domain::Principal;

/// Handler for GET /api/v1/users/me
///
/// Returns the profile of the authenticated caller, or 401 when the
/// request carries no usable session token.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "id": "550e8400-e29b-41d4-a716-446655440000",
///     "username": "alice@example.com",
///     "role": "employee",
///     "is_verified": true,
///     "manager_id": null
/// }
/// ```
pub async fn me(principal: RequestPrincipal) -> HttpResponse {
    match principal.0 {
        Principal::Authenticated { user } => HttpResponse::Ok().json(ProfileResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            is_verified: user.is_verified,
            manager_id: user.manager_id,
        }),
        Principal::Anonymous => HttpResponse::Unauthorized().json(ErrorResponse::new(
            "unauthorized",
            "Authentication required",
        )),
    }
}
