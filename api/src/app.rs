//! Application factory
//!
//! Builds the Actix-web application from the shared state: routes,
//! request logging, and the session gate around the API scope.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpResponse,
};

use crate::middleware::SessionAuth;
use crate::routes::auth::{
    accept_invite::accept_invite, change_password::change_password,
    forgot_password::forgot_password, invite::invite, login::login, register::register,
    reset_password::reset_password, verify_email::verify_email, AppState,
};
use crate::routes::users;

use cs_core::repositories::{CredentialTokenRepository, UserRepository};
use cs_core::services::EmailNotifier;

/// Create and configure the application with all dependencies
pub fn create_app<U, C, N>(
    app_state: web::Data<AppState<U, C, N>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    C: CredentialTokenRepository + 'static,
    N: EmailNotifier + 'static,
{
    // The gate runs on every /api/v1 request and never rejects on its
    // own; handlers decide what anonymous callers may do.
    let session_auth = SessionAuth::new(
        app_state.token_service.clone(),
        app_state.user_repository.clone(),
    );

    App::new()
        // Add application state
        .app_data(app_state)
        // Request logging
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .wrap(session_auth)
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(register::<U, C, N>))
                        .route("/login", web::post().to(login::<U, C, N>))
                        .route("/verify-email", web::post().to(verify_email::<U, C, N>))
                        .route(
                            "/forgot-password",
                            web::post().to(forgot_password::<U, C, N>),
                        )
                        .route("/reset-password", web::post().to(reset_password::<U, C, N>))
                        .route("/invite", web::post().to(invite::<U, C, N>))
                        .route("/accept-invite", web::post().to(accept_invite::<U, C, N>))
                        .route(
                            "/change-password",
                            web::post().to(change_password::<U, C, N>),
                        ),
                )
                // Current user profile
                .route("/users/me", web::get().to(users::me))
                // API documentation endpoint
                .route("/", web::get().to(api_documentation)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "countersign-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "CounterSign API v1",
        "endpoints": {
            "health": "/health",
            "auth": {
                "register": {
                    "path": "/api/v1/auth/register",
                    "method": "POST",
                    "description": "Create an account and send its verification link",
                    "request_body": {
                        "username": "string (email address)",
                        "password": "string (8-64 chars)"
                    },
                    "responses": {
                        "201": "Account created, verification email sent",
                        "409": "Username already registered",
                        "503": "Registration disabled or email undeliverable"
                    }
                },
                "login": {
                    "path": "/api/v1/auth/login",
                    "method": "POST",
                    "description": "Check credentials and issue a bearer session token",
                    "request_body": {
                        "username": "string (email address)",
                        "password": "string"
                    },
                    "responses": {
                        "200": "Authentication successful, returns token",
                        "401": "Unknown username or wrong password",
                        "403": "Address not verified yet"
                    }
                },
                "verify_email": {
                    "path": "/api/v1/auth/verify-email",
                    "method": "POST",
                    "description": "Redeem an emailed verification token"
                },
                "forgot_password": {
                    "path": "/api/v1/auth/forgot-password",
                    "method": "POST",
                    "description": "Send a password reset link"
                },
                "reset_password": {
                    "path": "/api/v1/auth/reset-password",
                    "method": "POST",
                    "description": "Redeem a reset token and store a new password"
                },
                "invite": {
                    "path": "/api/v1/auth/invite",
                    "method": "POST",
                    "description": "Mint an invite token for a new account",
                    "requires_auth": true
                },
                "accept_invite": {
                    "path": "/api/v1/auth/accept-invite",
                    "method": "POST",
                    "description": "Redeem an invite token and pick a password"
                },
                "change_password": {
                    "path": "/api/v1/auth/change-password",
                    "method": "POST",
                    "description": "Change the password of the authenticated account",
                    "requires_auth": true
                }
            },
            "users": {
                "me": {
                    "path": "/api/v1/users/me",
                    "method": "GET",
                    "description": "Profile of the authenticated caller",
                    "requires_auth": true
                }
            }
        }
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
