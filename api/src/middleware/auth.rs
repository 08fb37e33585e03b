//! Session authentication middleware.
//!
//! `SessionAuth` resolves the `Authorization: Bearer` header into a
//! [`Principal`] stored in the request extensions. The gate never rejects a
//! request on its own: every failure to establish an identity degrades
//! silently to `Principal::Anonymous`, and whether anonymous access is
//! acceptable stays a handler decision.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::Utc;
use cs_core::{
    domain::entities::user::User, domain::value_objects::Principal,
    repositories::UserRepository, services::TokenService,
};
use futures_util::future::LocalBoxFuture;
use log::debug;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

/// Session authentication middleware factory
pub struct SessionAuth {
    token_service: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl SessionAuth {
    /// Creates the gate around the token codec and identity store
    pub fn new(token_service: Arc<TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            token_service,
            users,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            token_service: self.token_service.clone(),
            users: self.users.clone(),
        }))
    }
}

/// Session authentication middleware service
pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    token_service: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token_service = self.token_service.clone();
        let users = self.users.clone();

        Box::pin(async move {
            // A principal established earlier (nested gates, test
            // scaffolding) is left untouched.
            let established = req.extensions().get::<Principal>().is_some();
            if !established {
                let principal = resolve_principal(&req, &token_service, users.as_ref()).await;
                req.extensions_mut().insert(principal);
            }

            // Continue with the request; the gate itself never rejects
            service.call(req).await
        })
    }
}

/// Resolves the request's bearer token into a principal
///
/// The clock is read exactly once so the signature check and the expiry
/// re-check see the same instant.
async fn resolve_principal(
    req: &ServiceRequest,
    token_service: &TokenService,
    users: &dyn UserRepository,
) -> Principal {
    let token = match extract_bearer_token(req) {
        Some(token) => token,
        None => return Principal::Anonymous,
    };

    let now = Utc::now();
    let subject = match token_service.subject_of(&token, now) {
        Ok(subject) => subject,
        Err(err) => {
            debug!("discarding bearer token: {}", err);
            return Principal::Anonymous;
        }
    };

    let user = match users.find_by_username(&subject).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("bearer token names an unknown account");
            return Principal::Anonymous;
        }
        Err(err) => {
            debug!("identity lookup failed, treating request as anonymous: {}", err);
            return Principal::Anonymous;
        }
    };

    // The token must still be valid for the stored username at the same
    // instant the subject was extracted.
    if token_service.is_valid_for(&token, &user.username, now) {
        Principal::Authenticated { user }
    } else {
        Principal::Anonymous
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor yielding the request's principal, authenticated or not
///
/// Never fails; a request that passed no gate at all yields
/// `Principal::Anonymous`.
pub struct RequestPrincipal(pub Principal);

impl FromRequest for RequestPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let principal = req
            .extensions()
            .get::<Principal>()
            .cloned()
            .unwrap_or_default();
        ready(Ok(RequestPrincipal(principal)))
    }
}

/// Extractor for handlers that require an authenticated caller
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<Principal>() {
            Some(Principal::Authenticated { user }) => Ok(AuthenticatedUser(user.clone())),
            _ => Err(ErrorUnauthorized("Authentication required")),
        };
        ready(result)
    }
}
