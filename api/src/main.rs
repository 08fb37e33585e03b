use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use cs_api::app::create_app;
use cs_api::routes::auth::AppState;
use cs_core::services::{
    AuthService, AuthServiceConfig, CredentialTokenConfig, CredentialTokenService, SigningKey,
    TokenService, TokenServiceConfig,
};
use cs_infra::database::{DatabasePool, MySqlCredentialTokenRepository, MySqlUserRepository};
use cs_infra::email::EmailBackend;
use cs_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting CounterSign API Server");

    // Load configuration
    let config = AppConfig::from_env();
    info!("Environment: {:?}", config.environment);

    // The signing key is load-bearing; a missing, malformed or weak
    // secret must stop the process before it accepts a single request.
    // There is no fallback key in any environment.
    let signing_key = match SigningKey::from_base64_secret(&config.auth.token_secret) {
        Ok(key) => key,
        Err(err) => {
            error!("Refusing to start: {} (set AUTH_TOKEN_SECRET)", err);
            std::process::exit(1);
        }
    };

    // Database connection pool
    let pool = match DatabasePool::new(config.database.clone()).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Failed to connect to the database: {}", err);
            std::process::exit(1);
        }
    };

    // Outbound email backend
    let notifier = match EmailBackend::from_env() {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            error!("Failed to configure the email backend: {}", err);
            std::process::exit(1);
        }
    };

    // Repositories
    let user_repository = Arc::new(MySqlUserRepository::new(pool.pool().clone()));
    let credential_token_repository =
        Arc::new(MySqlCredentialTokenRepository::new(pool.pool().clone()));

    // Services
    let token_service = Arc::new(TokenService::new(
        signing_key,
        TokenServiceConfig::with_session_ttl_ms(config.auth.session_ttl_ms),
    ));
    let credential_token_service = Arc::new(CredentialTokenService::new(
        credential_token_repository,
        CredentialTokenConfig {
            verification_ttl_ms: config.auth.verification_token_ttl_ms,
            password_reset_ttl_ms: config.auth.password_reset_token_ttl_ms,
            invite_ttl_ms: config.auth.invite_token_ttl_ms,
        },
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        credential_token_service,
        token_service.clone(),
        notifier,
        AuthServiceConfig {
            verification_link_base: config.auth.verification_link_base.clone(),
            reset_link_base: config.auth.reset_link_base.clone(),
            allow_registration: config.auth.allow_registration,
        },
    ));

    let app_state = web::Data::new(AppState {
        auth_service,
        token_service,
        user_repository,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .client_request_timeout(Duration::from_secs(config.server.request_timeout));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await
}
