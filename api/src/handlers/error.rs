use std::collections::HashMap;

use actix_web::{
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use crate::dto::ErrorResponse;
use cs_core::errors::{AuthError, DomainError, TokenError};

/// Language preference for error messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    /// Detect language preference from Accept-Language header
    pub fn from_request(req: &HttpRequest) -> Self {
        if let Some(header_value) = req.headers().get(header::ACCEPT_LANGUAGE) {
            if let Ok(header_str) = header_value.to_str() {
                // Parse entries like "zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"
                let languages: Vec<(String, f32)> = header_str
                    .split(',')
                    .map(|entry| {
                        let parts: Vec<&str> = entry.trim().split(';').collect();
                        let language = parts[0].to_lowercase();
                        let quality = if parts.len() > 1 {
                            parts[1]
                                .trim_start_matches("q=")
                                .parse::<f32>()
                                .unwrap_or(1.0)
                        } else {
                            1.0
                        };
                        (language, quality)
                    })
                    .collect();

                // Find the highest quality language preference
                let mut preferred_lang = Language::English;
                let mut max_quality = 0.0;

                for (lang, quality) in languages {
                    if lang.starts_with("zh") && quality > max_quality {
                        preferred_lang = Language::Chinese;
                        max_quality = quality;
                    } else if lang.starts_with("en") && quality > max_quality {
                        preferred_lang = Language::English;
                        max_quality = quality;
                    }
                }

                return preferred_lang;
            }
        }

        // Default to English
        Language::English
    }
}

/// Helper function to get localized message
fn get_localized_message(lang: Language, en: &str, zh: &str) -> String {
    match lang {
        Language::English => en.to_string(),
        Language::Chinese => zh.to_string(),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    handle_domain_error_with_lang(error, Language::English)
}

/// Handle domain errors with language support
///
/// The mapping never distinguishes an unknown username from a wrong
/// password; both arrive here as `InvalidCredentials`.
pub fn handle_domain_error_with_lang(error: DomainError, lang: Language) -> HttpResponse {
    log::debug!("domain error: {:?}", error);

    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => {
                HttpResponse::Unauthorized().json(ErrorResponse::new(
                    "invalid_credentials",
                    get_localized_message(
                        lang,
                        "Invalid username or password",
                        "用户名或密码错误",
                    ),
                ))
            }
            AuthError::AccountNotVerified => {
                HttpResponse::Forbidden().json(ErrorResponse::new(
                    "account_not_verified",
                    get_localized_message(
                        lang,
                        "Account address has not been verified",
                        "账户地址尚未验证",
                    ),
                ))
            }
            AuthError::UserNotFound => {
                HttpResponse::NotFound().json(ErrorResponse::new(
                    "user_not_found",
                    get_localized_message(lang, "User not found", "用户不存在"),
                ))
            }
            AuthError::UserAlreadyExists => {
                HttpResponse::Conflict().json(ErrorResponse::new(
                    "user_already_exists",
                    get_localized_message(lang, "User already exists", "用户已存在"),
                ))
            }
            AuthError::RegistrationDisabled => {
                HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                    "registration_disabled",
                    get_localized_message(
                        lang,
                        "Registration is currently disabled",
                        "注册功能暂时关闭",
                    ),
                ))
            }
            AuthError::NotificationFailed => {
                HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                    "notification_failed",
                    get_localized_message(
                        lang,
                        "Could not send the notification email. Please try again later",
                        "通知邮件发送失败，请稍后重试",
                    ),
                ))
            }
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::Malformed => {
                HttpResponse::Unauthorized().json(ErrorResponse::new(
                    "malformed_token",
                    get_localized_message(lang, "Malformed token", "令牌格式无效"),
                ))
            }
            TokenError::BadSignature => {
                HttpResponse::Unauthorized().json(ErrorResponse::new(
                    "invalid_signature",
                    get_localized_message(lang, "Invalid token signature", "令牌签名无效"),
                ))
            }
            TokenError::Expired => {
                HttpResponse::BadRequest().json(ErrorResponse::new(
                    "token_expired",
                    get_localized_message(lang, "Token has expired", "令牌已过期"),
                ))
            }
            TokenError::NotFound => {
                HttpResponse::NotFound().json(ErrorResponse::new(
                    "token_not_found",
                    get_localized_message(
                        lang,
                        "Token not found or already used",
                        "令牌不存在或已被使用",
                    ),
                ))
            }
            TokenError::GenerationFailed => {
                HttpResponse::InternalServerError().json(ErrorResponse::new(
                    "token_generation_failed",
                    get_localized_message(lang, "Failed to generate token", "生成令牌失败"),
                ))
            }
        },
        DomainError::Validation { message } => {
            // The message names the offending field constraint; both
            // languages get the same detail rather than a generic stub.
            HttpResponse::BadRequest().json(ErrorResponse::new("validation_error", message))
        }
        DomainError::NotFound { resource } => {
            HttpResponse::NotFound().json(ErrorResponse::new(
                "not_found",
                get_localized_message(
                    lang,
                    &format!("{} not found", resource),
                    &format!("{}不存在", resource),
                ),
            ))
        }
        DomainError::Config(config_error) => {
            log::error!("configuration error surfaced on a request: {}", config_error);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "configuration_error",
                get_localized_message(lang, "Server configuration error", "服务器配置错误"),
            ))
        }
        DomainError::Internal { message } => {
            log::error!("internal error: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                get_localized_message(
                    lang,
                    "An internal server error occurred",
                    "发生内部服务器错误",
                ),
            ))
        }
    }
}

/// Convert request validation failures into a 400 response
///
/// Field-level details are included so clients can highlight the offending
/// input.
pub fn handle_validation_errors(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let mut field_errors = HashMap::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<String> = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        field_errors.insert(field.to_string(), messages);
    }

    log::debug!("request validation failed: {:?}", field_errors);

    HttpResponse::BadRequest().json(ErrorResponse::with_details(
        "validation_error",
        get_localized_message(lang, "Invalid request data", "请求数据无效"),
        field_errors,
    ))
}
