pub mod credential_token;
pub mod user;

pub use credential_token::CredentialTokenRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use credential_token::MockCredentialTokenRepository;
#[cfg(test)]
pub use user::MockUserRepository;
