//! Stateless authentication library
//!
//! Provides the pieces a service needs to authenticate users and requests:
//! - Password hashing (Argon2id)
//! - Signed access tokens (JWT, HS512) with a fixed lifetime
//! - An identity directory port the service implements over its own storage
//! - Credential verification against that directory
//!
//! The per-request interception lives in each service, which combines a
//! [`TokenCodec`] and an [`IdentityDirectory`] in its HTTP middleware.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("s3cret").unwrap();
//! assert!(hasher.verify("s3cret", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Identity, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", 30).unwrap();
//! let ana = Identity::new(1, "Ana", "ana@x.com", "$argon2id$...");
//!
//! let token = codec.issue(&ana).unwrap();
//! let claims = codec.validate(&token).unwrap();
//! assert_eq!(claims.sub, "ana@x.com");
//! assert_eq!(claims.user_id, 1);
//! ```

pub mod authenticator;
pub mod directory;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::CredentialAuthenticator;
pub use directory::DirectoryError;
pub use directory::Identity;
pub use directory::IdentityDirectory;
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
