//! Authentication primitives
//!
//! Provides the cryptographic building blocks of the token service:
//! - Password hashing and verification (Argon2id, with bcrypt verification)
//! - HS256 JWT signing and validation
//! - Authentication coordination
//!
//! Nothing in this crate performs I/O. The service defines its own capability traits
//! and adapts these implementations to them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let claims = Claims::new(1, "admin", Utc::now(), Duration::minutes(15));
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.role, "admin");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//!
//! let hash = auth.hash_password("password123").unwrap();
//! assert!(auth.password_hasher().verify("password123", &hash).unwrap());
//!
//! let claims = Claims::new(1, "user", Utc::now(), Duration::minutes(15));
//! let token = auth.sign(&claims).unwrap();
//! let decoded = auth.validate_token(&token).unwrap();
//! assert_eq!(decoded.user_id, 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
