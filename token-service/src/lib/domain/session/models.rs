use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;
use uuid::Variant;
use uuid::Version;

use crate::session::errors::CredentialsError;
use crate::session::errors::RefreshTokenError;

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User record as read from the credential store.
///
/// Owned by the user-management subsystem; this service only reads it.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub role: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

/// Email and plaintext password presented by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create credentials from raw request fields.
    ///
    /// The email is kept verbatim; lookups are exact and case-sensitive.
    ///
    /// # Errors
    /// * `EmptyEmail` - Email is empty
    /// * `EmptyPassword` - Password is empty
    pub fn new(email: String, password: String) -> Result<Self, CredentialsError> {
        if email.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Opaque refresh token.
///
/// A random (version 4) UUID, used as a capability rather than structured data.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshToken(Uuid);

impl RefreshToken {
    /// Generate a new random refresh token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a refresh token presented by a client.
    ///
    /// Only the lowercase hyphenated RFC 4122 form is accepted, so each token has
    /// exactly one spelling.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a canonical RFC 4122 UUID
    /// * `UnsupportedVersion` - UUID is not version 4
    pub fn parse(s: &str) -> Result<Self, RefreshTokenError> {
        let uuid = Uuid::parse_str(s).map_err(|e| RefreshTokenError::InvalidFormat(e.to_string()))?;
        if s != uuid.hyphenated().to_string() {
            return Err(RefreshTokenError::InvalidFormat(
                "expected lowercase hyphenated form".to_string(),
            ));
        }
        if uuid.get_variant() != Variant::RFC4122 {
            return Err(RefreshTokenError::InvalidFormat(
                "expected RFC 4122 variant".to_string(),
            ));
        }
        if uuid.get_version() != Some(Version::Random) {
            return Err(RefreshTokenError::UnsupportedVersion);
        }
        Ok(Self(uuid))
    }
}

impl FromStr for RefreshToken {
    type Err = RefreshTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken([redacted])")
    }
}

/// Claims persisted behind a refresh token: just enough to mint a new access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    pub user_id: UserId,
    pub role: String,
}

impl From<&User> for RefreshRecord {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role.clone(),
        }
    }
}

/// Result of a successful password authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: String,
    pub name: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}
