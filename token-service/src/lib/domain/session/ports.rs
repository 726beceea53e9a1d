use async_trait::async_trait;

use crate::domain::session::models::AuthenticatedUser;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::RefreshRecord;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::User;
use crate::session::errors::AuthenticationError;
use crate::session::errors::CredentialStoreError;
use crate::session::errors::PasswordVerificationError;
use crate::session::errors::RefreshTokenStoreError;
use crate::session::errors::TokenSigningError;

/// Port for the two operations exposed at the service boundary.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Exchange email and password for an access token and a refresh token.
    ///
    /// # Arguments
    /// * `credentials` - Validated email and password
    ///
    /// # Returns
    /// Both tokens together with the user's profile fields
    ///
    /// # Errors
    /// * `CredentialsRejected` - Unknown email or wrong password (indistinguishable)
    /// * Any other variant - A dependency failed; no token was returned
    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticatedUser, AuthenticationError>;

    /// Redeem a refresh token for a new access token.
    ///
    /// The refresh token stays valid until its own expiry.
    ///
    /// # Errors
    /// * `CredentialsRejected` - Token never issued or already expired
    /// * Any other variant - A dependency failed
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<String, AuthenticationError>;
}

/// Read access to stored user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by exact (case-sensitive) email.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Storage or transport failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialStoreError>;
}

/// Slow, salted password comparison.
#[async_trait]
pub trait PasswordVerifier: Send + Sync + 'static {
    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match
    /// * `VerifierFailed` - Stored hash is malformed or the verifier itself failed
    async fn verify(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<(), PasswordVerificationError>;
}

/// Access token signing with a server-held secret.
pub trait TokenSigner: Send + Sync + 'static {
    /// Sign claims whose timestamps were computed by the caller.
    fn sign(&self, claims: &auth::Claims) -> Result<String, TokenSigningError>;
}

/// Storage for live refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Generate a new refresh token and persist its record with the store's TTL.
    ///
    /// # Errors
    /// * `Collision` - Generated token already exists (never overwritten)
    /// * `CacheError` / `Timeout` / `SerializationFailed` - Storage failure
    async fn issue(&self, record: &RefreshRecord) -> Result<RefreshToken, RefreshTokenStoreError>;

    /// Look up the record behind a refresh token.
    ///
    /// # Returns
    /// The record, or None when the token was never issued or has expired
    ///
    /// # Errors
    /// * `CacheError` / `Timeout` / `SerializationFailed` - Storage failure
    async fn resolve(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError>;
}
