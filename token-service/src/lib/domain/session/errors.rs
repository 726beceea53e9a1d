use thiserror::Error;

/// Error for credential request validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Email must not be empty")]
    EmptyEmail,

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Error for refresh token parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),

    #[error("Refresh token must be a version 4 UUID")]
    UnsupportedVersion,
}

/// Error for credential store lookups
#[derive(Debug, Clone, Error)]
pub enum CredentialStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Outcome of a failed password check
#[derive(Debug, Clone, Error)]
pub enum PasswordVerificationError {
    #[error("Password does not match")]
    Mismatch,

    #[error("Password verifier failed: {0}")]
    VerifierFailed(String),
}

/// Error for access token signing
#[derive(Debug, Clone, Error)]
pub enum TokenSigningError {
    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

/// Error for refresh token persistence
#[derive(Debug, Clone, Error)]
pub enum RefreshTokenStoreError {
    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Cache operation timed out after {0} ms")]
    Timeout(u128),

    #[error("Refresh token already exists")]
    Collision,

    #[error("Failed to serialize refresh record: {0}")]
    SerializationFailed(String),
}

/// Top-level error for authenticate and refresh operations.
///
/// `CredentialsRejected` covers unknown email, wrong password, and unknown or expired
/// refresh token alike. Every other variant is a dependency fault whose detail is for
/// server-side logs only.
#[derive(Debug, Clone, Error)]
pub enum AuthenticationError {
    #[error("Credentials rejected")]
    CredentialsRejected,

    #[error("Credential store failure: {0}")]
    CredentialStore(#[from] CredentialStoreError),

    #[error("Password verifier failure: {0}")]
    PasswordVerifier(String),

    #[error("Token signer failure: {0}")]
    TokenSigning(#[from] TokenSigningError),

    #[error("Refresh token store failure: {0}")]
    RefreshTokenStore(#[from] RefreshTokenStoreError),
}

impl AuthenticationError {
    /// Whether the caller is at fault, as opposed to a failing dependency.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthenticationError::CredentialsRejected)
    }
}

impl From<PasswordVerificationError> for AuthenticationError {
    fn from(err: PasswordVerificationError) -> Self {
        match err {
            PasswordVerificationError::Mismatch => AuthenticationError::CredentialsRejected,
            PasswordVerificationError::VerifierFailed(msg) => {
                AuthenticationError::PasswordVerifier(msg)
            }
        }
    }
}
