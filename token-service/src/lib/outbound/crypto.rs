use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;

use crate::session::errors::PasswordVerificationError;
use crate::session::errors::TokenSigningError;
use crate::session::ports::PasswordVerifier;
use crate::session::ports::TokenSigner;

#[async_trait]
impl PasswordVerifier for Authenticator {
    async fn verify(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<(), PasswordVerificationError> {
        let hasher = self.password_hasher();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        // Hash comparison is deliberately slow; keep it off the async workers.
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| PasswordVerificationError::VerifierFailed(e.to_string()))?
            .map_err(|e| PasswordVerificationError::VerifierFailed(e.to_string()))?;

        if matches {
            Ok(())
        } else {
            Err(PasswordVerificationError::Mismatch)
        }
    }
}

impl TokenSigner for Authenticator {
    fn sign(&self, claims: &Claims) -> Result<String, TokenSigningError> {
        Authenticator::sign(self, claims).map_err(|e| TokenSigningError::SigningFailed(e.to_string()))
    }
}
