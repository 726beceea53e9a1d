use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::models::AuthenticatedUser;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::RefreshRecord;
use crate::domain::session::models::RefreshToken;
use crate::session::errors::AuthenticationError;
use crate::session::errors::PasswordVerificationError;
use crate::session::ports::AuthenticationServicePort;
use crate::session::ports::CredentialStore;
use crate::session::ports::PasswordVerifier;
use crate::session::ports::RefreshTokenStore;
use crate::session::ports::TokenSigner;

/// Domain service implementation for authentication and token refresh.
///
/// Stateless between requests; all shared state lives behind the injected ports.
pub struct AuthenticationService<CS, PV, TS, RS>
where
    CS: CredentialStore,
    PV: PasswordVerifier,
    TS: TokenSigner,
    RS: RefreshTokenStore,
{
    credential_store: Arc<CS>,
    password_verifier: Arc<PV>,
    token_signer: Arc<TS>,
    refresh_token_store: Arc<RS>,
    access_token_lifetime: Duration,
}

impl<CS, PV, TS, RS> AuthenticationService<CS, PV, TS, RS>
where
    CS: CredentialStore,
    PV: PasswordVerifier,
    TS: TokenSigner,
    RS: RefreshTokenStore,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `credential_store` - User lookup by email
    /// * `password_verifier` - Password hash comparison
    /// * `token_signer` - Access token signing
    /// * `refresh_token_store` - Refresh token persistence
    /// * `access_token_lifetime` - Validity window written into every access token
    pub fn new(
        credential_store: Arc<CS>,
        password_verifier: Arc<PV>,
        token_signer: Arc<TS>,
        refresh_token_store: Arc<RS>,
        access_token_lifetime: Duration,
    ) -> Self {
        Self {
            credential_store,
            password_verifier,
            token_signer,
            refresh_token_store,
            access_token_lifetime,
        }
    }

    fn sign_access_token(&self, record: &RefreshRecord) -> Result<String, AuthenticationError> {
        let claims = auth::Claims::new(
            record.user_id.0,
            record.role.clone(),
            Utc::now(),
            self.access_token_lifetime,
        );

        Ok(self.token_signer.sign(&claims)?)
    }
}

#[async_trait]
impl<CS, PV, TS, RS> AuthenticationServicePort for AuthenticationService<CS, PV, TS, RS>
where
    CS: CredentialStore,
    PV: PasswordVerifier,
    TS: TokenSigner,
    RS: RefreshTokenStore,
{
    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticatedUser, AuthenticationError> {
        let user = self
            .credential_store
            .find_by_email(credentials.email())
            .await?
            .ok_or_else(|| {
                tracing::info!(
                    email = %credentials.email(),
                    "Authentication rejected: unknown email"
                );
                AuthenticationError::CredentialsRejected
            })?;

        self.password_verifier
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(|e| {
                if let PasswordVerificationError::Mismatch = e {
                    tracing::info!(user_id = %user.id, "Authentication rejected: wrong password");
                }
                AuthenticationError::from(e)
            })?;

        let record = RefreshRecord::from(&user);
        let access_token = self.sign_access_token(&record)?;
        let refresh_token = self.refresh_token_store.issue(&record).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User authenticated");

        Ok(AuthenticatedUser {
            user_id: user.id,
            role: user.role,
            name: user.name,
            email: user.email,
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<String, AuthenticationError> {
        let record = self
            .refresh_token_store
            .resolve(refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::info!("Refresh rejected: unknown or expired refresh token");
                AuthenticationError::CredentialsRejected
            })?;

        let access_token = self.sign_access_token(&record)?;

        tracing::info!(user_id = %record.user_id, "Access token refreshed");

        Ok(access_token)
    }
}
