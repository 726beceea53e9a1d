use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::session::errors::CredentialStoreError;
use crate::session::ports::CredentialStore;

const FIND_BY_EMAIL: &str = r#"
    SELECT id::BIGINT AS id, role::TEXT AS role, username AS name, email, password AS password_hash
    FROM "User"
    WHERE email = $1
    LIMIT 1
"#;

/// Read-only view over the user table owned by the user-management subsystem.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    role: String,
    name: String,
    email: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            role: row.role,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(FIND_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CredentialStoreError::DatabaseError(e.to_string()))?;

        Ok(row.map(User::from))
    }
}
