use async_trait::async_trait;
use auth::DirectoryError;
use auth::Identity;
use auth::UserDirectory;
use sqlx::FromRow;
use sqlx::PgPool;

use super::password::PasswordHasher;

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    password_hash: String,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
        }
    }
}

/// User directory backed by the `users` table.
pub struct PostgresUserDirectory {
    pool: PgPool,
    password_hasher: PasswordHasher,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            password_hasher: PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn lookup_active_user(&self, id: i64) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role, password_hash
            FROM users
            WHERE id = $1 AND active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(row.map(Identity::from))
    }

    /// `email` is expected lowercased; stored addresses match case-insensitively.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role, password_hash
            FROM users
            WHERE lower(email) = $1 AND active
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        if self.password_hasher.verify(password, &row.password_hash)? {
            Ok(Some(row.into()))
        } else {
            Ok(None)
        }
    }
}
