//! PostgreSQL implementation of the user repository.
//!
//! Users are keyed by their unique email; favorites by `(user_id, indicator_id)`.
//! Both writes are upserts so that repeated or concurrent calls never duplicate rows.
use async_trait::async_trait;
use axioma_shared::{FavoriteIndicator, Language, NewUser, User};
use chrono::{DateTime, Utc};

use crate::{RepositoryError, UserRepository};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: Option<String>,
    phone: Option<String>,
    picture: Option<String>,
    email_verified: bool,
    country_code: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            phone: row.phone,
            picture: row.picture,
            email_verified: row.email_verified,
            country_code: row.country_code,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    indicator_id: i32,
    indicator_code: String,
    indicator_name: Option<String>,
    description: Option<String>,
    data_count: Option<i32>,
    source: Option<String>,
    updated_at: DateTime<Utc>,
}

/// PostgreSQL-backed repository for the `users` and `user_favorites` tables.
pub struct PostgresUserRepository {
    pool: sqlx::PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository on a pool with the required schema.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, phone, picture, email_verified, country_code
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Inserts a user, or returns the existing row if another caller created the
    /// same email first.
    async fn insert_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, name, phone, picture, email_verified, country_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, name, phone, picture, email_verified, country_code
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.picture)
        .bind(user.email_verified)
        .bind(&user.country_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_user(&self, user: &User) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2, phone = $3, picture = $4, email_verified = $5, country_code = $6
            WHERE id = $1
            RETURNING id, email, name, phone, picture, email_verified, country_code
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.picture)
        .bind(user.email_verified)
        .bind(&user.country_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn upsert_favorite(
        &self,
        user_id: i32,
        indicator_id: i32,
        is_favorite: bool,
    ) -> Result<bool, RepositoryError> {
        let stored = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO user_favorites (user_id, indicator_id, is_favorite)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, indicator_id)
            DO UPDATE SET
                is_favorite = EXCLUDED.is_favorite,
                updated_at = now()
            RETURNING is_favorite
            "#,
        )
        .bind(user_id)
        .bind(indicator_id)
        .bind(is_favorite)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unknown_indicator = e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation());
            if unknown_indicator {
                RepositoryError::UnknownIndicator(indicator_id)
            } else {
                RepositoryError::DatabaseError(e)
            }
        })?;

        Ok(stored)
    }

    async fn list_favorites(
        &self,
        user_id: i32,
        lang: Language,
    ) -> Result<Vec<FavoriteIndicator>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT
                i.indicator_id,
                i.indicator_code,
                il.indicator_name,
                il.description,
                i.data_count,
                i.source,
                uf.updated_at
            FROM user_favorites uf
            JOIN indicators i ON i.indicator_id = uf.indicator_id
            LEFT JOIN indicators_lang il ON il.indicator_id = i.indicator_id AND il.lang = $2
            WHERE uf.user_id = $1 AND uf.is_favorite
            ORDER BY uf.updated_at DESC, i.indicator_id
            "#,
        )
        .bind(user_id)
        .bind(lang.code())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FavoriteIndicator {
                id: row.indicator_id,
                code: row.indicator_code,
                name: row.indicator_name,
                description: row.description,
                data_count: row.data_count,
                source: row.source,
                updated_at: row.updated_at,
            })
            .collect())
    }
}
