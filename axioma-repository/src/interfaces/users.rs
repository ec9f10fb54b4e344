use axioma_shared::{FavoriteIndicator, Language, NewUser, User};

use crate::errors::RepositoryError;

/// Trait for interacting with the user and favorite tables.
///
/// `email` is unique in storage; `insert_user` must converge on a single row
/// when two callers race to create the same email.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn insert_user(&self, user: &NewUser) -> Result<User, RepositoryError>;
    async fn update_user(&self, user: &User) -> Result<User, RepositoryError>;

    /// Upserts the favorite flag for `(user_id, indicator_id)` and returns the stored flag.
    async fn upsert_favorite(
        &self,
        user_id: i32,
        indicator_id: i32,
        is_favorite: bool,
    ) -> Result<bool, RepositoryError>;

    /// Returns the indicators currently marked as favorite, most recently updated first.
    async fn list_favorites(
        &self,
        user_id: i32,
        lang: Language,
    ) -> Result<Vec<FavoriteIndicator>, RepositoryError>;
}
