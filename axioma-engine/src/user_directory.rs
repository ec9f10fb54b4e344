//! Local user records for verified identities, and their favorite indicators.
use std::sync::Arc;

use axioma_repository::{RepositoryError, UserRepository};
use axioma_shared::{FavoriteIndicator, IdentityClaims, Language, NewUser, User};
use tracing::{debug, info, instrument};

use crate::config::UserDirectoryConfig;
use crate::errors::EngineError;

/// Synchronizes identity claims into the user table and manages favorites.
pub struct UserDirectory {
    repository: Arc<dyn UserRepository>,
    config: UserDirectoryConfig,
}

impl UserDirectory {
    pub fn new(repository: Arc<dyn UserRepository>, config: UserDirectoryConfig) -> Self {
        Self { repository, config }
    }

    /// Returns the local user for `claims`, creating or patching it as needed.
    ///
    /// An existing user only takes non-empty claim values that differ from the stored
    /// ones, and `email_verified` is only ever raised. Nothing is written when no field
    /// changes.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored user
    /// * `Err(EngineError::InvalidArgument)` - If the claims carry no email
    /// * `Err(EngineError::Repository)` - If the store fails
    #[instrument(skip(self, claims), fields(email = %claims.email))]
    pub async fn get_or_create_user(&self, claims: &IdentityClaims) -> Result<User, EngineError> {
        let email = claims.email.trim();
        if email.is_empty() {
            return Err(EngineError::invalid_argument("Identity has no email"));
        }

        match self.repository.find_user_by_email(email).await? {
            Some(mut user) => {
                if !apply_claims(&mut user, claims) {
                    return Ok(user);
                }
                let updated = self.repository.update_user(&user).await?;
                debug!(user_id = updated.id, "Updated user from identity claims");
                Ok(updated)
            }
            None => {
                let new_user = NewUser {
                    email: email.to_string(),
                    name: non_empty(&claims.name),
                    phone: non_empty(&claims.phone),
                    picture: non_empty(&claims.picture),
                    email_verified: self.config.force_email_verified_on_create
                        || claims.email_verified,
                    country_code: non_empty(&claims.country_code),
                };
                let mut created = self.repository.insert_user(&new_user).await?;
                // A concurrent first login may have inserted the row first.
                if apply_claims(&mut created, claims) {
                    let updated = self.repository.update_user(&created).await?;
                    debug!(user_id = updated.id, "Updated concurrently created user");
                    return Ok(updated);
                }
                info!(user_id = created.id, "Created user");
                Ok(created)
            }
        }
    }

    /// Sets the favorite flag of `indicator_id` for `user_id`.
    ///
    /// Repeating the same call leaves a single row with the same flag.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The stored flag
    /// * `Err(EngineError::NotFound)` - If the indicator does not exist
    #[instrument(skip(self))]
    pub async fn toggle_favorite(
        &self,
        user_id: i32,
        indicator_id: i32,
        is_favorite: bool,
    ) -> Result<bool, EngineError> {
        match self
            .repository
            .upsert_favorite(user_id, indicator_id, is_favorite)
            .await
        {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::UnknownIndicator(id)) => Err(EngineError::not_found(format!(
                "Indicator {} not found",
                id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the user's favorite indicators, most recently updated first.
    #[instrument(skip(self), fields(lang = %lang))]
    pub async fn list_favorites(
        &self,
        user_id: i32,
        lang: Language,
    ) -> Result<Vec<FavoriteIndicator>, EngineError> {
        let favorites = self.repository.list_favorites(user_id, lang).await?;
        debug!(count = favorites.len(), "Listed favorites");
        Ok(favorites)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn patch(field: &mut Option<String>, incoming: &Option<String>) -> bool {
    match non_empty(incoming) {
        Some(value) if field.as_deref() != Some(value.as_str()) => {
            *field = Some(value);
            true
        }
        _ => false,
    }
}

/// Applies the partial patch of `claims` to `user`. Returns true if anything changed.
fn apply_claims(user: &mut User, claims: &IdentityClaims) -> bool {
    let mut changed = false;
    changed |= patch(&mut user.name, &claims.name);
    changed |= patch(&mut user.phone, &claims.phone);
    changed |= patch(&mut user.picture, &claims.picture);
    changed |= patch(&mut user.country_code, &claims.country_code);
    if claims.email_verified && !user.email_verified {
        user.email_verified = true;
        changed = true;
    }
    changed
}
