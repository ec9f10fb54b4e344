//! In-memory repositories for the engine unit tests.
use std::collections::BTreeSet;

use async_trait::async_trait;
use axioma_repository::{
    DetailQuery, IndicatorQuery, IndicatorRepository, RepositoryError, ReserveRepository,
    UserRepository,
};
use axioma_shared::{
    DetailRow, EntityLink, FavoriteIndicator, IndicatorMatch, Language, NewUser, ReserveEntry,
    User,
};
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

fn mock_failure() -> RepositoryError {
    RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut)
}

pub struct MockReserveRepository {
    entries: Vec<ReserveEntry>,
    should_fail: bool,
    entry_queries: Mutex<usize>,
}

impl MockReserveRepository {
    pub fn new(entries: Vec<ReserveEntry>) -> Self {
        Self {
            entries,
            should_fail: false,
            entry_queries: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub async fn entry_queries(&self) -> usize {
        *self.entry_queries.lock().await
    }
}

#[async_trait]
impl ReserveRepository for MockReserveRepository {
    async fn recent_cutoff_dates(&self, limit: i64) -> Result<Vec<NaiveDate>, RepositoryError> {
        if self.should_fail {
            return Err(mock_failure());
        }
        let distinct: BTreeSet<NaiveDate> = self.entries.iter().map(|e| e.cutoff_date).collect();
        Ok(distinct.into_iter().rev().take(limit as usize).collect())
    }

    async fn entries_for_dates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<ReserveEntry>, RepositoryError> {
        *self.entry_queries.lock().await += 1;
        let mut rows: Vec<ReserveEntry> = self
            .entries
            .iter()
            .filter(|e| dates.contains(&e.cutoff_date))
            .cloned()
            .collect();
        // Stable: keeps insertion order within a date.
        rows.sort_by(|a, b| b.cutoff_date.cmp(&a.cutoff_date));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct MockIndicatorRepository {
    pub matches: Vec<IndicatorMatch>,
    pub links: Vec<EntityLink>,
    pub rows: Vec<DetailRow>,
    pub should_fail: bool,
    pub searches: Mutex<Vec<IndicatorQuery>>,
    pub detail_queries: Mutex<Vec<DetailQuery>>,
}

#[async_trait]
impl IndicatorRepository for MockIndicatorRepository {
    async fn search_indicators(
        &self,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorMatch>, RepositoryError> {
        if self.should_fail {
            return Err(mock_failure());
        }
        self.searches.lock().await.push(query.clone());
        Ok(self.matches.clone())
    }

    async fn entity_links(
        &self,
        indicator_ids: &[i32],
        _lang: Language,
    ) -> Result<Vec<EntityLink>, RepositoryError> {
        Ok(self
            .links
            .iter()
            .filter(|l| indicator_ids.contains(&l.indicator_id))
            .cloned()
            .collect())
    }

    async fn detail_rows(&self, query: &DetailQuery) -> Result<Vec<DetailRow>, RepositoryError> {
        if self.should_fail {
            return Err(mock_failure());
        }
        self.detail_queries.lock().await.push(query.clone());
        Ok(self
            .rows
            .iter()
            .filter(|r| r.indicator_code == query.indicator_code)
            .filter(|r| query.entity_codes.contains(&r.entity_code))
            .cloned()
            .collect())
    }
}

#[derive(Clone)]
struct FavoriteState {
    user_id: i32,
    indicator_id: i32,
    is_favorite: bool,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<Vec<User>>,
    favorites: Mutex<Vec<FavoriteState>>,
    /// Indicator ids that exist, with their code.
    pub indicators: Vec<(i32, String)>,
    writes: Mutex<usize>,
    /// Stored by another caller between this caller's lookup and its insert.
    concurrent: Mutex<Option<User>>,
}

impl MockUserRepository {
    pub fn with_indicators(indicators: Vec<(i32, String)>) -> Self {
        Self {
            indicators,
            ..Self::default()
        }
    }

    /// A repository where `user` is inserted by someone else right after the
    /// first lookup misses.
    pub fn with_concurrent_insert(user: User) -> Self {
        Self {
            concurrent: Mutex::new(Some(user)),
            ..Self::default()
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn writes(&self) -> usize {
        *self.writes.lock().await
    }

    pub async fn favorite_rows(&self) -> usize {
        self.favorites.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        *self.writes.lock().await += 1;
        if let Some(other) = self.concurrent.lock().await.take() {
            users.push(other);
        }
        if let Some(existing) = users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }
        let created = User {
            id: users.len() as i32 + 1,
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            picture: user.picture.clone(),
            email_verified: user.email_verified,
            country_code: user.country_code.clone(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        *self.writes.lock().await += 1;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(RepositoryError::DatabaseError(sqlx::Error::RowNotFound)),
        }
    }

    async fn upsert_favorite(
        &self,
        user_id: i32,
        indicator_id: i32,
        is_favorite: bool,
    ) -> Result<bool, RepositoryError> {
        if !self.indicators.iter().any(|(id, _)| *id == indicator_id) {
            return Err(RepositoryError::UnknownIndicator(indicator_id));
        }
        let mut favorites = self.favorites.lock().await;
        let now = Utc::now();
        match favorites
            .iter_mut()
            .find(|f| f.user_id == user_id && f.indicator_id == indicator_id)
        {
            Some(existing) => {
                existing.is_favorite = is_favorite;
                existing.updated_at = now;
            }
            None => favorites.push(FavoriteState {
                user_id,
                indicator_id,
                is_favorite,
                updated_at: now,
            }),
        }
        Ok(is_favorite)
    }

    async fn list_favorites(
        &self,
        user_id: i32,
        _lang: Language,
    ) -> Result<Vec<FavoriteIndicator>, RepositoryError> {
        let mut favorites: Vec<FavoriteState> = self
            .favorites
            .lock()
            .await
            .iter()
            .filter(|f| f.user_id == user_id && f.is_favorite)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(favorites
            .into_iter()
            .map(|f| {
                let code = self
                    .indicators
                    .iter()
                    .find(|(id, _)| *id == f.indicator_id)
                    .map(|(_, code)| code.clone())
                    .unwrap_or_default();
                FavoriteIndicator {
                    id: f.indicator_id,
                    code,
                    name: None,
                    description: None,
                    data_count: None,
                    source: None,
                    updated_at: f.updated_at,
                }
            })
            .collect())
    }
}
