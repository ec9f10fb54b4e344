//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed with one of Google's rotating secure-token keys.
//! The key set is fetched on demand and reused until it expires, or until a token
//! references a key id that is not in it and the set is older than the minimum
//! refresh interval.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axioma_shared::IdentityClaims;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::AuthError;

/// Public signing keys of Firebase ID tokens.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Minimum age of the cached key set before an unknown key id triggers a refetch.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Verifies an identity token and returns its claims.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError>;
}

/// Claims of a Firebase ID token used by the API.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    #[serde(default)]
    email_verified: bool,
    phone_number: Option<String>,
}

impl From<FirebaseClaims> for IdentityClaims {
    fn from(claims: FirebaseClaims) -> Self {
        IdentityClaims {
            email: claims.email.unwrap_or_default(),
            name: claims.name,
            picture: claims.picture,
            email_verified: claims.email_verified,
            phone: claims.phone_number,
            country_code: None,
        }
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies Firebase ID tokens for one project.
pub struct FirebaseTokenVerifier {
    client: reqwest::Client,
    jwks_url: String,
    project_id: String,
    keys_ttl: Duration,
    min_refresh_interval: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl FirebaseTokenVerifier {
    /// Creates a verifier for `project_id` using Google's public key set.
    pub fn new(project_id: String, keys_ttl: Duration) -> Result<Self, AuthError> {
        Self::with_jwks_url(project_id, keys_ttl, GOOGLE_JWKS_URL.to_string())
    }

    /// Creates a verifier that fetches its keys from `jwks_url`.
    pub fn with_jwks_url(
        project_id: String,
        keys_ttl: Duration,
        jwks_url: String,
    ) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        Ok(Self {
            client,
            jwks_url,
            project_id,
            keys_ttl,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: RwLock::new(None),
        })
    }

    /// Sets how old the key set must be before an unknown key id refetches it.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);
        validation
    }

    /// Finds `kid` in the cached key set while that set is usable.
    ///
    /// Returns `Ok(None)` when the set has to be fetched first. An unknown `kid`
    /// is rejected without a fetch while the set is younger than the minimum
    /// refresh interval.
    fn cached_key(
        &self,
        cache: &Option<CachedKeys>,
        kid: &str,
    ) -> Result<Option<DecodingKey>, AuthError> {
        let Some(cached) = cache.as_ref() else {
            return Ok(None);
        };
        let age = cached.fetched_at.elapsed();
        if age >= self.keys_ttl {
            return Ok(None);
        }

        match cached.keys.find(kid) {
            Some(jwk) => DecodingKey::from_jwk(jwk)
                .map(Some)
                .map_err(|e| AuthError::invalid(e.to_string())),
            None if age < self.min_refresh_interval => {
                Err(AuthError::invalid(format!("Unknown key id {}", kid)))
            }
            None => Ok(None),
        }
    }

    /// Returns the decoding key for `kid`, refreshing the key set when it is stale
    /// or does not contain `kid`. Refreshes are serialized.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(key) = self.cached_key(&cache, kid)? {
                return Ok(key);
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed the set while this one waited.
        if let Some(key) = self.cached_key(&cache, kid)? {
            return Ok(key);
        }

        debug!(kid = %kid, "Refreshing signing keys");
        let keys = self.fetch_keys().await?;
        let key = match keys.find(kid) {
            Some(jwk) => {
                DecodingKey::from_jwk(jwk).map_err(|e| AuthError::invalid(e.to_string()))
            }
            None => Err(AuthError::invalid(format!("Unknown key id {}", kid))),
        };

        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let keys = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        info!(keys = keys.keys.len(), "Fetched token signing keys");
        Ok(keys)
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::invalid(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::invalid(format!(
                "Unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid("Token has no key id"))?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<FirebaseClaims>(token, &key, &self.validation())
            .map_err(|e| AuthError::invalid(e.to_string()))?;

        Ok(data.claims.into())
    }
}
