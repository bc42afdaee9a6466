//! Firebase ID token verifier.
//!
//! Firebase ID tokens are RS256 JWTs signed by Google's `securetoken` service
//! account. Public keys come from a JWK set endpoint and are cached for an
//! hour. A token is accepted when:
//!
//! - the header names a known `kid` and `RS256`
//! - the signature verifies and `exp` lies in the future
//! - `iat` is not in the future
//! - `aud` is the Firebase project id
//! - `iss` is `https://securetoken.google.com/<project_id>`
//! - `sub` is non-empty (it becomes the user id)

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use mirrorchat_core::auth::verifier::TokenVerifier;
use mirrorchat_types::identity::{AuthError, VerifiedIdentity};

/// Google's published signing keys for Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    iat: i64,
}

struct CachedKeys {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Verifies Firebase ID tokens for one project.
pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    client: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            project_id: project_id.into(),
            jwks_url: FIREBASE_JWKS_URL.to_string(),
            client,
            cache: RwLock::new(None),
        }
    }

    /// Override the JWK set endpoint.
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// Seed the key cache, skipping the first fetch.
    pub fn with_keys(self, keys: JwkSet) -> Self {
        Self {
            cache: RwLock::new(Some(CachedKeys {
                keys: Arc::new(keys),
                fetched_at: Instant::now(),
            })),
            ..self
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
        validation.leeway = CLOCK_SKEW_SECS as u64;
        validation
    }

    /// Current key set, refetched when the cached copy is older than an hour.
    async fn signing_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < KEY_CACHE_TTL {
                    return Ok(Arc::clone(&cached.keys));
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < KEY_CACHE_TTL {
                return Ok(Arc::clone(&cached.keys));
            }
        }

        let keys = Arc::new(self.fetch_keys().await?);
        tracing::debug!(count = keys.keys.len(), "Refreshed Firebase signing keys");
        *cache = Some(CachedKeys {
            keys: Arc::clone(&keys),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeysUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeysUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeysUnavailable(e.to_string()))
    }

    fn check_token(&self, token: &str, keys: &JwkSet) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::Malformed(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::Invalid(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::Malformed("missing kid".to_string()))?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::Invalid(format!("unknown key id {kid}")))?;
        let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::Invalid(e.to_string()))?;

        let data = decode::<FirebaseClaims>(token, &key, &self.validation()).map_err(map_jwt_error)?;
        let claims = data.claims;

        if claims.iat > chrono::Utc::now().timestamp() + CLOCK_SKEW_SECS {
            return Err(AuthError::Invalid("issued in the future".to_string()));
        }
        if claims.sub.is_empty() {
            return Err(AuthError::Invalid("empty subject".to_string()));
        }

        Ok(VerifiedIdentity::new(claims.sub))
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            AuthError::Malformed(err.to_string())
        }
        _ => AuthError::Invalid(err.to_string()),
    }
}

impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let keys = self.signing_keys().await?;
        self.check_token(token, &keys)
    }
}
