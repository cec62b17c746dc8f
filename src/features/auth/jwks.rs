use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    // RSA
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    // EC
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

impl Jwk {
    /// Build a decoding key; `Ok(None)` for key types we do not verify with
    fn decoding_key(&self) -> Result<Option<DecodingKey>, JwksError> {
        let key = match (self.kty.as_str(), &self.n, &self.e, &self.x, &self.y) {
            ("RSA", Some(n), Some(e), _, _) => DecodingKey::from_rsa_components(n, e),
            ("EC", _, _, Some(x), Some(y)) => DecodingKey::from_ec_components(x, y),
            _ => return Ok(None),
        };

        key.map(Some)
            .map_err(|e| JwksError::KeyConversionError(format!("{}: {}", self.kid, e)))
    }
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    last_fetched: Instant,
}

/// Fetches and caches the identity provider's signing keys
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<JwksCache>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(jwks_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.last_fetched.elapsed() < self.cache_ttl {
                    if let Some(key) = cached.keys.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        // Cache miss or expired; keys may have been rotated
        self.fetch_jwks().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn fetch_jwks(&self) -> Result<(), JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            if let Some(decoding_key) = jwk.decoding_key()? {
                keys.insert(jwk.kid, decoding_key);
            }
        }

        tracing::debug!("Fetched {} signing keys from {}", keys.len(), self.jwks_url);

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            last_fetched: Instant::now(),
        });

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_key_types_are_skipped() {
        let jwk = Jwk {
            kid: "oct-1".to_string(),
            kty: "oct".to_string(),
            n: None,
            e: None,
            x: None,
            y: None,
        };
        assert!(jwk.decoding_key().unwrap().is_none());
    }

    #[test]
    fn test_rsa_key_without_components_is_skipped() {
        let jwk = Jwk {
            kid: "rsa-1".to_string(),
            kty: "RSA".to_string(),
            n: None,
            e: Some("AQAB".to_string()),
            x: None,
            y: None,
        };
        assert!(jwk.decoding_key().unwrap().is_none());
    }

    #[test]
    fn test_jwks_response_parses_mixed_keys() {
        let raw = r#"{"keys":[
            {"kid":"a","kty":"RSA","n":"xyz","e":"AQAB","alg":"RS256"},
            {"kid":"b","kty":"EC","crv":"P-256","x":"abc","y":"def"}
        ]}"#;
        let parsed: JwksResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.keys.len(), 2);
        assert_eq!(parsed.keys[1].x.as_deref(), Some("abc"));
    }
}
