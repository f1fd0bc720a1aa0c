//! Token → username resolution

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// The username a token was issued to, or [`ServiceError::Unauthorized`]
    async fn resolve_username(&self, token: &str) -> ServiceResult<String>;
}

/// Opaque random tokens held in memory
#[derive(Debug, Default)]
pub struct TokenTable {
    tokens: RwLock<HashMap<String, String>>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .write()
            .insert(token.clone(), username.to_string());
        token
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.write().remove(token).is_some()
    }
}

#[async_trait]
impl AuthService for TokenTable {
    async fn resolve_username(&self, token: &str) -> ServiceResult<String> {
        self.tokens
            .read()
            .get(token)
            .cloned()
            .ok_or(ServiceError::Unauthorized)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String, // username
    exp: usize,
}

/// HS256 tokens whose subject is the username.
///
/// Any service holding the same secret can mint tokens this server accepts.
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl JwtAuth {
    pub fn new(secret: &[u8]) -> Self {
        JwtAuth {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            validity: Duration::days(7),
        }
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    pub fn issue(&self, username: &str) -> jsonwebtoken::errors::Result<String> {
        let expiration = (Utc::now() + self.validity).timestamp().max(0);
        let claims = Claims {
            sub: username.to_string(),
            exp: expiration as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

#[async_trait]
impl AuthService for JwtAuth {
    async fn resolve_username(&self, token: &str) -> ServiceResult<String> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|err| {
                debug!(%err, "rejected token");
                ServiceError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_table_round_trip() {
        let table = TokenTable::new();
        let token = table.issue("alice");

        assert_eq!(table.resolve_username(&token).await.unwrap(), "alice");
        assert!(table.revoke(&token));
        assert_eq!(
            table.resolve_username(&token).await,
            Err(ServiceError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_jwt_resolves_subject() {
        let auth = JwtAuth::new(b"test-secret");
        let token = auth.issue("bob").unwrap();
        assert_eq!(auth.resolve_username(&token).await.unwrap(), "bob");
    }

    #[tokio::test]
    async fn test_jwt_rejects_foreign_and_expired_tokens() {
        let ours = JwtAuth::new(b"test-secret");
        let theirs = JwtAuth::new(b"other-secret");
        let foreign = theirs.issue("mallory").unwrap();
        assert_eq!(
            ours.resolve_username(&foreign).await,
            Err(ServiceError::Unauthorized)
        );

        let stale = JwtAuth::new(b"test-secret").with_validity(Duration::hours(-2));
        let expired = stale.issue("bob").unwrap();
        assert_eq!(
            ours.resolve_username(&expired).await,
            Err(ServiceError::Unauthorized)
        );
        assert_eq!(
            ours.resolve_username("garbage").await,
            Err(ServiceError::Unauthorized)
        );
    }
}
