use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthenticatedIdentity;
use crate::config::AuthConfig;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Username
    pub uid: i64,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
    pub jti: String,
}

impl From<Claims> for AuthenticatedIdentity {
    fn from(claims: Claims) -> Self {
        AuthenticatedIdentity {
            id: claims.uid,
            username: claims.sub,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

/// Signs and checks HS256 bearer tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_expiry_hours))
    }

    pub fn issue(&self, identity: &AuthenticatedIdentity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.username.clone(),
            uid: identity.id,
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(token)
    }

    /// Verifies signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))?;

        Ok(data.claims)
    }
}
