//! Identity token issuance and verification (HS256 JWT)

use crate::{config::AppConfig, error::AppError, models::user::Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Minimum accepted secret length for HS256
pub const MIN_SECRET_LEN: usize = 32;

/// Identity embedded in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// JWT claims: the identity plus standard timing metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Stateless token service. Holds the signing key for the life of the process.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_exp_secs: u64,
}

impl TokenService {
    pub fn new(secret: &[u8], token_exp_secs: u64) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_exp_secs,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.jwt_secret.expose_secret().as_bytes(),
            config.security.token_exp_secs,
        )
    }

    /// Issue a token valid from now
    pub fn issue(&self, identity: &Identity) -> Result<String, AppError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`
    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expiration = issued_at + Duration::seconds(self.token_exp_secs as i64);

        let claims = Claims {
            identity: identity.clone(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// Bad signatures, expired tokens and malformed input all yield
    /// `InvalidToken`; the concrete reason is only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "expired",
                    ErrorKind::InvalidSignature => "bad_signature",
                    _ => "malformed",
                };
                tracing::debug!(reason, "Token validation failed");
                AppError::InvalidToken
            })
    }
}
