//! Password hashing and verification using Argon2id

use crate::{config::AppConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable cost parameters
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with explicit cost parameters
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 params: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let security = &config.security;
        Self::with_params(
            security.hash_memory_kib,
            security.hash_iterations,
            security.hash_parallelism,
        )
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// The cost parameters embedded in the hash are used, so hashes created
    /// under older settings keep verifying.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::error!("Failed to parse stored password hash: {:?}", e);
            AppError::Internal(format!("Failed to parse password hash: {}", e))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(AppError::InvalidCredential),
            Err(e) => {
                tracing::error!("Password verification failed: {:?}", e);
                Err(AppError::Internal(format!("Password verification failed: {}", e)))
            }
        }
    }

    /// `hash` on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// `verify` on the blocking thread pool
    pub async fn verify_async(&self, password: String, hash: String) -> Result<(), AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }

    /// Validate password against policy
    pub fn validate_password_policy(password: &str, config: &AppConfig) -> Result<(), AppError> {
        let policy = &config.security;

        if password.chars().count() < policy.password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                policy.password_min_length
            )));
        }

        if policy.password_require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::Validation(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if policy.password_require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "Password must contain at least one digit".to_string(),
            ));
        }

        if policy.password_require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(AppError::Validation(
                "Password must contain at least one special character".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig};
    use secrecy::Secret;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).unwrap()
    }

    fn policy_config(require_uppercase: bool, require_special: bool) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:5000".to_string(),
                graceful_shutdown_timeout_secs: 30,
                body_limit_bytes: 1024 * 1024,
                cors_allowed_origins: None,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                token_exp_secs: 3600,
                password_min_length: 8,
                password_require_uppercase: require_uppercase,
                password_require_digit: true,
                password_require_special: require_special,
                hash_memory_kib: 1024,
                hash_iterations: 1,
                hash_parallelism: 1,
            },
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("p@ss1234").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        hasher.verify("p@ss1234", &hash).unwrap();
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("p@ss1234").unwrap();

        assert!(matches!(
            hasher.verify("p@ss12345", &hash),
            Err(AppError::InvalidCredential)
        ));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap_hasher();

        let hash1 = hasher.hash("p@ss1234").unwrap();
        let hash2 = hasher.hash("p@ss1234").unwrap();
        assert_ne!(hash1, hash2);

        hasher.verify("p@ss1234", &hash1).unwrap();
        hasher.verify("p@ss1234", &hash2).unwrap();
    }

    #[test]
    fn test_verify_uses_params_embedded_in_hash() {
        let hash = cheap_hasher().hash("p@ss1234").unwrap();
        PasswordHasher::with_params(2048, 2, 1)
            .unwrap()
            .verify("p@ss1234", &hash)
            .unwrap();
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hasher = cheap_hasher();
        let hash = hasher.hash_async("p@ss1234".to_string()).await.unwrap();

        hasher
            .verify_async("p@ss1234".to_string(), hash.clone())
            .await
            .unwrap();
        assert!(hasher
            .verify_async("wrong".to_string(), hash)
            .await
            .is_err());
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        let result = cheap_hasher().verify("p@ss1234", "plaintext-password");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(PasswordHasher::with_params(1, 1, 1).is_err());
    }

    #[test]
    fn test_password_policy_validation() {
        let config = policy_config(false, false);
        assert!(PasswordHasher::validate_password_policy("p@ss1234", &config).is_ok());
        assert!(PasswordHasher::validate_password_policy("p@ss1", &config).is_err());
        assert!(PasswordHasher::validate_password_policy("password", &config).is_err());

        let strict = policy_config(true, true);
        assert!(PasswordHasher::validate_password_policy("p@ss1234", &strict).is_err());
        assert!(PasswordHasher::validate_password_policy("P@ss1234", &strict).is_ok());
        assert!(PasswordHasher::validate_password_policy("Pass1234", &strict).is_err());
    }
}
