//! 凭证服务：注册、登录与令牌签发

use crate::{
    auth::{
        jwt::{Identity, TokenService},
        password::PasswordHasher,
    },
    config::AppConfig,
    error::AppError,
    models::{auth::*, user::*},
};
use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

/// Storage the credential service needs; nothing beyond single-record operations
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credential_by_username(&self, username: &str) -> Result<Option<Credential>, AppError>;

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>, AppError>;

    /// Insert a credential and return its id
    async fn insert_credential(&self, credential: &NewCredential) -> Result<i64, AppError>;
}

/// Token plus redacted identity, produced by a successful register or login
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: UserSummary,
}

const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    token_service: Arc<TokenService>,
    hasher: PasswordHasher,
    /// Hash verified against when the username is unknown
    dummy_hash: String,
    config: Arc<AppConfig>,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        token_service: Arc<TokenService>,
        config: Arc<AppConfig>,
    ) -> Result<Self, AppError> {
        let hasher = PasswordHasher::from_config(&config)?;
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            token_service,
            hasher,
            dummy_hash,
            config,
        })
    }

    /// 注册新账户并签发令牌
    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthOutcome, AppError> {
        // 空白邮箱视为未填写
        req.email = req.email.filter(|e| !e.trim().is_empty());
        req.validate()?;

        PasswordHasher::validate_password_policy(&req.password, &self.config)?;

        let email = req.email;

        if self
            .store
            .find_credential_by_username(&req.username)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateCredential("Username already taken".to_string()));
        }

        if let Some(email) = &email {
            if self.store.find_credential_by_email(email).await?.is_some() {
                return Err(AppError::DuplicateCredential("Email already registered".to_string()));
            }
        }

        let password_hash = self.hasher.hash_async(req.password).await?;

        let new_credential = NewCredential {
            username: req.username,
            password_hash,
            role: req.role,
            name: req.name,
            email,
            phone: req.phone,
        };

        let id = self.store.insert_credential(&new_credential).await?;

        let credential = Credential {
            id,
            username: new_credential.username,
            password_hash: new_credential.password_hash,
            role: new_credential.role,
            name: new_credential.name,
            email: new_credential.email,
        };

        tracing::info!(user_id = id, role = %credential.role, "User registered");

        self.issue(&credential)
    }

    /// 校验用户名与密码并签发令牌
    pub async fn login(&self, req: LoginRequest) -> Result<AuthOutcome, AppError> {
        let Some(credential) = self.store.find_credential_by_username(&req.username).await? else {
            // 未知用户同样执行一次哈希校验，响应时间不暴露用户名是否存在
            let _ = self
                .hasher
                .verify_async(req.password, self.dummy_hash.clone())
                .await;
            return Err(AppError::NotFound);
        };

        self.hasher
            .verify_async(req.password, credential.password_hash.clone())
            .await?;

        tracing::info!(user_id = credential.id, "User logged in");

        self.issue(&credential)
    }

    fn issue(&self, credential: &Credential) -> Result<AuthOutcome, AppError> {
        let identity = Identity {
            id: credential.id,
            username: credential.username.clone(),
            role: credential.role,
        };

        Ok(AuthOutcome {
            token: self.token_service.issue(&identity)?,
            user: UserSummary::from(credential),
        })
    }
}
