//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::user::*,
    services::credential_service::CredentialStore,
};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 更新个人资料（未提供的字段保持不变）
    pub async fn update_profile(
        &self,
        id: i64,
        req: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .fetch_optional(&self.db)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(user)
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_credential_by_username(&self, username: &str) -> Result<Option<Credential>, AppError> {
        self.find_by_username(username)
            .await?
            .map(Credential::try_from)
            .transpose()
    }

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.find_by_email(email)
            .await?
            .map(Credential::try_from)
            .transpose()
    }

    async fn insert_credential(&self, credential: &NewCredential) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password_hash, role, name, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&credential.username)
        .bind(&credential.password_hash)
        .bind(credential.role.as_str())
        .bind(&credential.name)
        .bind(&credential.email)
        .bind(&credential.phone)
        .fetch_one(&self.db)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(id)
    }
}
