//! Subject repository

use crate::{error::AppError, models::subject::*};
use sqlx::PgPool;

pub struct SubjectRepository {
    db: PgPool,
}

impl SubjectRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: &SubjectRequest) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .fetch_one(&self.db)
        .await?;

        Ok(subject)
    }

    pub async fn list(&self) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        Ok(subjects)
    }

    pub async fn update(&self, id: i64, req: &SubjectRequest) -> Result<Option<Subject>, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "UPDATE subjects SET name = $2, description = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .fetch_optional(&self.db)
        .await?;

        Ok(subject)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
