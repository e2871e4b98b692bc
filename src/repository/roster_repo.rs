//! Student / faculty roster repository
//!
//! Accounts and their profile rows are written together inside one
//! transaction, so a failed profile insert never leaves an orphan user.

use crate::{
    error::AppError,
    models::roster::*,
};
use sqlx::PgPool;

pub struct RosterRepository {
    db: PgPool,
}

impl RosterRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建账户及其档案，返回用户 ID
    pub async fn create(
        &self,
        kind: RosterKind,
        req: &CreateMemberRequest,
        password_hash: &str,
    ) -> Result<i64, AppError> {
        let mut tx = self.db.begin().await?;

        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password_hash, role, name, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&req.username)
        .bind(password_hash)
        .bind(kind.role().as_str())
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from_unique_violation)?;

        match kind {
            RosterKind::Student => {
                sqlx::query(
                    "INSERT INTO student_profiles (user_id, department_id, year) VALUES ($1, $2, $3)",
                )
                .bind(user_id)
                .bind(req.department_id)
                .bind(req.year)
                .execute(&mut *tx)
                .await?;
            }
            RosterKind::Faculty => {
                sqlx::query("INSERT INTO faculty_profiles (user_id, department_id) VALUES ($1, $2)")
                    .bind(user_id)
                    .bind(req.department_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(user_id, role = %kind.role(), "Roster member created");
        Ok(user_id)
    }

    /// 列出所有成员
    pub async fn list(&self, kind: RosterKind) -> Result<Vec<MemberRow>, AppError> {
        let sql = format!(
            r#"
            SELECT u.id, u.username, u.name, u.email, u.phone, p.department_id
            FROM users u
            JOIN {} p ON u.id = p.user_id
            ORDER BY u.id
            "#,
            kind.profile_table()
        );

        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    /// 更新账户与档案，成员不存在时返回 false
    pub async fn update(
        &self,
        kind: RosterKind,
        user_id: i64,
        req: &UpdateMemberRequest,
    ) -> Result<bool, AppError> {
        let mut tx = self.db.begin().await?;

        let sql = format!(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                updated_at = NOW()
            WHERE id = $1
              AND EXISTS (SELECT 1 FROM {} p WHERE p.user_id = $1)
            "#,
            kind.profile_table()
        );

        let updated = sqlx::query(&sql)
            .bind(user_id)
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.email)
            .bind(&req.phone)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_unique_violation)?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let sql = format!(
            "UPDATE {} SET department_id = COALESCE($2, department_id) WHERE user_id = $1",
            kind.profile_table()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(req.department_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// 删除成员账户（档案随外键级联删除）
    pub async fn delete(&self, kind: RosterKind, user_id: i64) -> Result<bool, AppError> {
        let sql = format!(
            "DELETE FROM users WHERE id = $1 AND id IN (SELECT user_id FROM {})",
            kind.profile_table()
        );

        let result = sqlx::query(&sql).bind(user_id).execute(&self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按姓名模糊搜索成员
    pub async fn search(&self, kind: RosterKind, term: Option<&str>) -> Result<Vec<MemberRow>, AppError> {
        let sql = format!(
            r#"
            SELECT u.id, u.username, u.name, u.email, u.phone, p.department_id
            FROM users u
            JOIN {} p ON u.id = p.user_id
            WHERE COALESCE(u.name, '') ILIKE $1
            ORDER BY u.name
            "#,
            kind.profile_table()
        );

        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(contains_pattern(term))
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    /// 学生与教师数量
    pub async fn counts(&self) -> Result<RosterCounts, AppError> {
        let (student_count, faculty_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM student_profiles),
                (SELECT COUNT(*) FROM faculty_profiles)
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(RosterCounts {
            student_count,
            faculty_count,
        })
    }

    /// 学生本人的档案
    pub async fn student_profile(&self, user_id: i64) -> Result<Option<StudentProfile>, AppError> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            r#"
            SELECT s.id, s.user_id, u.name, u.email, s.department_id, s.year
            FROM student_profiles s
            JOIN users u ON u.id = s.user_id
            WHERE s.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(profile)
    }

    /// 按姓名、院系、年级筛选学生
    pub async fn search_students(&self, query: &StudentSearchQuery) -> Result<Vec<StudentProfile>, AppError> {
        let rows = sqlx::query_as::<_, StudentProfile>(
            r#"
            SELECT s.id, s.user_id, u.name, u.email, s.department_id, s.year
            FROM student_profiles s
            JOIN users u ON u.id = s.user_id
            WHERE COALESCE(u.name, '') ILIKE $1
              AND ($2::BIGINT IS NULL OR s.department_id = $2)
              AND ($3::INTEGER IS NULL OR s.year = $3)
            ORDER BY u.name
            "#,
        )
        .bind(contains_pattern(query.name.as_deref()))
        .bind(query.department_id)
        .bind(query.year)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
