//! Enrollment queries

use crate::{error::AppError, models::enrollment::*};
use sqlx::PgPool;

pub struct EnrollmentRepository {
    db: PgPool,
}

impl EnrollmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 教师所授课程的学生名单
    pub async fn class_list(&self, faculty_id: i64) -> Result<Vec<ClassListEntry>, AppError> {
        let rows = sqlx::query_as::<_, ClassListEntry>(
            r#"
            SELECT u.id, u.name, u.email, u.phone, c.name AS course_name
            FROM enrollments e
            JOIN users u ON u.id = e.student_id
            JOIN courses c ON c.id = e.course_id
            WHERE c.faculty_id = $1
            ORDER BY c.name, u.name
            "#,
        )
        .bind(faculty_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// 每门课程的选课人数
    pub async fn counts_by_course(&self) -> Result<Vec<CourseEnrollmentCount>, AppError> {
        let rows = sqlx::query_as::<_, CourseEnrollmentCount>(
            r#"
            SELECT c.name AS course_name, COUNT(e.student_id) AS enrollment_count
            FROM courses c
            LEFT JOIN enrollments e ON e.course_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
