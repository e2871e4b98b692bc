//! Enrollment query models

use serde::Serialize;

/// One student in a faculty member's class list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClassListEntry {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CourseEnrollmentCount {
    pub course_name: String,
    pub enrollment_count: i64,
}

/// Chart-shaped enrollment summary
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDashboard {
    pub labels: Vec<String>,
    pub enrollment_counts: Vec<i64>,
}

impl FromIterator<CourseEnrollmentCount> for EnrollmentDashboard {
    fn from_iter<I: IntoIterator<Item = CourseEnrollmentCount>>(iter: I) -> Self {
        let mut dashboard = EnrollmentDashboard::default();
        for row in iter {
            dashboard.labels.push(row.course_name);
            dashboard.enrollment_counts.push(row.enrollment_count);
        }
        dashboard
    }
}
