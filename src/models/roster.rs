//! Student and faculty roster models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which profile table an account belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Student,
    Faculty,
}

impl RosterKind {
    pub(crate) fn profile_table(&self) -> &'static str {
        match self {
            RosterKind::Student => "student_profiles",
            RosterKind::Faculty => "faculty_profiles",
        }
    }

    pub fn role(&self) -> super::user::Role {
        match self {
            RosterKind::Student => super::user::Role::Student,
            RosterKind::Faculty => super::user::Role::Faculty,
        }
    }
}

/// Admin request creating a student or faculty account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub department_id: Option<i64>,
    /// Study year, students only
    pub year: Option<i32>,
}

/// Admin request updating a student or faculty account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub department_id: Option<i64>,
}

/// Roster listing row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberRow {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i64>,
}

/// Student profile as seen by the student
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department_id: Option<i64>,
    pub year: Option<i32>,
}

/// `GET /api/student/search` query
#[derive(Debug, Default, Deserialize)]
pub struct StudentSearchQuery {
    pub name: Option<String>,
    pub department_id: Option<i64>,
    pub year: Option<i32>,
}

/// `GET /api/admin/search` query
#[derive(Debug, Default, Deserialize)]
pub struct MemberSearchQuery {
    pub query: Option<String>,
}

/// Admin search result
#[derive(Debug, Serialize)]
pub struct MemberSearchResponse {
    pub students: Vec<MemberRow>,
    pub faculty: Vec<MemberRow>,
}

/// Admin dashboard counters
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RosterCounts {
    pub student_count: i64,
    pub faculty_count: i64,
}

/// Builds an ILIKE pattern matching `term` anywhere, escaping wildcards
pub fn contains_pattern(term: Option<&str>) -> String {
    let term = term.unwrap_or("").trim();
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(Some("ali")), "%ali%");
        assert_eq!(contains_pattern(Some("50%_off")), "%50\\%\\_off%");
        assert_eq!(contains_pattern(None), "%%");
        assert_eq!(contains_pattern(Some("  bob ")), "%bob%");
    }

    #[test]
    fn test_roster_counts_use_camel_case() {
        let json = serde_json::to_value(RosterCounts {
            student_count: 3,
            faculty_count: 1,
        })
        .unwrap();
        assert_eq!(json["studentCount"], 3);
        assert_eq!(json["facultyCount"], 1);
    }

    #[test]
    fn test_roster_kind_roles() {
        assert_eq!(RosterKind::Student.role(), super::super::user::Role::Student);
        assert_eq!(RosterKind::Faculty.profile_table(), "faculty_profiles");
    }
}
