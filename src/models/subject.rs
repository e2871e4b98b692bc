//! Subject catalogue models

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Create or replace a subject
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubjectRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub description: Option<String>,
}
