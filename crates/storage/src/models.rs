use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
}

/// One `(user_id, value)` pair from `user_roles` or `user_permissions`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserValueRow {
    pub user_id: i64,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSectionRow {
    pub user_id: i64,
    pub section_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionRow {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionPrefixRow {
    pub section_id: i64,
    pub delta: i64,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub bundle: String,
    pub title: String,
    pub alias: Option<String>,
}
