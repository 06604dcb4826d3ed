//! Row-level reads and writes. Callers own the pool; nothing here caches.

use crate::models::{
    ContentRow, SectionPrefixRow, SectionRow, UserRow, UserSectionRow, UserValueRow,
};
use sqlx::SqlitePool;

pub async fn fetch_users(pool: &SqlitePool) -> anyhow::Result<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>("SELECT id, name FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn fetch_user_roles(pool: &SqlitePool) -> anyhow::Result<Vec<UserValueRow>> {
    let rows = sqlx::query_as::<_, UserValueRow>(
        "SELECT user_id, role AS value FROM user_roles ORDER BY user_id, role",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_user_permissions(pool: &SqlitePool) -> anyhow::Result<Vec<UserValueRow>> {
    let rows = sqlx::query_as::<_, UserValueRow>(
        "SELECT user_id, permission AS value FROM user_permissions ORDER BY user_id, permission",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_user_sections(pool: &SqlitePool) -> anyhow::Result<Vec<UserSectionRow>> {
    let rows = sqlx::query_as::<_, UserSectionRow>(
        "SELECT user_id, section_id FROM user_sections ORDER BY user_id, section_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_sections(pool: &SqlitePool) -> anyhow::Result<Vec<SectionRow>> {
    let rows = sqlx::query_as::<_, SectionRow>("SELECT id, label FROM site_sections ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn fetch_section_prefixes(pool: &SqlitePool) -> anyhow::Result<Vec<SectionPrefixRow>> {
    let rows = sqlx::query_as::<_, SectionPrefixRow>(
        "SELECT section_id, delta, prefix FROM section_prefixes ORDER BY section_id, delta",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_content(pool: &SqlitePool) -> anyhow::Result<Vec<ContentRow>> {
    let rows = sqlx::query_as::<_, ContentRow>(
        "SELECT id, bundle, title, alias FROM content_items ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_user_id(pool: &SqlitePool, name: &str) -> anyhow::Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE name = ?1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

pub async fn find_section_id(pool: &SqlitePool, label: &str) -> anyhow::Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM site_sections WHERE label = ?1")
        .bind(label)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Inserts or renames a user; returns its id. Roles and permissions are
/// replaced wholesale.
pub async fn upsert_user(
    pool: &SqlitePool,
    name: &str,
    roles: &[String],
    permissions: &[String],
) -> anyhow::Result<i64> {
    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO users (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *tx)
        .await?;
    let id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE name = ?1")
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM user_roles WHERE user_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for role in roles {
        sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?1, ?2)")
            .bind(id)
            .bind(role)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM user_permissions WHERE user_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for permission in permissions {
        sqlx::query("INSERT OR IGNORE INTO user_permissions (user_id, permission) VALUES (?1, ?2)")
            .bind(id)
            .bind(permission)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(id)
}

/// Inserts a section by label (or reuses it) and replaces its prefix list,
/// preserving the given order.
pub async fn upsert_section(
    pool: &SqlitePool,
    label: &str,
    prefixes: &[String],
) -> anyhow::Result<i64> {
    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO site_sections (label) VALUES (?1) ON CONFLICT(label) DO NOTHING")
        .bind(label)
        .execute(&mut *tx)
        .await?;
    let id: i64 = sqlx::query_scalar("SELECT id FROM site_sections WHERE label = ?1")
        .bind(label)
        .fetch_one(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM section_prefixes WHERE section_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for (delta, prefix) in prefixes.iter().enumerate() {
        sqlx::query("INSERT INTO section_prefixes (section_id, delta, prefix) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(delta as i64)
            .bind(prefix)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(id)
}

pub async fn assign_section(pool: &SqlitePool, user_id: i64, section_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("INSERT OR IGNORE INTO user_sections (user_id, section_id) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(section_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn unassign_section(
    pool: &SqlitePool,
    user_id: i64,
    section_id: i64,
) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM user_sections WHERE user_id = ?1 AND section_id = ?2")
        .bind(user_id)
        .bind(section_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Inserts content with an explicit id, or updates it in place.
pub async fn upsert_content(
    pool: &SqlitePool,
    id: i64,
    bundle: &str,
    title: &str,
    alias: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO content_items (id, bundle, title, alias) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           bundle=excluded.bundle,
           title=excluded.title,
           alias=excluded.alias",
    )
    .bind(id)
    .bind(bundle)
    .bind(title)
    .bind(alias)
    .execute(pool)
    .await?;
    Ok(())
}
