//! In-process snapshot of users, site sections and content.
//!
//! The evaluator reads from this snapshot only; building it is the job of a
//! [`DirectorySource`].

use crate::evaluator::{PathResolver, SectionLookup};
use crate::models::{ContentItem, SiteSection, UserAccount};
use crate::path;
use anyhow::Context;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct SectionDirectory {
    users: Vec<UserAccount>,
    sections: BTreeMap<i64, SiteSection>,
    content: BTreeMap<i64, ContentItem>,
}

impl SectionDirectory {
    pub fn new(
        users: Vec<UserAccount>,
        sections: Vec<SiteSection>,
        content: Vec<ContentItem>,
    ) -> Self {
        Self {
            users,
            sections: sections.into_iter().map(|s| (s.id, s)).collect(),
            content: content.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }

    pub fn sections(&self) -> impl Iterator<Item = &SiteSection> {
        self.sections.values()
    }

    pub fn content_items(&self) -> impl Iterator<Item = &ContentItem> {
        self.content.values()
    }

    pub fn section(&self, id: i64) -> Option<&SiteSection> {
        self.sections.get(&id)
    }

    pub fn section_by_label(&self, label: &str) -> Option<&SiteSection> {
        self.sections.values().find(|s| s.label == label)
    }

    pub fn content(&self, id: i64) -> Option<&ContentItem> {
        self.content.get(&id)
    }

    /// Finds a user by name, falling back to a numeric id. A user whose name
    /// is numeric therefore shadows the user with that id.
    pub fn find_user(&self, key: &str) -> Option<&UserAccount> {
        self.users
            .iter()
            .find(|u| u.name == key)
            .or_else(|| {
                let id: i64 = key.parse().ok()?;
                self.users.iter().find(|u| u.id == id)
            })
    }
}

impl SectionLookup for SectionDirectory {
    fn assigned_sections(&self, user: &UserAccount) -> Vec<SiteSection> {
        user.sections
            .iter()
            .filter_map(|id| {
                let section = self.sections.get(id).cloned();
                if section.is_none() {
                    warn!(user = %user.name, section = id, "dangling site section reference");
                }
                section
            })
            .collect()
    }
}

impl PathResolver for SectionDirectory {
    /// An alias that does not normalise to a usable path counts as unset.
    fn resolve_path(&self, item: &ContentItem) -> Option<String> {
        item.alias
            .as_deref()
            .and_then(path::normalize)
            .or_else(|| Some(item.canonical_path()))
    }
}

/// Produces a [`SectionDirectory`] ahead of access checks.
#[async_trait::async_trait]
pub trait DirectorySource: Send + Sync {
    async fn load_directory(&self) -> anyhow::Result<SectionDirectory>;
}

/// Reads the directory from the SQLite store.
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DirectorySource for SqliteSource {
    async fn load_directory(&self) -> anyhow::Result<SectionDirectory> {
        use storage::queries;

        let pool = &self.pool;
        let mut prefixes: HashMap<i64, Vec<String>> = HashMap::new();
        for row in queries::fetch_section_prefixes(pool)
            .await
            .context("load section prefixes")?
        {
            prefixes.entry(row.section_id).or_default().push(row.prefix);
        }
        let sections: Vec<SiteSection> = queries::fetch_sections(pool)
            .await
            .context("load sections")?
            .into_iter()
            .map(|row| SiteSection {
                prefixes: prefixes.remove(&row.id).unwrap_or_default(),
                id: row.id,
                label: row.label,
            })
            .collect();

        let mut roles: HashMap<i64, Vec<String>> = HashMap::new();
        for row in queries::fetch_user_roles(pool).await.context("load user roles")? {
            roles.entry(row.user_id).or_default().push(row.value);
        }
        let mut permissions: HashMap<i64, Vec<String>> = HashMap::new();
        for row in queries::fetch_user_permissions(pool)
            .await
            .context("load user permissions")?
        {
            permissions.entry(row.user_id).or_default().push(row.value);
        }
        let mut assigned: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in queries::fetch_user_sections(pool)
            .await
            .context("load user sections")?
        {
            assigned.entry(row.user_id).or_default().push(row.section_id);
        }
        let users: Vec<UserAccount> = queries::fetch_users(pool)
            .await
            .context("load users")?
            .into_iter()
            .map(|row| UserAccount {
                roles: roles.remove(&row.id).unwrap_or_default(),
                permissions: permissions.remove(&row.id).unwrap_or_default(),
                sections: assigned.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
            })
            .collect();

        let content: Vec<ContentItem> = queries::fetch_content(pool)
            .await
            .context("load content")?
            .into_iter()
            .map(|row| ContentItem {
                id: row.id,
                bundle: row.bundle,
                title: row.title,
                alias: row.alias,
            })
            .collect();

        info!(
            users = users.len(),
            sections = sections.len(),
            content = content.len(),
            "directory loaded from database"
        );
        Ok(SectionDirectory::new(users, sections, content))
    }
}
