//! TOML fixtures describing sections, users and content.
//!
//! Users reference sections by label; ids are assigned in file order
//! starting at 1. Content ids are explicit.

use crate::directory::{DirectorySource, SectionDirectory};
use crate::error::AccessError;
use crate::models::{ContentItem, SiteSection, UserAccount};
use crate::path::PathPrefix;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub sections: Vec<SectionDef>,
    #[serde(default)]
    pub users: Vec<UserDef>,
    #[serde(default)]
    pub content: Vec<ContentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDef {
    pub label: String,
    #[serde(default)]
    pub prefixes: Vec<PathPrefix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDef {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Section labels.
    #[serde(default)]
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDef {
    pub id: i64,
    pub bundle: String,
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl Fixture {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read fixture {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parse fixture {}", path.display()))
    }

    pub fn to_directory(&self) -> Result<SectionDirectory, AccessError> {
        let sections: Vec<SiteSection> = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, def)| SiteSection {
                id: i as i64 + 1,
                label: def.label.clone(),
                prefixes: def.prefixes.iter().map(|p| p.to_string()).collect(),
            })
            .collect();

        let mut users = Vec::with_capacity(self.users.len());
        for (i, def) in self.users.iter().enumerate() {
            let mut assigned = Vec::with_capacity(def.sections.len());
            for label in &def.sections {
                let section = sections
                    .iter()
                    .find(|s| &s.label == label)
                    .ok_or_else(|| AccessError::UnknownSection(label.clone()))?;
                assigned.push(section.id);
            }
            users.push(UserAccount {
                id: i as i64 + 1,
                name: def.name.clone(),
                roles: def.roles.clone(),
                permissions: def.permissions.clone(),
                sections: assigned,
            });
        }

        let content = self
            .content
            .iter()
            .map(|def| ContentItem {
                id: def.id,
                bundle: def.bundle.clone(),
                title: def.title.clone(),
                alias: def.path.clone(),
            })
            .collect();

        Ok(SectionDirectory::new(users, sections, content))
    }
}

#[async_trait::async_trait]
impl DirectorySource for Fixture {
    async fn load_directory(&self) -> anyhow::Result<SectionDirectory> {
        Ok(self.to_directory()?)
    }
}
