use anyhow::{Context, Result};
use section_access_core::error::AccessError;
use section_access_core::fixture::Fixture;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use storage::queries;
use tracing::info;

#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub sections: usize,
    pub users: usize,
    pub content: usize,
    pub assignments: usize,
}

/// Writes a fixture into the database. Sections and users are matched by
/// label and name, content by id; existing rows are updated in place and
/// user section references are only ever added.
pub async fn import_fixture(pool: &SqlitePool, fixture: &Fixture) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    let mut section_ids: HashMap<&str, i64> = HashMap::new();
    for def in &fixture.sections {
        let prefixes: Vec<String> = def.prefixes.iter().map(|p| p.to_string()).collect();
        let id = queries::upsert_section(pool, &def.label, &prefixes)
            .await
            .with_context(|| format!("import section {}", def.label))?;
        section_ids.insert(def.label.as_str(), id);
        summary.sections += 1;
    }

    for def in &fixture.users {
        let user_id = queries::upsert_user(pool, &def.name, &def.roles, &def.permissions)
            .await
            .with_context(|| format!("import user {}", def.name))?;
        summary.users += 1;
        for label in &def.sections {
            let section_id = match section_ids.get(label.as_str()) {
                Some(id) => *id,
                None => queries::find_section_id(pool, label)
                    .await?
                    .ok_or_else(|| AccessError::UnknownSection(label.clone()))?,
            };
            if queries::assign_section(pool, user_id, section_id).await? {
                summary.assignments += 1;
            }
        }
    }

    for def in &fixture.content {
        queries::upsert_content(pool, def.id, &def.bundle, &def.title, def.path.as_deref())
            .await
            .with_context(|| format!("import content {}", def.id))?;
        summary.content += 1;
    }

    info!(
        sections = summary.sections,
        users = summary.users,
        content = summary.content,
        assignments = summary.assignments,
        "fixture imported"
    );
    Ok(summary)
}
