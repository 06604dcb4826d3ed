use anyhow::Result;
use section_access_core::assignment::AssignmentSettings;
use section_access_core::directory::{DirectorySource, SqliteSource};
use section_access_core::error::AccessError;
use sqlx::SqlitePool;
use storage::queries;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignAction {
    Add,
    Remove,
}

/// Adds or removes a site section reference on `user`, on behalf of `actor`.
/// Returns whether anything changed.
pub async fn change_assignment(
    pool: &SqlitePool,
    settings: &AssignmentSettings,
    actor: &str,
    user: &str,
    section: &str,
    action: AssignAction,
) -> Result<bool> {
    let directory = SqliteSource::new(pool.clone()).load_directory().await?;
    let actor = directory
        .find_user(actor)
        .ok_or_else(|| AccessError::UnknownUser(actor.to_string()))?;
    settings.ensure_may_assign(actor)?;

    let target = directory
        .find_user(user)
        .ok_or_else(|| AccessError::UnknownUser(user.to_string()))?;
    let section = directory
        .section_by_label(section)
        .ok_or_else(|| AccessError::UnknownSection(section.to_string()))?;

    let changed = match action {
        AssignAction::Add => queries::assign_section(pool, target.id, section.id).await?,
        AssignAction::Remove => queries::unassign_section(pool, target.id, section.id).await?,
    };
    info!(
        actor = %actor.name,
        user = %target.name,
        section = %section.label,
        ?action,
        changed,
        "section assignment"
    );
    Ok(changed)
}
