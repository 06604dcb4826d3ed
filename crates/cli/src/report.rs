//! Text and JSON rendering for command output.

use anyhow::Result;
use section_access_core::directory::SectionDirectory;
use section_access_core::models::{ContentItem, Operation, UserAccount};
use section_access_core::{PathResolver, Verdict};

pub fn verdict(
    user: &UserAccount,
    item: &ContentItem,
    op: Operation,
    verdict: &Verdict,
    json: bool,
) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "user": user.name,
            "content": item.id,
            "operation": op,
            "result": verdict.result,
            "granted": verdict.granted,
            "votes": verdict.votes,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    let mut out = format!(
        "{} {} node {} ({}): {}",
        user.name,
        op,
        item.id,
        item.title,
        if verdict.granted { "granted" } else { "refused" }
    );
    for vote in &verdict.votes {
        out.push_str(&format!("\n  {}: {}", vote.check, vote.result));
    }
    Ok(out)
}

pub fn editable(
    directory: &SectionDirectory,
    user: &UserAccount,
    op: Operation,
    items: &[&ContentItem],
    json: bool,
) -> Result<String> {
    let rows: Vec<(i64, String, String)> = items
        .iter()
        .map(|item| {
            let path = directory
                .resolve_path(item)
                .unwrap_or_else(|| item.canonical_path());
            (item.id, item.title.clone(), path)
        })
        .collect();
    if json {
        let value = serde_json::json!({
            "user": user.name,
            "operation": op,
            "content": rows
                .iter()
                .map(|(id, title, path)| serde_json::json!({ "id": id, "title": title, "path": path }))
                .collect::<Vec<_>>(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    if rows.is_empty() {
        return Ok(format!("{} may {} no content", user.name, op));
    }
    let lines: Vec<String> = rows
        .iter()
        .map(|(id, title, path)| format!("{id}\t{path}\t{title}"))
        .collect();
    Ok(lines.join("\n"))
}

pub fn sections(directory: &SectionDirectory, json: bool) -> Result<String> {
    if json {
        let value: Vec<serde_json::Value> = directory
            .sections()
            .map(|s| {
                let users: Vec<&str> = directory
                    .users()
                    .iter()
                    .filter(|u| u.sections.contains(&s.id))
                    .map(|u| u.name.as_str())
                    .collect();
                serde_json::json!({
                    "id": s.id,
                    "label": s.label,
                    "prefixes": s.prefixes,
                    "users": users,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    let lines: Vec<String> = directory
        .sections()
        .map(|s| {
            let prefixes = if s.prefixes.is_empty() {
                "-".to_string()
            } else {
                s.prefixes.join(", ")
            };
            format!("{}\t{}\t{}", s.id, s.label, prefixes)
        })
        .collect();
    Ok(lines.join("\n"))
}
