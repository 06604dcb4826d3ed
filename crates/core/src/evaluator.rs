//! Path-section access evaluation.
//!
//! A user is granted edit access to a content item when one of the site
//! sections referenced from the user carries a path prefix that is an
//! ancestor of (or equal to) the item's path. The evaluator only reads: the
//! lookups it is handed are expected to be resolved before a check runs.

use crate::access::{AccessResult, NoMatchPolicy};
use crate::models::{ContentItem, Operation, SiteSection, UserAccount};
use crate::path::{self, PathPrefix};
use tracing::{debug, warn};

/// Reads the site sections referenced from a user and the prefixes of a section.
pub trait SectionLookup {
    fn assigned_sections(&self, user: &UserAccount) -> Vec<SiteSection>;

    fn path_prefixes(&self, section: &SiteSection) -> Vec<String> {
        section.prefixes.clone()
    }
}

/// Resolves a content item to its alias, or its canonical path when no
/// alias is set. `None` means the item has no resolvable path.
pub trait PathResolver {
    fn resolve_path(&self, item: &ContentItem) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    pub no_match: NoMatchPolicy,
    pub operations: Vec<Operation>,
    /// Bundles gated by the evaluator; empty gates every bundle.
    pub bundles: Vec<String>,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            no_match: NoMatchPolicy::default(),
            operations: vec![Operation::Update],
            bundles: Vec::new(),
        }
    }
}

pub struct PathSectionAccessEvaluator<L> {
    lookup: L,
    options: EvaluatorOptions,
}

impl<L> PathSectionAccessEvaluator<L>
where
    L: SectionLookup + PathResolver,
{
    pub fn new(lookup: L, options: EvaluatorOptions) -> Self {
        Self { lookup, options }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Whether `op` on `item` falls under this evaluator at all.
    pub fn gates(&self, item: &ContentItem, op: Operation) -> bool {
        self.options.operations.contains(&op)
            && (self.options.bundles.is_empty()
                || self.options.bundles.iter().any(|b| b == &item.bundle))
    }

    pub fn check(&self, user: &UserAccount, item: &ContentItem, op: Operation) -> AccessResult {
        if !self.gates(item, op) {
            return AccessResult::Abstain;
        }
        self.can_edit(user, item)
    }

    pub fn can_edit(&self, user: &UserAccount, item: &ContentItem) -> AccessResult {
        let sections = self.lookup.assigned_sections(user);
        if sections.is_empty() {
            debug!(user = %user.name, item = item.id, "no site sections assigned; abstaining");
            return AccessResult::Abstain;
        }

        let Some(content_path) = self
            .lookup
            .resolve_path(item)
            .and_then(|raw| path::normalize(&raw))
        else {
            debug!(user = %user.name, item = item.id, "content path unresolved; abstaining");
            return AccessResult::Abstain;
        };

        for section in &sections {
            for raw in self.lookup.path_prefixes(section) {
                let prefix = match PathPrefix::parse(&raw) {
                    Ok(prefix) => prefix,
                    Err(err) => {
                        warn!(section = %section.label, %err, "skipping unusable prefix");
                        continue;
                    }
                };
                if prefix.covers(&content_path) {
                    debug!(
                        user = %user.name,
                        item = item.id,
                        path = %content_path,
                        section = %section.label,
                        prefix = %prefix,
                        "prefix matched; allowing"
                    );
                    return AccessResult::Allow;
                }
            }
        }

        let result = self.options.no_match.result();
        debug!(
            user = %user.name,
            item = item.id,
            path = %content_path,
            sections = sections.len(),
            %result,
            "no assigned prefix covers content path"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SectionDirectory;

    fn section(id: i64, label: &str, prefixes: &[&str]) -> SiteSection {
        SiteSection {
            id,
            label: label.to_string(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn user(id: i64, sections: &[i64]) -> UserAccount {
        UserAccount {
            id,
            name: format!("user{id}"),
            roles: vec!["editor".into()],
            permissions: vec!["edit any article content".into()],
            sections: sections.to_vec(),
        }
    }

    fn item(id: i64, alias: Option<&str>) -> ContentItem {
        ContentItem {
            id,
            bundle: "article".into(),
            title: format!("item {id}"),
            alias: alias.map(str::to_string),
        }
    }

    fn directory(users: &[UserAccount]) -> SectionDirectory {
        SectionDirectory::new(
            users.to_vec(),
            vec![
                section(1, "News", &["/news"]),
                section(2, "Banana", &["/blog"]),
                section(3, "Sports", &["/news/sports"]),
                section(4, "Empty", &[]),
            ],
            vec![],
        )
    }

    fn evaluator(
        users: &[UserAccount],
        no_match: NoMatchPolicy,
    ) -> PathSectionAccessEvaluator<SectionDirectory> {
        PathSectionAccessEvaluator::new(
            directory(users),
            EvaluatorOptions {
                no_match,
                ..EvaluatorOptions::default()
            },
        )
    }

    #[test]
    fn parent_section_grants_nested_content() {
        let u = user(1, &[1]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Abstain);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/news/something"))), AccessResult::Allow);
        assert_eq!(ev.can_edit(&u, &item(2, Some("/news"))), AccessResult::Allow);
    }

    #[test]
    fn sibling_section_does_not_grant() {
        let u = user(1, &[2]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Abstain);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/news/something"))), AccessResult::Abstain);
    }

    #[test]
    fn descendant_section_does_not_grant_ancestor_content() {
        let u = user(1, &[3]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Deny);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/news/something"))), AccessResult::Deny);
    }

    #[test]
    fn string_prefix_without_boundary_does_not_grant() {
        let u = user(1, &[1]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Deny);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/newsroom"))), AccessResult::Deny);
    }

    #[test]
    fn multiple_sections_are_ored() {
        let u = user(1, &[1, 2]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Deny);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/news/something"))), AccessResult::Allow);
        assert_eq!(ev.can_edit(&u, &item(2, Some("/blog/something-else"))), AccessResult::Allow);
    }

    #[test]
    fn no_sections_abstains_even_when_authoritative() {
        let u = user(1, &[]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Deny);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/news/something"))), AccessResult::Abstain);
    }

    #[test]
    fn unaliased_content_is_evaluated_on_canonical_path() {
        let u = user(1, &[1]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Deny);
        assert_eq!(ev.can_edit(&u, &item(7, None)), AccessResult::Deny);

        let node_section = SectionDirectory::new(
            vec![user(2, &[9])],
            vec![section(9, "Nodes", &["/node"])],
            vec![],
        );
        let ev = PathSectionAccessEvaluator::new(node_section, EvaluatorOptions::default());
        assert_eq!(ev.can_edit(&user(2, &[9]), &item(7, None)), AccessResult::Allow);
    }

    struct PathlessContent {
        sections: Vec<SiteSection>,
    }

    impl SectionLookup for PathlessContent {
        fn assigned_sections(&self, _user: &UserAccount) -> Vec<SiteSection> {
            self.sections.clone()
        }
    }

    impl PathResolver for PathlessContent {
        fn resolve_path(&self, _item: &ContentItem) -> Option<String> {
            None
        }
    }

    #[test]
    fn unresolvable_content_path_abstains_even_when_authoritative() {
        let ev = PathSectionAccessEvaluator::new(
            PathlessContent {
                sections: vec![section(1, "Everything", &["/"])],
            },
            EvaluatorOptions {
                no_match: NoMatchPolicy::Deny,
                ..EvaluatorOptions::default()
            },
        );
        let u = user(1, &[1]);
        let news = item(1, Some("/news/something"));
        assert_eq!(ev.can_edit(&u, &news), AccessResult::Abstain);
        assert_eq!(ev.check(&u, &news, Operation::Update), AccessResult::Abstain);
    }

    #[test]
    fn section_without_prefixes_never_matches() {
        let u = user(1, &[4]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Abstain);
        assert_eq!(ev.can_edit(&u, &item(1, Some("/news"))), AccessResult::Abstain);
    }

    #[test]
    fn ungated_operation_abstains() {
        let u = user(1, &[2]);
        let ev = evaluator(&[u.clone()], NoMatchPolicy::Deny);
        let news = item(1, Some("/news/something"));
        assert_eq!(ev.check(&u, &news, Operation::View), AccessResult::Abstain);
        assert_eq!(ev.check(&u, &news, Operation::Update), AccessResult::Deny);
    }

    #[test]
    fn bundle_filter_limits_gating() {
        let u = user(1, &[2]);
        let ev = PathSectionAccessEvaluator::new(
            directory(&[u.clone()]),
            EvaluatorOptions {
                bundles: vec!["page".into()],
                ..EvaluatorOptions::default()
            },
        );
        assert_eq!(
            ev.check(&u, &item(1, Some("/news/x")), Operation::Update),
            AccessResult::Abstain
        );
    }
}
