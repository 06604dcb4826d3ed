//! Registry of access checks keyed by capability tag, and the verdict that
//! combines their votes.

use crate::access::{AccessResult, DefaultPosture};
use crate::config::AccessConfig;
use crate::error::AccessError;
use crate::evaluator::{EvaluatorOptions, PathResolver, PathSectionAccessEvaluator, SectionLookup};
use crate::models::{ContentItem, Operation, UserAccount};
use crate::permission::NodePermissionCheck;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub trait AccessCheck: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, user: &UserAccount, item: &ContentItem, op: Operation) -> AccessResult;
}

impl<L> AccessCheck for PathSectionAccessEvaluator<L>
where
    L: SectionLookup + PathResolver + Send + Sync,
{
    fn name(&self) -> &str {
        "path_section"
    }

    fn check(&self, user: &UserAccount, item: &ContentItem, op: Operation) -> AccessResult {
        PathSectionAccessEvaluator::check(self, user, item, op)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Vote {
    pub check: String,
    pub result: AccessResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub result: AccessResult,
    pub granted: bool,
    pub votes: Vec<Vote>,
}

#[derive(Default, Clone)]
pub struct AccessRegistry {
    checks: HashMap<String, Arc<dyn AccessCheck>>,
    enabled: Vec<String>,
    pub posture: DefaultPosture,
}

impl AccessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check under its own name.
    pub fn with_check(mut self, check: Arc<dyn AccessCheck>) -> Self {
        self.checks.insert(check.name().to_string(), check);
        self
    }

    pub fn with_posture(mut self, posture: DefaultPosture) -> Self {
        self.posture = posture;
        self
    }

    /// Enables registered checks in the given order, replacing any previous
    /// selection.
    pub fn enable<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, AccessError> {
        let mut enabled = Vec::with_capacity(names.len());
        for name in names {
            let name: &str = name.as_ref();
            if !self.checks.contains_key(name) {
                return Err(AccessError::UnknownCheck(name.to_string()));
            }
            if !enabled.iter().any(|n: &String| n == name) {
                enabled.push(name.to_string());
            }
        }
        self.enabled = enabled;
        Ok(self)
    }

    pub fn enabled(&self) -> &[String] {
        &self.enabled
    }

    pub fn evaluate(&self, user: &UserAccount, item: &ContentItem, op: Operation) -> Verdict {
        let votes: Vec<Vote> = self
            .enabled
            .iter()
            .filter_map(|name| self.checks.get(name))
            .map(|check| Vote {
                check: check.name().to_string(),
                result: check.check(user, item, op),
            })
            .collect();
        let result = AccessResult::combine(votes.iter().map(|v| v.result));
        let granted = self.posture.grants(result);
        debug!(user = %user.name, item = item.id, %op, %result, granted, "access verdict");
        Verdict {
            result,
            granted,
            votes,
        }
    }

    /// Items among `items` the user is granted `op` on.
    pub fn permitted<'a, I>(
        &self,
        user: &UserAccount,
        items: I,
        op: Operation,
    ) -> Vec<&'a ContentItem>
    where
        I: IntoIterator<Item = &'a ContentItem>,
    {
        items
            .into_iter()
            .filter(|item| self.evaluate(user, item, op).granted)
            .collect()
    }
}

/// Registers the built-in checks over `lookup` and enables the ones named in
/// the access configuration.
pub fn build_registry<L>(cfg: &AccessConfig, lookup: L) -> Result<AccessRegistry, AccessError>
where
    L: SectionLookup + PathResolver + Send + Sync + 'static,
{
    let evaluator = PathSectionAccessEvaluator::new(
        lookup,
        EvaluatorOptions {
            no_match: cfg.no_match,
            operations: cfg.operations.clone(),
            bundles: cfg.bundles.clone(),
        },
    );
    AccessRegistry::new()
        .with_check(Arc::new(evaluator))
        .with_check(Arc::new(NodePermissionCheck))
        .with_posture(cfg.default_posture)
        .enable(cfg.checks.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NoMatchPolicy;
    use crate::directory::SectionDirectory;
    use crate::models::SiteSection;

    fn editor(sections: &[i64]) -> UserAccount {
        UserAccount {
            id: 1,
            name: "editor".into(),
            roles: vec!["editor".into()],
            permissions: vec!["edit any article content".into()],
            sections: sections.to_vec(),
        }
    }

    fn news_article() -> ContentItem {
        ContentItem {
            id: 1,
            bundle: "article".into(),
            title: "A news article".into(),
            alias: Some("/news/something".into()),
        }
    }

    fn registry(no_match: NoMatchPolicy) -> AccessRegistry {
        let directory = SectionDirectory::new(
            vec![],
            vec![
                SiteSection {
                    id: 1,
                    label: "News".into(),
                    prefixes: vec!["/news".into()],
                },
                SiteSection {
                    id: 2,
                    label: "Banana".into(),
                    prefixes: vec!["/blog".into()],
                },
            ],
            vec![],
        );
        let evaluator = PathSectionAccessEvaluator::new(
            directory,
            EvaluatorOptions {
                no_match,
                ..EvaluatorOptions::default()
            },
        );
        AccessRegistry::new()
            .with_check(Arc::new(evaluator))
            .with_check(Arc::new(NodePermissionCheck))
            .enable(&["path_section", "node_permission"])
            .unwrap()
    }

    #[test]
    fn user_without_sections_falls_back_to_blanket_permission() {
        let verdict = registry(NoMatchPolicy::Deny).evaluate(&editor(&[]), &news_article(), Operation::Update);
        assert_eq!(verdict.result, AccessResult::Allow);
        assert!(verdict.granted);
        assert_eq!(verdict.votes[0].result, AccessResult::Abstain);
        assert_eq!(verdict.votes[1].result, AccessResult::Allow);
    }

    #[test]
    fn authoritative_no_match_overrides_blanket_permission() {
        let verdict = registry(NoMatchPolicy::Deny).evaluate(&editor(&[2]), &news_article(), Operation::Update);
        assert_eq!(verdict.result, AccessResult::Deny);
        assert!(!verdict.granted);
    }

    #[test]
    fn abstaining_no_match_defers_to_blanket_permission() {
        let verdict = registry(NoMatchPolicy::Abstain).evaluate(&editor(&[2]), &news_article(), Operation::Update);
        assert_eq!(verdict.result, AccessResult::Allow);
    }

    #[test]
    fn posture_decides_when_every_check_abstains() {
        let mut user = editor(&[]);
        user.permissions.clear();
        let reg = registry(NoMatchPolicy::Deny);
        assert!(!reg.evaluate(&user, &news_article(), Operation::Update).granted);
        let reg = reg.with_posture(DefaultPosture::Allow);
        assert!(reg.evaluate(&user, &news_article(), Operation::Update).granted);
    }

    #[test]
    fn registry_follows_access_config() {
        let cfg = AccessConfig {
            checks: vec!["path_section".into()],
            no_match: NoMatchPolicy::Abstain,
            ..AccessConfig::default()
        };
        let reg = build_registry(&cfg, SectionDirectory::default()).unwrap();
        assert_eq!(reg.enabled().to_vec(), vec!["path_section".to_string()]);

        let verdict = reg.evaluate(&editor(&[]), &news_article(), Operation::Update);
        assert_eq!(verdict.votes.len(), 1);
        assert_eq!(verdict.result, AccessResult::Abstain);
        assert!(!verdict.granted);
    }

    #[test]
    fn enabling_an_unregistered_check_fails() {
        let err = AccessRegistry::new().enable(&["missing"]).err().unwrap();
        assert!(matches!(err, AccessError::UnknownCheck(name) if name == "missing"));
    }
}
