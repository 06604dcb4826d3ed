use crate::access::AccessResult;
use crate::models::{ContentItem, Operation, UserAccount};
use crate::registry::AccessCheck;

/// Blanket per-bundle permissions ("edit any article content" and friends).
/// Allows when the user holds the permission for the operation, otherwise
/// abstains.
#[derive(Debug, Default, Clone)]
pub struct NodePermissionCheck;

impl NodePermissionCheck {
    pub fn required_permission(item: &ContentItem, op: Operation) -> String {
        match op {
            Operation::View => "access content".to_string(),
            Operation::Update => format!("edit any {} content", item.bundle),
            Operation::Delete => format!("delete any {} content", item.bundle),
        }
    }
}

impl AccessCheck for NodePermissionCheck {
    fn name(&self) -> &str {
        "node_permission"
    }

    fn check(&self, user: &UserAccount, item: &ContentItem, op: Operation) -> AccessResult {
        if user.has_permission(&Self::required_permission(item, op)) {
            AccessResult::Allow
        } else {
            AccessResult::Abstain
        }
    }
}
