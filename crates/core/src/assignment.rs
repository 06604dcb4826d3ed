//! Which roles may reference site sections from user accounts.

use crate::error::AccessError;
use crate::models::UserAccount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentSettings {
    /// Roles allowed to add site sections to users. Empty means nobody.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AssignmentSettings {
    pub fn may_assign(&self, actor: &UserAccount) -> bool {
        self.roles.iter().any(|role| actor.has_role(role))
    }

    pub fn ensure_may_assign(&self, actor: &UserAccount) -> Result<(), AccessError> {
        if self.may_assign(actor) {
            Ok(())
        } else {
            Err(AccessError::AssignmentDenied {
                actor: actor.name.clone(),
            })
        }
    }
}
