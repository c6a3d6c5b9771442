//! Team and crew membership.

use serde::{Deserialize, Serialize};
use siteward_auth::Role;

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub account_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl TeamMemberDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.display_name.trim().is_empty() {
            return Err(ValidationError::Empty("member display name"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_requires_display_name() {
        let draft = TeamMemberDraft {
            id: None,
            display_name: "".into(),
            email: None,
            role: Role::Worker,
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Empty("member display name"))
        );
    }

    #[test]
    fn test_member_round_trips_role_label() {
        let member = TeamMember {
            id: "mem-1".into(),
            account_id: "acc-1".into(),
            display_name: "P. Kowalski".into(),
            email: None,
            role: Role::Foreman,
            active: true,
        };
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["role"], "foreman");
    }
}
