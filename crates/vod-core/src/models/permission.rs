use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Operation a grant applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Update,
    Delete,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Action::Read => write!(f, "read"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// Who a grant applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Principal {
    /// Anyone, including anonymous readers
    Any,
    Team(String),
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Principal::Any => write!(f, "any"),
            Principal::Team(id) => write!(f, "team:{}", id),
        }
    }
}

/// A single `(action, principal)` grant, rendered as `read("any")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub action: Action,
    pub principal: Principal,
}

impl Permission {
    pub fn new(action: Action, principal: Principal) -> Self {
        Self { action, principal }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}(\"{}\")", self.action, self.principal)
    }
}

/// Ordered set of grants attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList(Vec<Permission>);

impl AccessControlList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public read, plus update and delete for the owning team when one is given.
    ///
    /// A blank team identifier is treated as absent.
    pub fn for_upload(team_id: Option<&str>) -> Self {
        let mut acl = Self::new().grant(Action::Read, Principal::Any);
        if let Some(team) = team_id.map(str::trim).filter(|t| !t.is_empty()) {
            let owner = Principal::Team(team.to_string());
            acl = acl
                .grant(Action::Update, owner.clone())
                .grant(Action::Delete, owner);
        }
        acl
    }

    /// Adds a grant, ignoring exact duplicates.
    pub fn grant(mut self, action: Action, principal: Principal) -> Self {
        let permission = Permission::new(action, principal);
        if !self.0.contains(&permission) {
            self.0.push(permission);
        }
        self
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.0
    }

    /// Permission strings in grant order
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_rendering() {
        let p = Permission::new(Action::Update, Principal::Team("team_1".to_string()));
        assert_eq!(p.to_string(), "update(\"team:team_1\")");
        assert_eq!(
            Permission::new(Action::Read, Principal::Any).to_string(),
            "read(\"any\")"
        );
    }

    #[test]
    fn test_upload_acl_with_team() {
        let acl = AccessControlList::for_upload(Some("team_1"));
        assert_eq!(
            acl.to_strings(),
            vec![
                "read(\"any\")".to_string(),
                "update(\"team:team_1\")".to_string(),
                "delete(\"team:team_1\")".to_string(),
            ]
        );
    }

    #[test]
    fn test_upload_acl_without_team() {
        assert_eq!(
            AccessControlList::for_upload(None).to_strings(),
            vec!["read(\"any\")".to_string()]
        );
        assert_eq!(
            AccessControlList::for_upload(Some("   ")).to_strings(),
            vec!["read(\"any\")".to_string()]
        );
    }

    #[test]
    fn test_grant_ignores_duplicates() {
        let acl = AccessControlList::new()
            .grant(Action::Read, Principal::Any)
            .grant(Action::Read, Principal::Any);
        assert_eq!(acl.permissions().len(), 1);
    }
}
