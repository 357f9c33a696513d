use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Breadth of requesters an approver may act on.
///
/// The three variants form a total order: `OwnDepartment` is the most
/// restrictive, `Enterprise` the widest. Scope intersection and the
/// widest-grant fold in the routing engine both rely on this ordering, so it
/// is kept in an explicit rank table rather than derived from declaration
/// order or string comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalScope {
    OwnDepartment,
    ChildDepartments,
    Enterprise,
}

impl ApprovalScope {
    fn rank(self) -> u8 {
        match self {
            Self::OwnDepartment => 0,
            Self::ChildDepartments => 1,
            Self::Enterprise => 2,
        }
    }

    /// The more restrictive of the two scopes.
    pub fn narrower(self, other: Self) -> Self {
        if self.rank() <= other.rank() {
            self
        } else {
            other
        }
    }

    /// The less restrictive of the two scopes.
    pub fn wider(self, other: Self) -> Self {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnDepartment => "own_department",
            Self::ChildDepartments => "child_departments",
            Self::Enterprise => "enterprise",
        }
    }
}

impl std::str::FromStr for ApprovalScope {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "own_department" => Ok(Self::OwnDepartment),
            "child_departments" => Ok(Self::ChildDepartments),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(DomainError::InvalidScope { value: other.to_string() }),
        }
    }
}

impl std::fmt::Display for ApprovalScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ApprovalScope::{ChildDepartments, Enterprise, OwnDepartment};

    #[test]
    fn narrower_follows_the_scope_ordering() {
        assert_eq!(OwnDepartment.narrower(Enterprise), OwnDepartment);
        assert_eq!(Enterprise.narrower(ChildDepartments), ChildDepartments);
        assert_eq!(ChildDepartments.narrower(ChildDepartments), ChildDepartments);
    }

    #[test]
    fn wider_is_the_dual_of_narrower() {
        assert_eq!(OwnDepartment.wider(Enterprise), Enterprise);
        assert_eq!(ChildDepartments.wider(OwnDepartment), ChildDepartments);
    }

    #[test]
    fn scope_round_trips_through_strings() {
        for scope in [OwnDepartment, ChildDepartments, Enterprise] {
            assert_eq!(scope.as_str().parse::<super::ApprovalScope>().ok(), Some(scope));
        }
        assert!("everything".parse::<super::ApprovalScope>().is_err());
    }
}
