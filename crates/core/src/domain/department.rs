use serde::{Deserialize, Serialize};

use crate::domain::enterprise::EnterpriseId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub String);

/// Node of the per-enterprise department tree.
///
/// `parent_id` is `None` for roots. Well-formed data is a forest, but the
/// routing engine never assumes that: traversals guard against cycles and
/// against parents pointing into other enterprises.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub enterprise_id: EnterpriseId,
    pub name: String,
    pub parent_id: Option<DepartmentId>,
}
