use serde::{Deserialize, Serialize};

use crate::domain::enterprise::EnterpriseId;
use crate::domain::scope::ApprovalScope;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub String);

/// Job position carrying the seniority rank and the default authority scope.
///
/// `enterprise_id = None` marks a global position template shared by every
/// enterprise. `hierarchy_level` grows with seniority; a flow step that
/// qualifies "level >= 5" therefore qualifies every position at level 5 and
/// above. `default_scope = None` is treated as `own_department` at
/// evaluation time (the most restrictive default).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub enterprise_id: Option<EnterpriseId>,
    pub name: String,
    pub hierarchy_level: i32,
    pub default_scope: Option<ApprovalScope>,
}
