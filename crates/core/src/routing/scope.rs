use crate::domain::process::ApprovalFlowStep;
use crate::domain::scope::ApprovalScope;

/// Effective authority scope for one approver: the narrower of the
/// position's default scope (the ceiling the position is trusted with) and
/// the widest scope declared by the steps matching that approver (the
/// specific grant).
///
/// Within the fold over matching steps the *widest* scope wins: an author
/// who writes several rules for the same approver gets the union of the
/// grants. Between position and steps the *narrowest* wins: a step can
/// never extend authority beyond the position itself. A missing position
/// default fails closed to `OwnDepartment`.
///
/// Total over all inputs; steps without a declared scope contribute the
/// most restrictive grant.
pub fn resolve_effective_scope(
    position_default: Option<ApprovalScope>,
    matching_steps: &[&ApprovalFlowStep],
) -> ApprovalScope {
    let ceiling = position_default.unwrap_or(ApprovalScope::OwnDepartment);

    let granted = matching_steps
        .iter()
        .map(|step| step.scope.unwrap_or(ApprovalScope::OwnDepartment))
        .reduce(ApprovalScope::wider);

    match granted {
        Some(step_scope) => ceiling.narrower(step_scope),
        None => ceiling,
    }
}
