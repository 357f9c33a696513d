//! End-to-end persistence contract: migrate, seed the demo organization,
//! load a snapshot, and resolve approvers through the engine.

use orgflow_core::domain::employee::EmployeeId;
use orgflow_core::domain::enterprise::EnterpriseId;
use orgflow_core::domain::scope::ApprovalScope;

use orgflow_db::{connect_with_settings, load_routing_snapshot, migrations, seed_demo_org};

async fn seeded_pool() -> orgflow_db::DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    seed_demo_org(&pool).await.expect("seed");
    pool
}

#[tokio::test]
async fn demo_vacation_request_routes_to_the_regional_manager() {
    let pool = seeded_pool().await;
    let snapshot = load_routing_snapshot(&pool, &EnterpriseId("ent-agrosur".to_string()))
        .await
        .expect("snapshot");
    let engine = snapshot.into_engine();

    // Rosa works in the warehouse under the North region; Marta manages
    // North with level 6, clearing the level-5 threshold.
    let outcome =
        engine.resolve_routing("vacation_requests", &EmployeeId("emp-rosa".to_string()));
    assert_eq!(outcome.approvers.len(), 1);
    assert_eq!(outcome.approvers[0].employee_id.0, "emp-marta");
    assert_eq!(outcome.approvers[0].effective_scope, ApprovalScope::ChildDepartments);
}

#[tokio::test]
async fn demo_requester_outside_the_manager_subtree_gets_no_approvers() {
    let pool = seeded_pool().await;
    let snapshot = load_routing_snapshot(&pool, &EnterpriseId("ent-agrosur".to_string()))
        .await
        .expect("snapshot");
    let engine = snapshot.into_engine();

    let approvers =
        engine.resolve_approvers("vacation_requests", &EmployeeId("emp-diego".to_string()));
    assert!(approvers.is_empty(), "South is not under Marta's child_departments scope");
}

#[tokio::test]
async fn kill_switched_demo_process_routes_to_nobody() {
    let pool = seeded_pool().await;
    let snapshot = load_routing_snapshot(&pool, &EnterpriseId("ent-agrosur".to_string()))
        .await
        .expect("snapshot");
    let engine = snapshot.into_engine();

    let approvers =
        engine.resolve_approvers("expense_claims", &EmployeeId("emp-rosa".to_string()));
    assert!(approvers.is_empty(), "requires_approval = 0 disables routing");
}

#[tokio::test]
async fn snapshot_only_contains_the_requested_enterprise() {
    let pool = seeded_pool().await;
    let snapshot = load_routing_snapshot(&pool, &EnterpriseId("ent-unknown".to_string()))
        .await
        .expect("snapshot");
    assert_eq!(snapshot.directory.department_count(), 0);
}
