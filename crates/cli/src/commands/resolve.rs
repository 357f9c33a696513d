use serde::Serialize;

use orgflow_core::config::{AppConfig, LoadOptions};
use orgflow_core::domain::employee::EmployeeId;
use orgflow_core::notify::{ApprovalNotification, NotificationComposer};
use orgflow_core::routing::ResolvedApprover;
use orgflow_db::repositories::OrganizationRepository;
use orgflow_db::{connect, load_routing_snapshot, SqlOrganizationRepository};

use crate::commands::{serialize_json, CommandResult};

#[derive(Debug, Serialize)]
struct ResolvePayload {
    command: &'static str,
    status: &'static str,
    process: String,
    requester: String,
    approvers: Vec<ResolvedApprover>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notifications: Option<Vec<ApprovalNotification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

pub fn run(process_code: &str, employee_id: &str, notify: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "resolve",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "resolve",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let requester_id = EmployeeId(employee_id.to_string());
        let organization = SqlOrganizationRepository::new(pool.clone());
        let requester = organization
            .find_employee(&requester_id)
            .await
            .map_err(|error| ("repository", error.to_string(), 5u8))?;

        // Unknown requesters resolve to nobody rather than failing; the
        // routing contract treats broken references as silent misses.
        let Some(requester) = requester else {
            pool.close().await;
            return Ok(ResolvePayload {
                command: "resolve",
                status: "ok",
                process: process_code.to_string(),
                requester: employee_id.to_string(),
                approvers: Vec::new(),
                notifications: notify.then(Vec::new),
                note: Some("employee not found".to_string()),
            });
        };

        let snapshot = load_routing_snapshot(&pool, &requester.enterprise_id)
            .await
            .map_err(|error| ("snapshot_load", error.to_string(), 5u8))?;
        pool.close().await;

        let process = snapshot.catalog.find(process_code).cloned();
        let engine = snapshot.into_engine();
        let outcome = engine.resolve_routing(process_code, &requester_id);

        let notifications = match (notify, &process) {
            (true, Some(process)) => {
                Some(NotificationComposer::default().compose(&outcome, &requester, process))
            }
            (true, None) => Some(Vec::new()),
            (false, _) => None,
        };

        Ok::<ResolvePayload, (&'static str, String, u8)>(ResolvePayload {
            command: "resolve",
            status: "ok",
            process: process_code.to_string(),
            requester: employee_id.to_string(),
            approvers: outcome.approvers,
            notifications,
            note: None,
        })
    });

    match result {
        Ok(payload) => CommandResult { exit_code: 0, output: serialize_json(&payload) },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("resolve", error_class, message, exit_code)
        }
    }
}
