//! SQLite persistence for the organizational master data and approval
//! process configuration, plus the snapshot loader the routing engine
//! consumes.

pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;
pub mod snapshot;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{seed_demo_org, SeedSummary};
pub use migrations::run_pending;
pub use repositories::{
    InMemoryOrganizationRepository, InMemoryProcessRepository, OrganizationRepository,
    ProcessRepository, RepositoryError, SqlOrganizationRepository, SqlProcessRepository,
};
pub use snapshot::{load_routing_snapshot, RoutingSnapshot};
