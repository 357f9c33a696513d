//! Seed data for local development and the CLI `seed` command.

use sqlx::Row;
use tracing::info;

use crate::DbPool;

const DEMO_ORG_SQL: &str = include_str!("../../../config/fixtures/demo_org.sql");

/// Counts of the rows the demo dataset leaves behind, reported back to the
/// operator after seeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub enterprises: i64,
    pub departments: i64,
    pub positions: i64,
    pub employees: i64,
    pub processes: i64,
    pub flow_steps: i64,
}

/// Applies the bundled demo organization. The script is idempotent, so
/// seeding an already-seeded database is a no-op apart from timestamps.
pub async fn seed_demo_org(pool: &DbPool) -> Result<SeedSummary, sqlx::Error> {
    sqlx::raw_sql(DEMO_ORG_SQL).execute(pool).await?;

    let summary = SeedSummary {
        enterprises: count(pool, "enterprise").await?,
        departments: count(pool, "department").await?,
        positions: count(pool, "position").await?,
        employees: count(pool, "employee").await?,
        processes: count(pool, "approval_process").await?,
        flow_steps: count(pool, "approval_flow_step").await?,
    };
    info!(
        enterprises = summary.enterprises,
        departments = summary.departments,
        employees = summary.employees,
        "seeded demo organization"
    );
    Ok(summary)
}

async fn count(pool: &DbPool, table: &str) -> Result<i64, sqlx::Error> {
    // `table` comes from the fixed list above, never from user input.
    let row = sqlx::query(&format!("SELECT COUNT(*) AS count FROM {table}"))
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}

#[cfg(test)]
mod tests {
    use super::seed_demo_org;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn demo_seed_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let first = seed_demo_org(&pool).await.expect("first seed");
        let second = seed_demo_org(&pool).await.expect("second seed");

        assert_eq!(first, second);
        assert_eq!(first.enterprises, 1);
        assert_eq!(first.departments, 3);
        assert_eq!(first.employees, 3);
        assert_eq!(first.processes, 2);
        assert_eq!(first.flow_steps, 1);
    }
}
