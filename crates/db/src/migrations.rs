use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// The embedded migration set as `(version, description)` pairs, in order.
/// The CLI reports these after a migrate run.
pub fn migration_versions() -> Vec<(i64, String)> {
    MIGRATOR.iter().map(|m| (m.version, m.description.to_string())).collect()
}

/// Whether the routing tables exist, for readiness probes.
pub async fn schema_ready(pool: &DbPool) -> Result<bool, sqlx::Error> {
    use sqlx::Row;

    let count: i64 = sqlx::query(
        "SELECT COUNT(*) AS count FROM sqlite_master
         WHERE type = 'table' AND name IN ('employee', 'approval_process', 'approval_flow_step')",
    )
    .fetch_one(pool)
    .await?
    .try_get("count")?;

    Ok(count == 3)
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    const MANAGED_TABLES: &[&str] = &[
        "enterprise",
        "department",
        "position",
        "employee",
        "approval_process",
        "approval_flow_step",
    ];

    #[tokio::test]
    async fn migrations_create_the_org_schema() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for table in MANAGED_TABLES {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|_| panic!("check table {table}"))
            .get::<i64, _>("count");
            assert_eq!(count, 1, "table `{table}` should exist after migration");
        }
    }

    #[test]
    fn migration_set_lists_the_org_schema() {
        let versions = super::migration_versions();
        assert_eq!(versions.first().map(|(v, d)| (*v, d.as_str())), Some((1, "org schema")));
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");
    }
}
