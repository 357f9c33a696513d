use crate::commands::CommandResult;
use orgflow_core::config::{AppConfig, LoadOptions};
use orgflow_db::{connect, migrations, seed_demo_org, SeedSummary};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
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
                "seed",
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

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let summary = seed_demo_org(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 6u8))?;

        pool.close().await;
        Ok::<SeedSummary, (&'static str, String, u8)>(summary)
    });

    match result {
        Ok(summary) => CommandResult::success("seed", render_summary(&summary)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn render_summary(summary: &SeedSummary) -> String {
    format!(
        "demo organization loaded: {} enterprise(s), {} department(s), {} position(s), \
         {} employee(s), {} process(es), {} flow step(s)",
        summary.enterprises,
        summary.departments,
        summary.positions,
        summary.employees,
        summary.processes,
        summary.flow_steps,
    )
}

#[cfg(test)]
mod tests {
    use orgflow_db::SeedSummary;

    use super::render_summary;

    #[test]
    fn summary_message_reports_every_table() {
        let message = render_summary(&SeedSummary {
            enterprises: 1,
            departments: 3,
            positions: 3,
            employees: 3,
            processes: 2,
            flow_steps: 1,
        });

        assert_eq!(
            message,
            "demo organization loaded: 1 enterprise(s), 3 department(s), 3 position(s), \
             3 employee(s), 2 process(es), 1 flow step(s)"
        );
    }
}
