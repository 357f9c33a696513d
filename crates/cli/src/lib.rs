pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "orgflow",
    about = "Orgflow operator CLI",
    long_about = "Operate Orgflow migrations, demo data, approval routing checks, and config inspection.",
    after_help = "Examples:\n  orgflow migrate\n  orgflow resolve --process vacation_requests --employee emp-rosa\n  orgflow doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the idempotent demo organization into the configured database")]
    Seed,
    #[command(about = "Resolve the approvers an employee's request would route to")]
    Resolve {
        #[arg(long, help = "Approval process code, e.g. vacation_requests")]
        process: String,
        #[arg(long, help = "Requesting employee id")]
        employee: String,
        #[arg(long, help = "Also render the notification each approver would receive")]
        notify: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration, database connectivity, and schema readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Resolve { process, employee, notify } => {
            commands::resolve::run(&process, &employee, notify)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
