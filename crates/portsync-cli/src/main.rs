//! portsync CLI
//!
//! Restores `port` bindings on compute instances in Terraform state after an
//! OpenStack upgrade. Stdout carries only commands for the operator to run;
//! logs and errors go to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use portsync_core::logging_facility::{self, Profile};
use portsync_core_types::RequestId;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "portsync")]
#[command(about = "Reconcile Terraform state with live OpenStack ports", long_about = None)]
struct Cli {
    /// Log format on stderr
    #[arg(long, value_enum, global = true, default_value_t = LogProfile::Human)]
    log_profile: LogProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogProfile {
    Human,
    Json,
    Off,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Human => Profile::Development,
            LogProfile::Json => Profile::Production,
            LogProfile::Off => Profile::Test,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the port imports still needed, or fix the state file
    Reconcile(commands::reconcile::ReconcileArgs),
    /// Show what the state file declares: ids, names and the IP index
    Inspect(commands::inspect::InspectArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, ".env file ignored");
        }
    }

    let request_id = RequestId::new();
    let span = tracing::info_span!("portsync", request_id = %request_id);
    let _entered = span.enter();

    let result = match cli.command {
        Commands::Reconcile(args) => commands::reconcile::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
    };

    if let Err(e) = result {
        let e = e.with_request_id(request_id);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
