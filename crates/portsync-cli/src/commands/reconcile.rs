//! Reconcile command

use std::path::PathBuf;

use clap::Args;
use portsync_core::inventory::InventoryProvider;
use portsync_core::{ExError, PortSlots, ReconcileRequest, RunMode, RunOutcome};
use portsync_openstack::{OpenStackConfig, OpenStackProvider};
use portsync_store::{load_document, load_inventory_file, write_document};

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Live server name in OpenStack (exact match)
    #[arg(long)]
    pub os_name: String,

    /// Compute instance resource name in the state file
    #[arg(long)]
    pub tf_name: String,

    /// Port slots in attachment order: `port_name:network,other_port:network`
    #[arg(long)]
    pub tf_ports: PortSlots,

    /// State file to read
    #[arg(long)]
    pub source: PathBuf,

    /// Where to write the fixed state
    #[arg(long, required_unless_present = "check")]
    pub target: Option<PathBuf>,

    /// Only report; never write
    #[arg(long)]
    pub check: bool,

    /// Read live servers from this JSON file instead of OpenStack
    #[arg(long)]
    pub inventory_file: Option<PathBuf>,

    /// Fail when one IP is claimed by two ports or interfaces
    #[arg(long)]
    pub strict_ips: bool,
}

pub fn execute(args: ReconcileArgs) -> Result<(), ExError> {
    let mut document = load_document(&args.source)?;
    let provider = open_provider(args.inventory_file.as_deref())?;

    let request = ReconcileRequest {
        tf_name: args.tf_name,
        os_name: args.os_name,
        slots: args.tf_ports,
        strict_ips: args.strict_ips,
    };
    let mode = if args.check { RunMode::Check } else { RunMode::Apply };

    match portsync_core::run(&mut document, provider.as_ref(), &request, mode)? {
        RunOutcome::PendingImport(worklist) => {
            for entry in worklist.iter() {
                println!("{}", entry.terraform_import_command());
            }
        }
        RunOutcome::InstanceMismatch { declared_id, live_id } => {
            eprintln!(
                "{} is {} in state but {} in OpenStack; nothing to do",
                request.tf_name, declared_id, live_id
            );
        }
        RunOutcome::Consistent => {
            println!("Now you can run me with --target");
        }
        RunOutcome::Applied(_) => {
            // required_unless_present guarantees a target outside check mode
            let target = args.target.ok_or_else(|| {
                ExError::new(portsync_core::ExErrorKind::InvalidInput)
                    .with_op("reconcile")
                    .with_message("--target is required unless --check is given")
            })?;
            write_document(&target, &document)?;
            println!("terraform state push {};", target.display());
        }
    }
    Ok(())
}

fn open_provider(inventory_file: Option<&std::path::Path>) -> Result<Box<dyn InventoryProvider>, ExError> {
    match inventory_file {
        Some(path) => Ok(Box::new(load_inventory_file(path)?)),
        None => {
            let config = OpenStackConfig::from_env()?;
            Ok(Box::new(OpenStackProvider::connect(&config)?))
        }
    }
}
