//! Inspect command

use std::path::PathBuf;

use clap::Args;
use portsync_core::{index, DocumentIndex, ExError, ResourceKind};
use portsync_store::load_document;
use serde_json::json;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// State file to read
    #[arg(long)]
    pub source: PathBuf,

    /// Print one JSON object instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: InspectArgs) -> Result<(), ExError> {
    let document = load_document(&args.source)?;
    let idx = index::build(&document, &ResourceKind::ALL)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&as_json(document.serial, &idx))?);
    } else {
        print_tables(document.serial, &idx);
    }
    Ok(())
}

fn as_json(serial: u64, idx: &DocumentIndex) -> serde_json::Value {
    let named = |kind: ResourceKind| {
        idx.ids(kind)
            .into_iter()
            .map(|(id, name)| json!({ "name": name, "id": id }))
            .collect::<Vec<_>>()
    };
    json!({
        "serial": serial,
        "compute_instances": named(ResourceKind::ComputeInstance),
        "ports": named(ResourceKind::NetworkingPort),
        "ip_to_port_id": idx
            .ip_to_port_id()
            .sorted()
            .into_iter()
            .map(|(ip, port)| json!({ "ip": ip, "port_id": port }))
            .collect::<Vec<_>>(),
        "collisions": idx
            .ip_to_port_id()
            .collisions()
            .iter()
            .map(|c| json!({ "ip": c.ip, "first": c.first, "second": c.second }))
            .collect::<Vec<_>>(),
    })
}

fn print_tables(serial: u64, idx: &DocumentIndex) {
    println!("serial: {}", serial);

    for (title, kind) in [
        ("compute instances", ResourceKind::ComputeInstance),
        ("ports", ResourceKind::NetworkingPort),
    ] {
        println!("\n{}:", title);
        for (id, name) in idx.ids(kind) {
            println!("  {:<40} {}", name, id);
        }
    }

    println!("\nip index:");
    for (ip, port_id) in idx.ip_to_port_id().sorted() {
        let name = idx.name_for_id(ResourceKind::NetworkingPort, port_id).unwrap_or("-");
        println!("  {:<40} {} ({})", ip, port_id, name);
    }

    let collisions = idx.ip_to_port_id().collisions();
    if !collisions.is_empty() {
        println!("\ncollisions:");
        for c in collisions {
            println!("  {} claimed by {} and {}", c.ip, c.first, c.second);
        }
    }
}
