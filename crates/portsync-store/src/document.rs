//! Load and persist state documents and inventory files

use std::fs;
use std::path::Path;

use portsync_core::inventory::StaticInventoryProvider;
use portsync_core::StateDocument;

use crate::atomic::atomic_write;
use crate::errors::{io_error, parse_error, Result};

/// Read and decode a Terraform state file
///
/// # Errors
///
/// `NotFound`/`Io` when the file cannot be read, `Serialization` when it is
/// not a state document.
pub fn load_document(path: &Path) -> Result<StateDocument> {
    let content = fs::read_to_string(path).map_err(|e| io_error("read_state", path, e))?;
    let document =
        StateDocument::from_json_str(&content).map_err(|e| parse_error("read_state", path, e))?;
    tracing::debug!(
        path = %path.display(),
        serial = document.serial,
        resources = document.resources.len(),
        "state document loaded"
    );
    Ok(document)
}

/// Encode `document` as pretty JSON and write it atomically
///
/// # Errors
///
/// `Serialization` when encoding fails, `Io` when the write fails.
pub fn write_document(path: &Path, document: &StateDocument) -> Result<()> {
    let content = document
        .to_json_pretty()
        .map_err(|e| parse_error("write_state", path, e))?;
    atomic_write(path, content.as_bytes())?;
    tracing::info!(path = %path.display(), serial = document.serial, "state document written");
    Ok(())
}

/// Read an offline inventory file into a provider
///
/// # Errors
///
/// `NotFound`/`Io` when the file cannot be read, `Serialization` when it is
/// not an inventory file.
pub fn load_inventory_file(path: &Path) -> Result<StaticInventoryProvider> {
    let content = fs::read_to_string(path).map_err(|e| io_error("read_inventory", path, e))?;
    StaticInventoryProvider::from_json_str(&content).map_err(|e| parse_error("read_inventory", path, e))
}
