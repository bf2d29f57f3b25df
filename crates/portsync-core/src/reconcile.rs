//! Decide, per network attachment, whether its port binding can be restored
//! from the document itself or has to be imported first

use crate::errors::PortSyncError;
use crate::index::DocumentIndex;
use crate::inventory::InventorySnapshot;
use crate::slots::PortSlots;
use crate::state::resource::NETWORKING_PORT_TYPE;
use crate::state::{ResourceKind, StateDocument};

/// One port the operator has to import before the state can be fixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Declared port resource name
    pub slot: String,
    /// Attachment position on the compute instance
    pub position: usize,
    pub fixed_ip: String,
    /// Live interface (Neutron port) id owning `fixed_ip`
    pub interface_id: String,
}

impl ImportEntry {
    pub fn terraform_import_command(&self) -> String {
        format!(
            "terraform import {}.{} {};",
            NETWORKING_PORT_TYPE, self.slot, self.interface_id
        )
    }
}

/// Slot name → live interface id, in slot order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportWorklist(Vec<ImportEntry>);

impl ImportWorklist {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.slot == slot)
            .map(|e| e.interface_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImportEntry> {
        self.0.iter()
    }

    /// `(slot, interface_id)` pairs in slot order
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .map(|e| (e.slot.as_str(), e.interface_id.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The live server is not the one recorded in state; nothing to do
    IdMismatch { declared_id: String, live_id: String },
    /// Ports must be imported before the document can be mutated
    PendingImport(ImportWorklist),
    /// Every unbound attachment resolves through the document's IP index
    Clean,
}

impl ReconcileOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, ReconcileOutcome::Clean)
    }
}

/// Walk the target instance's attachments and build the import worklist
///
/// Attachment `i` is paired with `slots[i]`. For each attachment with an
/// empty `port`:
/// - IP in the document's port index: resolvable, nothing recorded
/// - IP on a live interface: `worklist[slot] = interface id`
/// - otherwise: `UnresolvableAttachment`
///
/// # Errors
///
/// - `InstanceNotDeclared` when `tf_name` is not a compute instance in the document
/// - `MalformedResource` when the instance lacks `id` or `network`
/// - `SlotCountMismatch` when attachment and slot counts differ
/// - `UnresolvableAttachment` as above
pub fn reconcile(
    document: &StateDocument,
    index: &DocumentIndex,
    snapshot: &InventorySnapshot,
    tf_name: &str,
    slots: &PortSlots,
) -> Result<ReconcileOutcome, PortSyncError> {
    let resource = index
        .position(ResourceKind::ComputeInstance, tf_name)
        .and_then(|position| document.resources.get(position))
        .filter(|resource| resource.is(ResourceKind::ComputeInstance, tf_name))
        .ok_or_else(|| PortSyncError::InstanceNotDeclared {
            tf_name: tf_name.to_string(),
        })?;

    let declared_id = resource.declared_id()?;
    if declared_id != snapshot.instance_id {
        tracing::info!(
            tf_name,
            declared_id,
            live_id = %snapshot.instance_id,
            "live server is not the declared instance; nothing to reconcile"
        );
        return Ok(ReconcileOutcome::IdMismatch {
            declared_id: declared_id.to_string(),
            live_id: snapshot.instance_id.clone(),
        });
    }

    let network = resource.network()?;
    if network.len() != slots.len() {
        return Err(PortSyncError::SlotCountMismatch {
            tf_name: tf_name.to_string(),
            attachments: network.len(),
            slots: slots.len(),
        });
    }

    let port_index = index.ip_to_port_id();
    let mut worklist = Vec::new();

    for (position, (attachment, slot)) in network.iter().zip(slots.iter()).enumerate() {
        if attachment.is_bound() {
            tracing::debug!(slot = %slot.slot, port_id = %attachment.port, "attachment already bound");
            continue;
        }

        let ip = attachment.fixed_ip_v4.as_str();
        if let Some(port_id) = port_index.get(ip) {
            tracing::debug!(
                slot = %slot.slot,
                fixed_ip = ip,
                port_id,
                port_name = index.name_for_id(ResourceKind::NetworkingPort, port_id).unwrap_or("-"),
                "attachment resolvable from declared ports"
            );
            continue;
        }

        match snapshot.interface_for_ip(ip) {
            Some(interface_id) => {
                tracing::debug!(slot = %slot.slot, fixed_ip = ip, interface_id, "port needs import");
                worklist.push(ImportEntry {
                    slot: slot.slot.clone(),
                    position,
                    fixed_ip: ip.to_string(),
                    interface_id: interface_id.to_string(),
                });
            }
            None => {
                return Err(PortSyncError::UnresolvableAttachment {
                    slot: slot.slot.clone(),
                    position,
                    ip: ip.to_string(),
                });
            }
        }
    }

    if worklist.is_empty() {
        Ok(ReconcileOutcome::Clean)
    } else {
        Ok(ReconcileOutcome::PendingImport(ImportWorklist(worklist)))
    }
}
