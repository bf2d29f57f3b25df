//! Write port bindings back into the state document

use crate::errors::PortSyncError;
use crate::ip_index::IpIndex;
use crate::state::{ResourceKind, StateDocument};

/// A port id written onto one attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBinding {
    pub position: usize,
    pub fixed_ip: String,
    pub port_id: String,
    /// `port` before the write; empty if it was unbound
    pub previous_port: String,
}

impl AppliedBinding {
    pub fn changed(&self) -> bool {
        self.previous_port != self.port_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    pub serial_before: u64,
    pub serial_after: u64,
    pub bindings: Vec<AppliedBinding>,
}

impl MutationReport {
    pub fn changed_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.changed()).count()
    }
}

/// Bind every attachment of `tf_name` whose IP is in `ip_to_port_id` and bump `serial`
///
/// Attachments whose IP is not indexed are left as they are. Resources other
/// than the target compute instance are not touched. Callers only invoke
/// this after a `Clean` reconciliation of the same document.
///
/// # Errors
///
/// `InstanceNotDeclared` or `MalformedResource`; the document is unchanged on error.
pub fn apply(
    document: &mut StateDocument,
    tf_name: &str,
    ip_to_port_id: &IpIndex,
) -> Result<MutationReport, PortSyncError> {
    let serial_before = document.serial;

    let resource = document
        .find_mut(ResourceKind::ComputeInstance, tf_name)
        .ok_or_else(|| PortSyncError::InstanceNotDeclared {
            tf_name: tf_name.to_string(),
        })?;

    let mut bindings = Vec::new();
    for (position, attachment) in resource.network()?.into_iter().enumerate() {
        if let Some(port_id) = ip_to_port_id.get(&attachment.fixed_ip_v4) {
            bindings.push(AppliedBinding {
                position,
                fixed_ip: attachment.fixed_ip_v4,
                port_id: port_id.to_string(),
                previous_port: attachment.port,
            });
        }
    }

    // network() succeeded, so every entry is an object and these writes cannot fail
    for binding in &bindings {
        resource.set_attachment_port(binding.position, &binding.port_id)?;
        tracing::debug!(
            position = binding.position,
            fixed_ip = %binding.fixed_ip,
            port_id = %binding.port_id,
            previous_port = %binding.previous_port,
            "attachment bound"
        );
    }

    document.serial += 1;

    Ok(MutationReport {
        serial_before,
        serial_after: document.serial,
        bindings,
    })
}
