//! Lookup structures over a state document
//!
//! `build` is pure: it reads the document and returns an owned, read-only
//! `DocumentIndex`. Any malformed resource of a filtered kind fails the whole
//! build, so a caller never sees a partial index.

use std::collections::{BTreeMap, HashMap};

use crate::errors::PortSyncError;
use crate::ip_index::IpIndex;
use crate::state::{ResourceKind, StateDocument};

#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    /// kind → name → position in `document.resources`
    resources_by_kind: BTreeMap<ResourceKind, BTreeMap<String, usize>>,
    /// kind → external id (instance 0) → declaring name
    id_to_name: BTreeMap<ResourceKind, HashMap<String, String>>,
    /// IP → port id, over every instance of every port resource
    ip_to_port_id: IpIndex,
}

impl DocumentIndex {
    /// Position of a resource in the document it was built from
    pub fn position(&self, kind: ResourceKind, name: &str) -> Option<usize> {
        self.resources_by_kind.get(&kind)?.get(name).copied()
    }

    /// Declared names of one kind, sorted
    pub fn names(&self, kind: ResourceKind) -> Vec<&str> {
        self.resources_by_kind
            .get(&kind)
            .map(|names| names.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn name_for_id(&self, kind: ResourceKind, id: &str) -> Option<&str> {
        self.id_to_name.get(&kind)?.get(id).map(String::as_str)
    }

    /// `(id, name)` pairs of one kind, sorted by name
    pub fn ids(&self, kind: ResourceKind) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .id_to_name
            .get(&kind)
            .map(|m| m.iter().map(|(id, name)| (id.as_str(), name.as_str())).collect())
            .unwrap_or_default();
        pairs.sort_unstable_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)));
        pairs
    }

    pub fn ip_to_port_id(&self) -> &IpIndex {
        &self.ip_to_port_id
    }
}

/// Index every resource of the kinds in `type_filter`
///
/// - compute instance: `id_to_name[id] = name` from instance 0
/// - networking port: `id_to_name[id] = name` from instance 0, and every IP of
///   every instance's `all_fixed_ips` maps to that instance's own id
///
/// A duplicated name within a kind keeps the later resource.
///
/// # Errors
///
/// `MalformedResource` naming the first filtered resource that lacks an
/// expected attribute.
pub fn build(document: &StateDocument, type_filter: &[ResourceKind]) -> Result<DocumentIndex, PortSyncError> {
    let mut index = DocumentIndex::default();

    for (position, resource) in document.resources.iter().enumerate() {
        let kind = match resource.kind() {
            Some(kind) if type_filter.contains(&kind) => kind,
            _ => continue,
        };

        let declared_id = resource.declared_id()?;

        if kind == ResourceKind::NetworkingPort {
            for port in resource.port_instances()? {
                for ip in port.fixed_ips {
                    index.ip_to_port_id.insert(ip, port.id);
                }
            }
        }

        index
            .id_to_name
            .entry(kind)
            .or_default()
            .insert(declared_id.to_string(), resource.name.clone());

        let previous = index
            .resources_by_kind
            .entry(kind)
            .or_default()
            .insert(resource.name.clone(), position);
        if previous.is_some() {
            tracing::warn!(
                resource = %resource.address(),
                "resource declared more than once; later declaration wins"
            );
        }
    }

    tracing::debug!(
        compute_count = index.names(ResourceKind::ComputeInstance).len(),
        port_count = index.names(ResourceKind::NetworkingPort).len(),
        indexed_ips = index.ip_to_port_id.len(),
        ip_collisions = index.ip_to_port_id.collisions().len(),
        "document indexed"
    );

    Ok(index)
}
