use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::layout::{serialize_ordered, KeyOrder, Split};
use crate::errors::PortSyncError;

/// Terraform type tag of a compute instance
pub const COMPUTE_INSTANCE_TYPE: &str = "openstack_compute_instance_v2";

/// Terraform type tag of a networking port
pub const NETWORKING_PORT_TYPE: &str = "openstack_networking_port_v2";

/// The resource kinds the reconciler understands
///
/// Every other type tag is carried through the document untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ComputeInstance,
    NetworkingPort,
}

impl ResourceKind {
    /// Default type filter used when indexing a document
    pub const ALL: [ResourceKind; 2] = [ResourceKind::ComputeInstance, ResourceKind::NetworkingPort];

    pub fn type_tag(&self) -> &'static str {
        match self {
            ResourceKind::ComputeInstance => COMPUTE_INSTANCE_TYPE,
            ResourceKind::NetworkingPort => NETWORKING_PORT_TYPE,
        }
    }

    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            COMPUTE_INSTANCE_TYPE => Some(ResourceKind::ComputeInstance),
            NETWORKING_PORT_TYPE => Some(ResourceKind::NetworkingPort),
            _ => None,
        }
    }
}

const RESOURCE_KEYS: [&str; 3] = ["type", "name", "instances"];
const INSTANCE_KEYS: [&str; 1] = ["attributes"];

/// One `resources[]` entry of a state document
///
/// Keys the reconciler does not model (`mode`, `provider`, `module`, ...)
/// are kept in `extra` and written back unchanged, in their parsed position.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub resource_type: String,

    pub name: String,

    pub instances: Vec<Instance>,

    pub extra: Map<String, Value>,

    key_order: KeyOrder,
}

/// One `instances[]` entry of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub attributes: Map<String, Value>,

    pub extra: Map<String, Value>,

    key_order: KeyOrder,
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_ordered(serializer, &self.key_order, &RESOURCE_KEYS, &self.extra, |key, map| match key {
            "type" => map.serialize_entry(key, &self.resource_type),
            "name" => map.serialize_entry(key, &self.name),
            _ => map.serialize_entry(key, &self.instances),
        })
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut split = Split::deserialize(deserializer)?;
        Ok(Self {
            resource_type: split.require::<_, D::Error>("type")?,
            name: split.require::<_, D::Error>("name")?,
            instances: split.take::<_, D::Error>("instances")?.unwrap_or_default(),
            extra: split.extra,
            key_order: split.order,
        })
    }
}

impl Serialize for Instance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_ordered(serializer, &self.key_order, &INSTANCE_KEYS, &self.extra, |key, map| {
            map.serialize_entry(key, &self.attributes)
        })
    }
}

impl<'de> Deserialize<'de> for Instance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut split = Split::deserialize(deserializer)?;
        Ok(Self {
            attributes: split.take::<_, D::Error>("attributes")?.unwrap_or_default(),
            extra: split.extra,
            key_order: split.order,
        })
    }
}

/// A network-card slot of a compute instance, as declared in state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub fixed_ip_v4: String,
    /// External port id; empty while the binding is lost
    pub port: String,
}

impl Attachment {
    pub fn is_bound(&self) -> bool {
        !self.port.is_empty()
    }
}

/// One instance of a networking-port resource: its id and the IPs it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInstance<'a> {
    pub id: &'a str,
    pub fixed_ips: Vec<&'a str>,
}

impl Instance {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").and_then(Value::as_str)
    }
}

impl Resource {
    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::from_type_tag(&self.resource_type)
    }

    /// Terraform address, e.g. `openstack_networking_port_v2.web_priv`
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    pub fn is(&self, kind: ResourceKind, name: &str) -> bool {
        self.resource_type == kind.type_tag() && self.name == name
    }

    fn malformed(&self, reason: impl Into<String>) -> PortSyncError {
        PortSyncError::MalformedResource {
            resource: self.address(),
            reason: reason.into(),
        }
    }

    fn primary_instance(&self) -> Result<&Instance, PortSyncError> {
        self.instances
            .first()
            .ok_or_else(|| self.malformed("resource has no instances"))
    }

    /// External id recorded on instance 0
    pub fn declared_id(&self) -> Result<&str, PortSyncError> {
        self.primary_instance()?
            .id()
            .ok_or_else(|| self.malformed("instance 0 has no string attribute 'id'"))
    }

    /// Ordered `network` attachments of instance 0
    pub fn network(&self) -> Result<Vec<Attachment>, PortSyncError> {
        let entries = self
            .primary_instance()?
            .attributes
            .get("network")
            .and_then(Value::as_array)
            .ok_or_else(|| self.malformed("instance 0 has no array attribute 'network'"))?;

        entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let field = |key: &str| {
                    entry.get(key).and_then(Value::as_str).ok_or_else(|| {
                        self.malformed(format!("network[{}] has no string field '{}'", position, key))
                    })
                };
                Ok(Attachment {
                    fixed_ip_v4: field("fixed_ip_v4")?.to_string(),
                    port: field("port")?.to_string(),
                })
            })
            .collect()
    }

    /// Overwrite the `port` of attachment `position` on instance 0
    pub fn set_attachment_port(&mut self, position: usize, port_id: &str) -> Result<(), PortSyncError> {
        let address = self.address();
        let slot = self
            .instances
            .first_mut()
            .and_then(|instance| instance.attributes.get_mut("network"))
            .and_then(Value::as_array_mut)
            .and_then(|entries| entries.get_mut(position))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| PortSyncError::MalformedResource {
                resource: address,
                reason: format!("network[{}] is not an object", position),
            })?;
        slot.insert("port".to_string(), Value::String(port_id.to_string()));
        Ok(())
    }

    /// Every instance's id with its `all_fixed_ips`
    pub fn port_instances(&self) -> Result<Vec<PortInstance<'_>>, PortSyncError> {
        self.instances
            .iter()
            .enumerate()
            .map(|(i, instance)| {
                let id = instance
                    .id()
                    .ok_or_else(|| self.malformed(format!("instance {} has no string attribute 'id'", i)))?;
                let ips = instance
                    .attributes
                    .get("all_fixed_ips")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        self.malformed(format!("instance {} has no array attribute 'all_fixed_ips'", i))
                    })?;
                let fixed_ips = ips
                    .iter()
                    .map(|ip| {
                        ip.as_str().ok_or_else(|| {
                            self.malformed(format!("instance {} lists a non-string fixed IP", i))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PortInstance { id, fixed_ips })
            })
            .collect()
    }
}
