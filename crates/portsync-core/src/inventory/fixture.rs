//! Offline inventory
//!
//! A JSON inventory file lets an operator reconcile against a recorded view
//! of the cloud (or a hand-written one) without credentials:
//!
//! ```json
//! { "servers": [ { "name": "web-1", "id": "srv-1",
//!                  "interfaces": [ { "id": "port-a", "ips": ["10.0.0.5"] } ] } ] }
//! ```

use serde::{Deserialize, Serialize};

use super::{InventoryProvider, LiveInstance, LiveInterface, NamePattern};
use crate::errors::{ExError, ExErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFile {
    pub servers: Vec<ServerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub interfaces: Vec<LiveInterface>,
}

/// Provider answering from an in-memory server list
#[derive(Debug, Clone, Default)]
pub struct StaticInventoryProvider {
    servers: Vec<ServerRecord>,
}

impl StaticInventoryProvider {
    pub fn new(servers: Vec<ServerRecord>) -> Self {
        Self { servers }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: InventoryFile = serde_json::from_str(content)?;
        Ok(Self::from(file))
    }

    /// Add a server; builder style for tests and demos
    pub fn with_server(mut self, name: &str, id: &str, interfaces: Vec<LiveInterface>) -> Self {
        self.servers.push(ServerRecord {
            name: name.to_string(),
            id: id.to_string(),
            interfaces,
        });
        self
    }
}

impl From<InventoryFile> for StaticInventoryProvider {
    fn from(file: InventoryFile) -> Self {
        Self::new(file.servers)
    }
}

impl InventoryProvider for StaticInventoryProvider {
    fn find_instances(&self, pattern: &NamePattern) -> Result<Vec<LiveInstance>> {
        Ok(self
            .servers
            .iter()
            .filter(|s| pattern.matches(&s.name))
            .map(|s| LiveInstance {
                name: s.name.clone(),
                id: s.id.clone(),
            })
            .collect())
    }

    fn list_interfaces(&self, instance_id: &str) -> Result<Vec<LiveInterface>> {
        self.servers
            .iter()
            .find(|s| s.id == instance_id)
            .map(|s| s.interfaces.clone())
            .ok_or_else(|| {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("list_interfaces")
                    .with_message(format!("No server with id {} in inventory", instance_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r#"{
        "servers": [
            { "name": "web-1", "id": "srv-1",
              "interfaces": [ { "id": "port-a", "ips": ["10.0.0.5", "fd00::5"] } ] },
            { "name": "web-10", "id": "srv-10" }
        ]
    }"#;

    #[test]
    fn test_find_matches_exact_name_only() {
        let provider = StaticInventoryProvider::from_json_str(INVENTORY).unwrap();
        let found = provider.find_instances(&NamePattern::exact("web-1")).unwrap();
        assert_eq!(
            found,
            vec![LiveInstance {
                name: "web-1".to_string(),
                id: "srv-1".to_string()
            }]
        );
    }

    #[test]
    fn test_list_interfaces_defaults_to_empty() {
        let provider = StaticInventoryProvider::from_json_str(INVENTORY).unwrap();
        assert_eq!(provider.list_interfaces("srv-1").unwrap()[0].ips.len(), 2);
        assert!(provider.list_interfaces("srv-10").unwrap().is_empty());
    }

    #[test]
    fn test_list_interfaces_unknown_server() {
        let provider = StaticInventoryProvider::default();
        let err = provider.list_interfaces("nope").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }

    #[test]
    fn test_invalid_inventory_is_serialization_error() {
        let err = StaticInventoryProvider::from_json_str("{\"servers\": 3}").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
