use super::{InventoryProvider, LiveInterface, NamePattern};
use crate::errors::{PortSyncError, Result};
use crate::ip_index::IpIndex;

/// What the inventory says about the one server being reconciled
#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    pub instance_name: String,
    pub instance_id: String,
    pub interfaces: Vec<LiveInterface>,
    /// Flattened interface-then-IP; later interfaces win on collision
    pub ip_to_interface: IpIndex,
}

impl InventorySnapshot {
    pub fn new(instance_name: String, instance_id: String, interfaces: Vec<LiveInterface>) -> Self {
        let mut ip_to_interface = IpIndex::new();
        for interface in &interfaces {
            for ip in &interface.ips {
                ip_to_interface.insert(ip.as_str(), interface.id.as_str());
            }
        }
        Self {
            instance_name,
            instance_id,
            interfaces,
            ip_to_interface,
        }
    }

    pub fn interface_for_ip(&self, ip: &str) -> Option<&str> {
        self.ip_to_interface.get(ip)
    }
}

/// Query the provider for exactly one server and its interfaces
///
/// # Errors
///
/// - `NotFound` when nothing matches, `AmbiguousMatch` when more than one does
/// - any provider error, unchanged
pub fn snapshot(provider: &dyn InventoryProvider, pattern: &NamePattern) -> Result<InventorySnapshot> {
    let mut servers = provider.find_instances(pattern)?;

    let server = match servers.len() {
        1 => servers.remove(0),
        0 => {
            return Err(PortSyncError::ServerNotFound {
                pattern: pattern.to_string(),
            }
            .into())
        }
        count => {
            return Err(PortSyncError::AmbiguousServer {
                pattern: pattern.to_string(),
                count,
            }
            .into())
        }
    };

    let interfaces = provider.list_interfaces(&server.id)?;

    tracing::debug!(
        os_name = %server.name,
        server_id = %server.id,
        interface_count = interfaces.len(),
        "live server resolved"
    );

    Ok(InventorySnapshot::new(server.name, server.id, interfaces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};
    use crate::inventory::{LiveInstance, MockInventoryProvider};

    fn server(name: &str, id: &str) -> LiveInstance {
        LiveInstance {
            name: name.to_string(),
            id: id.to_string(),
        }
    }

    fn iface(id: &str, ips: &[&str]) -> LiveInterface {
        LiveInterface {
            id: id.to_string(),
            ips: ips.iter().map(|ip| ip.to_string()).collect(),
        }
    }

    #[test]
    fn test_snapshot_flattens_interfaces() {
        let mut provider = MockInventoryProvider::new();
        provider
            .expect_find_instances()
            .withf(|p| p.name() == "an-openstack-vm")
            .times(1)
            .returning(|_| Ok(vec![server("an-openstack-vm", "srv-1")]));
        provider
            .expect_list_interfaces()
            .withf(|id| id == "srv-1")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    iface("if-a", &["2001:1234::abcd", "12.34.45.67"]),
                    iface("if-b", &["192.168.42.42"]),
                ])
            });

        let snap = snapshot(&provider, &NamePattern::exact("an-openstack-vm")).unwrap();

        assert_eq!(snap.instance_id, "srv-1");
        assert_eq!(snap.instance_name, "an-openstack-vm");
        assert_eq!(snap.interfaces.len(), 2);
        assert_eq!(snap.interface_for_ip("12.34.45.67"), Some("if-a"));
        assert_eq!(snap.interface_for_ip("2001:1234::abcd"), Some("if-a"));
        assert_eq!(snap.interface_for_ip("192.168.42.42"), Some("if-b"));
        assert!(snap.ip_to_interface.collisions().is_empty());
    }

    #[test]
    fn test_two_matches_is_ambiguous_and_skips_interface_query() {
        let mut provider = MockInventoryProvider::new();
        provider
            .expect_find_instances()
            .returning(|_| Ok(vec![server("vm", "srv-1"), server("vm", "srv-2")]));
        provider.expect_list_interfaces().never();

        let err = snapshot(&provider, &NamePattern::exact("vm")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AmbiguousMatch);
        assert!(err.message().contains("^vm$"));
    }

    #[test]
    fn test_zero_matches_is_not_found() {
        let mut provider = MockInventoryProvider::new();
        provider.expect_find_instances().returning(|_| Ok(vec![]));
        provider.expect_list_interfaces().never();

        let err = snapshot(&provider, &NamePattern::exact("vm")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }

    #[test]
    fn test_provider_error_propagates_unchanged() {
        let mut provider = MockInventoryProvider::new();
        provider.expect_find_instances().returning(|_| {
            Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("nova_server_list")
                .with_message("503 Service Unavailable"))
        });

        let err = snapshot(&provider, &NamePattern::exact("vm")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
        assert_eq!(err.op(), Some("nova_server_list"));
    }

    #[test]
    fn test_ip_on_two_interfaces_last_wins_and_is_recorded() {
        let snap = InventorySnapshot::new(
            "vm".to_string(),
            "srv-1".to_string(),
            vec![iface("if-a", &["10.0.0.1"]), iface("if-b", &["10.0.0.1"])],
        );
        assert_eq!(snap.interface_for_ip("10.0.0.1"), Some("if-b"));
        assert_eq!(snap.ip_to_interface.collisions().len(), 1);
    }
}
