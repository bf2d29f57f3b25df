//! Nova compute API wire types

use serde::Deserialize;

use portsync_core::inventory::{LiveInstance, LiveInterface};

/// Microversion that returns `fixed_ips` on interface attachments
pub const NOVA_MICROVERSION: &str = "2.30";
pub const MICROVERSION_HEADER: &str = "X-OpenStack-Nova-API-Version";

#[derive(Debug, Deserialize)]
pub struct ServerList {
    #[serde(default)]
    pub servers: Vec<ServerSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSummary {
    pub id: String,
    pub name: String,
}

impl From<ServerSummary> for LiveInstance {
    fn from(server: ServerSummary) -> Self {
        LiveInstance {
            name: server.name,
            id: server.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InterfaceAttachmentList {
    #[serde(rename = "interfaceAttachments", default)]
    pub interface_attachments: Vec<InterfaceAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceAttachment {
    pub port_id: String,
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixedIp {
    pub ip_address: String,
}

/// One `LiveInterface` per port id, first-seen order, IPs in listing order
pub fn merge_interfaces(attachments: Vec<InterfaceAttachment>) -> Vec<LiveInterface> {
    let mut merged: Vec<LiveInterface> = Vec::new();
    for attachment in attachments {
        let ips = attachment.fixed_ips.into_iter().map(|f| f.ip_address);
        match merged.iter_mut().find(|i| i.id == attachment.port_id) {
            Some(existing) => existing.ips.extend(ips),
            None => merged.push(LiveInterface {
                id: attachment.port_id,
                ips: ips.collect(),
            }),
        }
    }
    merged
}
