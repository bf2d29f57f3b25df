#![allow(dead_code)]

use portsync_core::inventory::{LiveInterface, StaticInventoryProvider};
use portsync_core::{ReconcileRequest, StateDocument};

pub const SIMPLE_VM_STATE: &str = include_str!("../fixtures/simple_vm.tfstate.json");

pub const OS_NAME: &str = "an-openstack-vm";
pub const TF_NAME: &str = "the_vm_in_terraform";
pub const SERVER_ID: &str = "4b450ea7-c5b4-44a5-95d7-b3266a3e1ed1";
pub const PUBLIC_IFACE: &str = "0f48a800-bd0d-43e8-88ae-c735f35097eb";
pub const PRIV_IFACE: &str = "f31d734e-5ac5-49c3-8f44-f5d933e00685";
pub const PRIV_PORT: &str = "fd4bd4b4-7f48-4e62-bc2e-3dc68f218caa";

/// The simple-VM state document (serial 5, both attachments unbound)
pub fn simple_vm_document() -> StateDocument {
    StateDocument::from_json_str(SIMPLE_VM_STATE).unwrap()
}

fn iface(id: &str, ips: &[&str]) -> LiveInterface {
    LiveInterface {
        id: id.to_string(),
        ips: ips.iter().map(|ip| ip.to_string()).collect(),
    }
}

/// Live view of `an-openstack-vm` after the upgrade
pub fn live_inventory() -> StaticInventoryProvider {
    StaticInventoryProvider::default()
        .with_server(
            OS_NAME,
            SERVER_ID,
            vec![
                iface(PUBLIC_IFACE, &["2001:1234::abcd", "12.34.45.67"]),
                iface(PRIV_IFACE, &["192.168.42.42"]),
            ],
        )
        .with_server("another-openstack-vm", "1b4a90d8-96bb-4885-a1f7-4d07118ec7e1", vec![])
}

pub fn request() -> ReconcileRequest {
    ReconcileRequest {
        tf_name: TF_NAME.to_string(),
        os_name: OS_NAME.to_string(),
        slots: "the_vm_in_terraform_public:Ext-Net,the_vm_in_terraform_priv:priv"
            .parse()
            .unwrap(),
        strict_ips: false,
    }
}
