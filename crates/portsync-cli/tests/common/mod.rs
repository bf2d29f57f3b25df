#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

pub const SIMPLE_VM_STATE: &str = include_str!("simple_vm.tfstate.json");
pub const PUBLIC_IFACE: &str = "0f48a800-bd0d-43e8-88ae-c735f35097eb";
pub const TF_PORTS: &str = "the_vm_in_terraform_public:Ext-Net,the_vm_in_terraform_priv:priv";

pub fn inventory() -> Value {
    json!({ "servers": [
        { "name": "an-openstack-vm", "id": "4b450ea7-c5b4-44a5-95d7-b3266a3e1ed1", "interfaces": [
            { "id": PUBLIC_IFACE, "ips": ["2001:1234::abcd", "12.34.45.67"] },
            { "id": "f31d734e-5ac5-49c3-8f44-f5d933e00685", "ips": ["192.168.42.42"] }
        ] }
    ] })
}

/// Simple-VM state with the public port already imported
pub fn imported_state() -> Value {
    let mut state: Value = serde_json::from_str(SIMPLE_VM_STATE).unwrap();
    state["resources"].as_array_mut().unwrap().push(json!({
        "mode": "managed",
        "type": "openstack_networking_port_v2",
        "name": "the_vm_in_terraform_public",
        "instances": [{ "attributes": {
            "id": PUBLIC_IFACE,
            "all_fixed_ips": ["2001:1234::abcd", "12.34.45.67"]
        } }]
    }));
    state
}

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write(name, &serde_json::to_string_pretty(value).unwrap())
    }
}

/// Run the binary with logging off and no OpenStack variables inherited
pub fn portsync(cwd: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_portsync"));
    command.current_dir(cwd).args(["--log-profile", "off"]).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("OS_") {
            command.env_remove(key);
        }
    }
    command.output().expect("Failed to execute CLI")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
