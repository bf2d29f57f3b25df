#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const STATE: &str = r#"{
  "version": 4,
  "serial": 12,
  "lineage": "0c4f9a7e-91a2-4b8e-a1c5-3f6e7d8c9b10",
  "outputs": {},
  "resources": [
    {
      "mode": "managed",
      "type": "openstack_compute_instance_v2",
      "name": "web",
      "instances": [
        {
          "attributes": {
            "id": "srv-1",
            "network": [ { "fixed_ip_v4": "10.0.0.5", "port": "" } ]
          }
        }
      ]
    },
    {
      "mode": "data",
      "type": "openstack_images_image_v2",
      "name": "debian",
      "instances": [ { "attributes": { "id": "img-1" } } ]
    }
  ]
}
"#;

pub const INVENTORY: &str = r#"{
  "servers": [
    { "name": "web-1", "id": "srv-1", "interfaces": [ { "id": "port-a", "ips": ["10.0.0.5"] } ] }
  ]
}"#;

/// Write `content` to `name` inside a fresh temp dir
pub fn write_temp(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
