#![allow(dead_code)]

//! A fake Keystone + Nova on a local tiny_http server

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use portsync_core_types::Sensitive;
use portsync_openstack::{OpenStackConfig, ProjectScope};
use serde_json::{json, Value};
use tiny_http::{Header, Response, Server};

pub const TOKEN: &str = "gAAAAAB-fake-token";

/// What the fake cloud saw for one request
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub url: String,
    pub auth_token: Option<String>,
    pub microversion: Option<String>,
    pub body: String,
}

pub struct FakeCloud {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeCloud {
    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn config(&self) -> OpenStackConfig {
        OpenStackConfig {
            auth_url: format!("{}/identity/v3", self.base_url),
            username: "deployer".to_string(),
            password: Sensitive::new("hunter2".to_string()),
            user_domain_name: "Default".to_string(),
            project: ProjectScope::Id("f00dfeed".to_string()),
            region_name: Some("GRA7".to_string()),
            interface: "public".to_string(),
            timeout: std::time::Duration::from_secs(5),
        }
    }
}

fn header_value(request: &tiny_http::Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str().to_string())
}

fn json_response(status: u16, body: &Value) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap())
}

/// Serve keystone and nova until the test process exits
///
/// `servers` is the Nova server list returned for any name search;
/// `interfaces` is returned for every `os-interface` listing.
pub fn start(servers: Value, interfaces: Value, auth_status: u16) -> FakeCloud {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base_url = format!("http://{}", addr);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let compute_url = format!("{}/compute/v2.1", base_url);
    let recorded = seen.clone();
    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let url = request.url().to_string();
            recorded.lock().unwrap().push(Seen {
                method: request.method().to_string(),
                url: url.clone(),
                auth_token: header_value(&request, "X-Auth-Token"),
                microversion: header_value(&request, "X-OpenStack-Nova-API-Version"),
                body,
            });

            let response = if url.starts_with("/identity/v3/auth/tokens") {
                let catalog = json!({ "token": { "catalog": [
                    { "type": "compute", "name": "nova", "endpoints": [
                        { "interface": "public", "region": "BHS5", "url": "http://127.0.0.1:9/unused" },
                        { "interface": "public", "region": "GRA7", "url": compute_url }
                    ] }
                ] } });
                let response = json_response(auth_status, &catalog);
                if auth_status == 201 {
                    response.with_header(Header::from_bytes(&b"X-Subject-Token"[..], TOKEN.as_bytes()).unwrap())
                } else {
                    response
                }
            } else if url.starts_with("/compute/v2.1/servers/detail") {
                json_response(200, &json!({ "servers": servers }))
            } else if url.starts_with("/compute/v2.1/servers/") && url.ends_with("/os-interface") {
                json_response(200, &json!({ "interfaceAttachments": interfaces }))
            } else {
                json_response(404, &json!({ "itemNotFound": { "message": "no route" } }))
            };
            let _ = request.respond(response);
        }
    });

    FakeCloud { base_url, seen }
}
