//! Blocking inventory provider backed by Nova

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use portsync_core::inventory::{InventoryProvider, LiveInstance, LiveInterface, NamePattern};
use portsync_core_types::Sensitive;

use crate::config::OpenStackConfig;
use crate::errors::{external_service, from_reqwest, Result};
use crate::keystone::{self, TokenResponse, COMPUTE_SERVICE_TYPE, SUBJECT_TOKEN_HEADER};
use crate::nova::{self, InterfaceAttachmentList, ServerList, MICROVERSION_HEADER, NOVA_MICROVERSION};

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const USER_AGENT: &str = concat!("portsync/", env!("CARGO_PKG_VERSION"));
/// Error bodies are cut to this many characters in messages
const ERROR_BODY_LIMIT: usize = 300;

/// Authenticated Nova client; the token is fetched once in `connect`
pub struct OpenStackProvider {
    client: Client,
    compute_url: String,
    token: Sensitive<String>,
}

impl std::fmt::Debug for OpenStackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStackProvider")
            .field("compute_url", &self.compute_url)
            .field("token", &self.token)
            .finish()
    }
}

impl OpenStackProvider {
    /// Authenticate against Keystone and locate the compute endpoint
    ///
    /// # Errors
    ///
    /// `ExternalService` when authentication fails or the catalog has no
    /// matching compute endpoint.
    pub fn connect(config: &OpenStackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| from_reqwest("build_http_client", e))?;

        let url = keystone::token_url(&config.auth_url);
        tracing::debug!(url = %url, user = %config.username, "requesting keystone token");
        let response = client
            .post(&url)
            .json(&keystone::password_auth_body(config))
            .send()
            .map_err(|e| from_reqwest("keystone_auth", e))?;
        let response = ensure_success("keystone_auth", response)?;

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                external_service(
                    "keystone_auth",
                    format!("Response has no {} header", SUBJECT_TOKEN_HEADER),
                )
            })?;
        let body: TokenResponse = response.json().map_err(|e| from_reqwest("keystone_auth", e))?;

        let compute_url = keystone::select_endpoint(
            &body.token.catalog,
            COMPUTE_SERVICE_TYPE,
            &config.interface,
            config.region_name.as_deref(),
        )?;
        tracing::info!(compute_url = %compute_url, "authenticated against keystone");

        Ok(Self {
            client,
            compute_url,
            token: Sensitive::new(token),
        })
    }

    pub fn compute_url(&self) -> &str {
        &self.compute_url
    }

    fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.compute_url, path);
        tracing::debug!(op = operation, url = %url, "nova request");
        let response = self
            .client
            .get(&url)
            .query(query)
            .header(AUTH_TOKEN_HEADER, self.token.expose().as_str())
            .header(MICROVERSION_HEADER, NOVA_MICROVERSION)
            .send()
            .map_err(|e| from_reqwest(operation, e))?;
        ensure_success(operation, response)?
            .json()
            .map_err(|e| from_reqwest(operation, e))
    }
}

fn ensure_success(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response
        .text()
        .unwrap_or_default()
        .chars()
        .take(ERROR_BODY_LIMIT)
        .collect();
    Err(external_service(operation, format!("HTTP {}: {}", status, body.trim())))
}

impl InventoryProvider for OpenStackProvider {
    fn find_instances(&self, pattern: &NamePattern) -> Result<Vec<LiveInstance>> {
        let regex = pattern.to_regex();
        let list: ServerList = self.get_json("find_instances", "servers/detail", &[("name", regex.as_str())])?;
        let returned = list.servers.len();

        // the name filter is a regex evaluated server side; keep exact matches only
        let servers: Vec<LiveInstance> = list
            .servers
            .into_iter()
            .filter(|s| pattern.matches(&s.name))
            .map(LiveInstance::from)
            .collect();
        if servers.len() != returned {
            tracing::debug!(pattern = %pattern, returned, kept = servers.len(), "dropped inexact name matches");
        }
        Ok(servers)
    }

    fn list_interfaces(&self, instance_id: &str) -> Result<Vec<LiveInterface>> {
        let path = format!("servers/{}/os-interface", instance_id);
        let list: InterfaceAttachmentList = self.get_json("list_interfaces", &path, &[])?;
        Ok(nova::merge_interfaces(list.interface_attachments))
    }
}
