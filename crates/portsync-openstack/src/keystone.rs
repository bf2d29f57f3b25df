//! Keystone v3 password authentication and catalog lookup

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{OpenStackConfig, ProjectScope};
use crate::errors::{external_service, Result};

pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
pub const COMPUTE_SERVICE_TYPE: &str = "compute";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: Token,
}

#[derive(Debug, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub interface: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    pub url: String,
}

impl Endpoint {
    fn in_region(&self, region: &str) -> bool {
        self.region.as_deref() == Some(region) || self.region_id.as_deref() == Some(region)
    }
}

/// `<auth_url>/auth/tokens`, adding `/v3` when the URL has no version
pub fn token_url(auth_url: &str) -> String {
    let base = auth_url.trim_end_matches('/');
    if base.ends_with("/v3") {
        format!("{}/auth/tokens", base)
    } else {
        format!("{}/v3/auth/tokens", base)
    }
}

/// Request body for a project-scoped password token
pub fn password_auth_body(config: &OpenStackConfig) -> Value {
    let project = match &config.project {
        ProjectScope::Id(id) => json!({ "id": id }),
        ProjectScope::Name { name, domain_id } => json!({ "name": name, "domain": { "id": domain_id } }),
    };
    json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": config.username,
                        "domain": { "name": config.user_domain_name },
                        "password": config.password.expose()
                    }
                }
            },
            "scope": { "project": project }
        }
    })
}

/// URL of the first `service_type` endpoint on `interface` (and `region`, if set)
///
/// # Errors
///
/// `ExternalService` when the catalog has no such endpoint.
pub fn select_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    interface: &str,
    region: Option<&str>,
) -> Result<String> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|endpoint| endpoint.interface == interface && region.map_or(true, |r| endpoint.in_region(r)))
        .map(|endpoint| endpoint.url.trim_end_matches('/').to_string())
        .ok_or_else(|| {
            external_service(
                "select_endpoint",
                format!(
                    "No {} endpoint for interface '{}' in region '{}'",
                    service_type,
                    interface,
                    region.unwrap_or("*")
                ),
            )
        })
}
