//! OpenStack credentials
//!
//! Read from the same `OS_*` variables an `openrc` file exports. The CLI loads
//! a `.env` file first, so those variables can live there too.

use std::time::Duration;

use portsync_core_types::Sensitive;

use crate::errors::{missing_setting, Result};

pub const DEFAULT_INTERFACE: &str = "public";
pub const DEFAULT_USER_DOMAIN: &str = "Default";
pub const DEFAULT_PROJECT_DOMAIN: &str = "default";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Project the token is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    Id(String),
    Name { name: String, domain_id: String },
}

#[derive(Debug, Clone)]
pub struct OpenStackConfig {
    pub auth_url: String,
    pub username: String,
    pub password: Sensitive<String>,
    pub user_domain_name: String,
    pub project: ProjectScope,
    /// Catalog region; `None` accepts the first endpoint of any region
    pub region_name: Option<String>,
    /// Catalog interface: `public`, `internal` or `admin`
    pub interface: String,
    pub timeout: Duration,
}

impl OpenStackConfig {
    /// # Errors
    ///
    /// `InvalidInput` when a required variable is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; empty values count as unset
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming the first missing variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).ok_or_else(|| missing_setting(key));

        let auth_url = require("OS_AUTH_URL")?;
        let username = require("OS_USERNAME")?;
        let password = Sensitive::new(require("OS_PASSWORD")?);
        let project = match (get("OS_PROJECT_ID"), get("OS_PROJECT_NAME")) {
            (Some(id), _) => ProjectScope::Id(id),
            (None, Some(name)) => ProjectScope::Name {
                name,
                domain_id: get("OS_PROJECT_DOMAIN_ID").unwrap_or_else(|| DEFAULT_PROJECT_DOMAIN.to_string()),
            },
            (None, None) => return Err(missing_setting("OS_PROJECT_ID")),
        };

        Ok(Self {
            auth_url,
            username,
            password,
            user_domain_name: get("OS_USER_DOMAIN_NAME").unwrap_or_else(|| DEFAULT_USER_DOMAIN.to_string()),
            project,
            region_name: get("OS_REGION_NAME"),
            interface: get("OS_INTERFACE")
                .map(|i| normalize_interface(&i))
                .unwrap_or_else(|| DEFAULT_INTERFACE.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// `publicURL` (v2 openrc style) → `public`
fn normalize_interface(interface: &str) -> String {
    interface
        .strip_suffix("URL")
        .unwrap_or(interface)
        .to_ascii_lowercase()
}
