//! portsync OpenStack provider
//!
//! Live inventory backed by Keystone v3 and the Nova compute API:
//! - `config`: credentials from the `OS_*` environment variables
//! - `keystone`: password authentication and service catalog lookup
//! - `nova`: server search and interface listing wire types
//! - `provider`: the blocking `InventoryProvider` implementation

pub mod config;
pub mod errors;
pub mod keystone;
pub mod nova;
pub mod provider;

pub use config::{OpenStackConfig, ProjectScope};
pub use provider::OpenStackProvider;
