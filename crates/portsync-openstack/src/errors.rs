//! Error helpers for the OpenStack provider
//!
//! Every remote failure surfaces as `ExternalService`; missing credentials are
//! `InvalidInput`.

use portsync_core::errors::{ExError, ExErrorKind};

pub type Result<T> = std::result::Result<T, ExError>;

/// Failure reported by (or while talking to) Keystone or Nova
pub fn external_service(operation: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(operation.to_string())
        .with_message(message)
}

pub fn from_reqwest(operation: &str, err: reqwest::Error) -> ExError {
    external_service(operation, err.to_string())
}

/// A required `OS_*` variable is absent or empty
pub fn missing_setting(variable: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_openstack_config")
        .with_message(format!("Missing environment variable {}", variable))
}
