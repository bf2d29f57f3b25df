//! Types shared by the portsync error and logging facilities
//!
//! - **Correlation**: `RequestId` for one reconciliation run
//! - **Sensitive data**: `Sensitive<T>` for credentials and tokens
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
