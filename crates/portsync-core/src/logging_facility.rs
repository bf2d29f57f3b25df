//! Structured logging facility for portsync
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Events go to stderr. Stdout is reserved for the operator commands the CLI
//! prints (`terraform import ...`, `terraform state push ...`).
//!
//! # Usage
//!
//! ```rust
//! use portsync_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
