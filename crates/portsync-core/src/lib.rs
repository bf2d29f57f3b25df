//! portsync core - Terraform state / OpenStack port reconciliation
//!
//! After an OpenStack upgrade, compute instances in Terraform state can lose
//! the `port` binding on their `network` attachments. This crate provides:
//! - the state document model (`state`)
//! - the document index: id → name maps and IP → port id (`index`)
//! - the live inventory seam and snapshot (`inventory`)
//! - the reconciler producing an import worklist (`reconcile`)
//! - the mutator restoring bindings and bumping `serial` (`mutate`)
//! - one-call orchestration with lifecycle logging (`engine`)

pub mod engine;
pub mod errors;
pub mod index;
pub mod inventory;
pub mod ip_index;
pub mod logging_facility;
pub mod mutate;
pub mod reconcile;
pub mod slots;
pub mod state;

#[doc(hidden)]
pub use portsync_core_types as core_types;

// Re-export commonly used types
pub use engine::{run, ReconcileRequest, RunMode, RunOutcome};
pub use errors::{ExError, ExErrorKind, PortSyncError, Result};
pub use index::DocumentIndex;
pub use inventory::{InventoryProvider, InventorySnapshot, NamePattern};
pub use reconcile::{ImportWorklist, ReconcileOutcome};
pub use slots::PortSlots;
pub use state::{ResourceKind, StateDocument};
