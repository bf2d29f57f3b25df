//! One reconciliation run: index → snapshot → reconcile → (apply)
//!
//! ## Logging Ownership
//!
//! This layer owns lifecycle logging for a run (`log_op_start!`,
//! `log_op_end!`, `log_op_error!`). The index, snapshot, reconcile and mutate
//! layers only emit `tracing::debug!` details.

use std::time::Instant;

use crate::errors::{ExError, Result};
use crate::index::{self, DocumentIndex};
use crate::inventory::{self, InventoryProvider, InventorySnapshot, NamePattern};
use crate::ip_index::IpIndex;
use crate::mutate::{self, MutationReport};
use crate::reconcile::{self, ImportWorklist, ReconcileOutcome};
use crate::slots::PortSlots;
use crate::state::{ResourceKind, StateDocument};
use crate::{log_op_end, log_op_error, log_op_start};

/// What to reconcile
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    /// Compute-instance resource name in the state document
    pub tf_name: String,
    /// Live server name (matched exactly)
    pub os_name: String,
    pub slots: PortSlots,
    /// Treat IP collisions in either index as fatal
    pub strict_ips: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Stop after reconciling; never mutate
    Check,
    /// Mutate the document when the reconciliation is clean
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Live server id differs from the declared one; nothing was done
    InstanceMismatch { declared_id: String, live_id: String },
    /// Ports must be imported first; the document was not modified
    PendingImport(ImportWorklist),
    /// Check mode: the document can be fixed without imports
    Consistent,
    /// Apply mode: the document was fixed in place
    Applied(MutationReport),
}

/// Run one reconciliation pass against `document`
///
/// The document is only modified when the outcome is `Applied`.
///
/// # Errors
///
/// Any index, inventory, reconcile or mutate error; see `ExErrorKind`.
pub fn run(
    document: &mut StateDocument,
    provider: &dyn InventoryProvider,
    request: &ReconcileRequest,
    mode: RunMode,
) -> Result<RunOutcome> {
    let check_only = mode == RunMode::Check;
    log_op_start!(
        "reconcile_run",
        tf_name = %request.tf_name,
        os_name = %request.os_name,
        check_only = check_only
    );
    let start = Instant::now();

    let result = run_impl(document, provider, request, mode).map_err(|e| {
        log_op_error!(
            "reconcile_run",
            e,
            duration_ms = start.elapsed().as_millis() as u64,
            tf_name = %request.tf_name
        );
        e
    })?;

    log_op_end!(
        "reconcile_run",
        duration_ms = start.elapsed().as_millis() as u64,
        tf_name = %request.tf_name,
        outcome = outcome_label(&result)
    );

    Ok(result)
}

fn run_impl(
    document: &mut StateDocument,
    provider: &dyn InventoryProvider,
    request: &ReconcileRequest,
    mode: RunMode,
) -> Result<RunOutcome> {
    let doc_index = index::build(document, &ResourceKind::ALL)?;
    check_collisions("declared ports", doc_index.ip_to_port_id(), request.strict_ips)?;

    let snapshot = inventory::snapshot(provider, &NamePattern::exact(&request.os_name))?;
    check_collisions("live interfaces", &snapshot.ip_to_interface, request.strict_ips)?;

    reconcile_and_apply(document, &doc_index, &snapshot, request, mode)
}

fn reconcile_and_apply(
    document: &mut StateDocument,
    index: &DocumentIndex,
    snapshot: &InventorySnapshot,
    request: &ReconcileRequest,
    mode: RunMode,
) -> Result<RunOutcome> {
    let outcome = reconcile::reconcile(document, index, snapshot, &request.tf_name, &request.slots)?;

    match (outcome, mode) {
        (ReconcileOutcome::IdMismatch { declared_id, live_id }, _) => Ok(RunOutcome::InstanceMismatch {
            declared_id,
            live_id,
        }),
        (ReconcileOutcome::PendingImport(worklist), _) => {
            tracing::info!(pending_imports = worklist.len(), "ports must be imported before the state can be fixed");
            Ok(RunOutcome::PendingImport(worklist))
        }
        (ReconcileOutcome::Clean, RunMode::Check) => Ok(RunOutcome::Consistent),
        (ReconcileOutcome::Clean, RunMode::Apply) => {
            let report = mutate::apply(document, &request.tf_name, index.ip_to_port_id())?;
            tracing::info!(
                serial = report.serial_after,
                changed = report.changed_count(),
                "state document updated"
            );
            Ok(RunOutcome::Applied(report))
        }
    }
}

fn check_collisions(source: &str, ips: &IpIndex, strict: bool) -> Result<()> {
    for collision in ips.collisions() {
        tracing::warn!(
            source,
            ip = %collision.ip,
            first = %collision.first,
            second = %collision.second,
            "IP claimed twice; later owner wins"
        );
    }
    if strict {
        ips.ensure_no_collisions().map_err(ExError::from)?;
    }
    Ok(())
}

fn outcome_label(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::InstanceMismatch { .. } => "instance_mismatch",
        RunOutcome::PendingImport(_) => "pending_import",
        RunOutcome::Consistent => "consistent",
        RunOutcome::Applied(_) => "applied",
    }
}
