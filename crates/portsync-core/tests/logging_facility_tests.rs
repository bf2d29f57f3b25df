#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use portsync_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_TF_NAME,
};
use portsync_core::errors::{ExErrorKind, PortSyncError};
use portsync_core::inventory::StaticInventoryProvider;
use portsync_core::logging_facility::init_test_capture;
use portsync_core::{log_op_end, log_op_error, log_op_start, run, RunMode};

#[test]
fn test_log_op_start_and_end_macros() {
    let capture = init_test_capture();
    let op_name = "test_log_op_pair_unique_1";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].field(FIELD_DURATION_MS), Some("42"));
    assert!(events[0].field(FIELD_COMPONENT).is_some());
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = PortSyncError::AmbiguousServer {
        pattern: "^web$".to_string(),
        count: 2,
    };
    log_op_error!(op_name, err, duration_ms = 3);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_AMBIGUOUS_MATCH"));
    assert_eq!(
        events[0].field(FIELD_ERR_KIND),
        Some(format!("{:?}", ExErrorKind::AmbiguousMatch).as_str())
    );
}

#[test]
fn test_run_emits_start_and_end_with_outcome() {
    let capture = init_test_capture();
    let mut document = simple_vm_document();
    run(&mut document, &live_inventory(), &request(), RunMode::Check).unwrap();

    let ours = capture.count_events(|e| {
        e.op.as_deref() == Some("reconcile_run")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("outcome") == Some("pending_import")
    });
    assert!(ours >= 1, "expected a reconcile_run end event with outcome=pending_import");
    capture.assert_event_exists("reconcile_run", EVENT_START);
}

#[test]
fn test_run_failure_emits_single_end_error() {
    let capture = init_test_capture();
    let mut document = simple_vm_document();
    let mut req = request();
    req.tf_name = "logging_test_missing_vm".to_string();

    let err = run(&mut document, &StaticInventoryProvider::default(), &req, RunMode::Check).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("reconcile_run")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_TF_NAME) == Some("logging_test_missing_vm")
    });
    assert_eq!(errors, 1);
}
