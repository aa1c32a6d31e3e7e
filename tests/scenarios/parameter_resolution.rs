//! Test: Parameter resolution between jobs

use crate::helpers::*;
use serde_json::json;
use web3_devops::actions::ActionKind;
use web3_devops::core::{JobOutput, UnresolvedReason};

/// Jobs run exactly once each, in declaration order
#[tokio::test]
async fn test_jobs_run_in_declaration_order() {
    let yaml = r#"
name: "Test: Order"
jobs:
  - name: Verify
    uses: actions/verify@v1
  - name: Compile
    uses: actions/compile@v1
  - name: Deploy
    uses: actions/deploy@v1
"#;
    let log = new_call_log();
    let registry = recording_registry(
        &log,
        &[
            (ActionKind::Compile, JobOutput::success()),
            (ActionKind::Deploy, JobOutput::success()),
            (ActionKind::Verify, JobOutput::success()),
        ],
    );

    let report = run_with_registry(yaml, registry).await;

    let kinds: Vec<ActionKind> = log.lock().unwrap().iter().map(|call| call.kind).collect();
    assert_eq!(kinds, [ActionKind::Verify, ActionKind::Compile, ActionKind::Deploy]);
    let names: Vec<&str> = report.jobs.iter().map(|job| job.job_name.as_str()).collect();
    assert_eq!(names, ["Verify", "Compile", "Deploy"]);
}

/// Values that are not whole reference expressions reach the action untouched
#[tokio::test]
async fn test_non_reference_values_pass_through() {
    let yaml = r#"
name: "Test: Pass-through"
jobs:
  - name: Deploy
    uses: actions/deploy@v1
    with:
      network: localhost
      gas: 21000
      dry_run: false
      args: ["Hello", 42]
      options:
        confirmations: 2
      label: "address is ${{ jobs.Compile.output.status }}"
      wrong_shape: "${{ jobs.Compile.status }}"
      nothing: null
"#;
    let log = new_call_log();
    let registry = recording_registry(&log, &[(ActionKind::Deploy, JobOutput::success())]);

    let report = run_with_registry(yaml, registry).await;

    let params = log.lock().unwrap()[0].params.clone();
    assert_eq!(params["network"], json!("localhost"));
    assert_eq!(params["gas"], json!(21000));
    assert_eq!(params["dry_run"], json!(false));
    assert_eq!(params["args"], json!(["Hello", 42]));
    assert_eq!(params["options"], json!({"confirmations": 2}));
    assert_eq!(params["label"], json!("address is ${{ jobs.Compile.output.status }}"));
    assert_eq!(params["wrong_shape"], json!("${{ jobs.Compile.status }}"));
    assert_eq!(params["nothing"], json!(null));
    assert!(report.jobs[0].warnings.is_empty());
}

/// A reference to a later job is never satisfied by that later job
#[tokio::test]
async fn test_forward_reference_resolves_to_null() {
    let yaml = r#"
name: "Test: Forward Reference"
jobs:
  - name: Verify
    uses: actions/verify@v1
    with:
      address: "${{ jobs.Deploy.output.address }}"
  - name: Deploy
    uses: actions/deploy@v1
"#;
    let log = new_call_log();
    let registry = recording_registry(
        &log,
        &[
            (ActionKind::Verify, JobOutput::success()),
            (ActionKind::Deploy, JobOutput::success().with_field("address", "0xABC")),
        ],
    );

    let report = run_with_registry(yaml, registry).await;

    assert_eq!(log.lock().unwrap()[0].params["address"], json!(null));
    let warning = &report.job("Verify").unwrap().warnings[0];
    assert_eq!(warning.reason, UnresolvedReason::JobNotFound);
    assert_eq!(warning.param, "address");
}

/// Whitespace inside the delimiters is ignored; any output key may be read
#[tokio::test]
async fn test_reference_reads_status_and_custom_fields() {
    let yaml = r#"
name: "Test: Output Keys"
jobs:
  - name: Deploy
    uses: actions/deploy@v1
  - name: Verify
    uses: actions/verify@v1
    with:
      address: "${{jobs.Deploy.output.address}}"
      deploy_status: "${{   jobs.Deploy.output.status   }}"
      block: "${{ jobs.Deploy.output.block }}"
"#;
    let log = new_call_log();
    let registry = recording_registry(
        &log,
        &[
            (
                ActionKind::Deploy,
                JobOutput::success().with_field("address", "0xABC").with_field("block", 17),
            ),
            (ActionKind::Verify, JobOutput::success()),
        ],
    );

    let report = run_with_registry(yaml, registry).await;

    let params = log.lock().unwrap()[1].params.clone();
    assert_eq!(params["address"], json!("0xABC"));
    assert_eq!(params["deploy_status"], json!("success"));
    assert_eq!(params["block"], json!(17));
    assert!(report.is_success());
}

/// The resolver reads `jobs`, not `job`; a near-miss stays a literal string
#[tokio::test]
async fn test_malformed_reference_is_literal() {
    let yaml = r#"
name: "Test: Near Miss"
jobs:
  - name: Deploy
    uses: actions/deploy@v1
  - name: Verify
    uses: actions/verify@v1
    with:
      address: "${{ job.Deploy.output.address }}"
"#;
    let log = new_call_log();
    let registry = recording_registry(
        &log,
        &[
            (ActionKind::Deploy, JobOutput::success().with_field("address", "0xABC")),
            (ActionKind::Verify, JobOutput::success()),
        ],
    );

    run_with_registry(yaml, registry).await;

    assert_eq!(
        log.lock().unwrap()[1].params["address"],
        json!("${{ job.Deploy.output.address }}")
    );
}

/// With duplicate job names the later output is the one referenced
#[tokio::test]
async fn test_duplicate_job_name_later_output_wins() {
    let yaml = r#"
name: "Test: Duplicates"
jobs:
  - name: Build
    uses: actions/compile@v1
  - name: Build
    uses: actions/deploy@v1
  - name: Check
    uses: actions/verify@v1
    with:
      address: "${{ jobs.Build.output.address }}"
"#;
    let log = new_call_log();
    let registry = recording_registry(
        &log,
        &[
            (ActionKind::Compile, JobOutput::success()),
            (ActionKind::Deploy, JobOutput::success().with_field("address", "0xDEF")),
            (ActionKind::Verify, JobOutput::success()),
        ],
    );

    run_with_registry(yaml, registry).await;

    assert_eq!(log.lock().unwrap()[2].params["address"], json!("0xDEF"));
}
