//! Sequential orchestration: one case, one file, one run.
//!
//! Everything is strictly sequential; the reference core holds mutable
//! state that cannot be shared between in-flight cases, and the engine
//! constructs a fresh logical state per case so nothing survives a
//! test-case boundary.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::compare;
use crate::driver;
use crate::error::{FatalError, ProjectionFault};
use crate::project::Projector;
use crate::quirk::QuirkPolicy;
use crate::report::{FileSummary, Report};
use crate::state::{StateModel, TestCase, load_cases};

/// Outcome of a single test case.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(String),
    Skip,
}

/// Runs one case: project in, execute exactly one instruction, project
/// out, compare under the policy.
pub fn run_case<P: Projector>(
    projector: &P,
    cpu: &mut P::Cpu,
    case: &TestCase<P::State>,
    policy: &QuirkPolicy,
) -> Verdict {
    let Some(opcode) = case.opcode() else {
        let pc = case.initial.scalar("pc").unwrap_or(0) as u32;
        return Verdict::Fail(ProjectionFault::MissingOpcode { pc }.to_string());
    };

    if policy.case_exclusion(opcode).is_some() {
        return Verdict::Skip;
    }

    if let Err(fault) = projector.load(cpu, &case.initial) {
        return Verdict::Fail(fault.to_string());
    }

    let consumed = driver::step_one(cpu);
    let actual = projector.unload(cpu, &case.final_state);

    let result = compare::compare_states(
        opcode,
        &case.initial,
        &case.final_state,
        &actual,
        case.cycles.len(),
        consumed,
        policy,
    );
    match result.first_mismatch {
        None => Verdict::Pass,
        Some(mismatch) => Verdict::Fail(mismatch.to_string()),
    }
}

/// Runs every case in one vector file, recording failures into `report`
/// and printing per-file progress.
pub fn run_file<P>(
    projector: &P,
    cpu: &mut P::Cpu,
    path: &Path,
    policy: &QuirkPolicy,
    report: &mut Report,
) -> Result<FileSummary, FatalError>
where
    P: Projector,
    P::State: DeserializeOwned,
{
    println!("Loading {}...", path.display());
    let cases: Vec<TestCase<P::State>> = load_cases(path)?;
    println!("  {} test cases", cases.len());

    let mut summary = FileSummary {
        path: path.to_path_buf(),
        ..FileSummary::default()
    };

    // Vector files are conventionally single-opcode, so a file whose first
    // case matches a whole-case exclusion is skipped wholesale.
    if let Some(opcode) = cases.first().and_then(|c| c.opcode())
        && let Some(exclusion) = policy.case_exclusion(opcode)
    {
        println!(
            "  Skipped (excluded opcode {opcode:#04X}: {})",
            exclusion.rationale
        );
        summary.skipped = cases.len();
        return Ok(summary);
    }

    let mut first_error: Option<String> = None;
    for case in &cases {
        match run_case(projector, cpu, case, policy) {
            Verdict::Pass => summary.passed += 1,
            Verdict::Skip => summary.skipped += 1,
            Verdict::Fail(detail) => {
                summary.failed += 1;
                if first_error.is_none() {
                    first_error = Some(detail.clone());
                }
                report.record_failure(case.name.clone(), detail);
            }
        }
    }

    println!(
        "  Results: {} passed, {} failed",
        summary.passed, summary.failed
    );
    if let Some(detail) = &first_error {
        println!("  First error: {detail}");
    }

    Ok(summary)
}

/// Entry point for a whole run: the structural layout gate fires once,
/// before any test case, then files are processed strictly in order.
pub fn run_files<P>(
    projector: &P,
    cpu: &mut P::Cpu,
    policy: &QuirkPolicy,
    paths: &[PathBuf],
) -> Result<Report, FatalError>
where
    P: Projector,
    P::State: DeserializeOwned,
{
    projector.verify_native_layout(cpu)?;

    let mut report = Report::default();
    for path in paths {
        let summary = run_file(projector, cpu, path, policy, &mut report)?;
        report.record_file(summary);
    }
    Ok(report)
}
