//! Field-by-field comparison under the quirk policy.

use std::fmt;

use crate::quirk::{QuirkKind, QuirkPolicy};
use crate::state::StateModel;

/// The first disagreeing field of a failed case.
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    pub field: String,
    pub expected: u64,
    pub actual: u64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expected={} got={}",
            self.field, self.expected, self.actual
        )
    }
}

/// Pass/fail verdict for one test case. Only the first mismatch in the
/// fixed field-check order is retained; downstream reporting shows one
/// representative failure per case.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonResult {
    pub passed: bool,
    pub first_mismatch: Option<Mismatch>,
}

impl ComparisonResult {
    fn pass() -> Self {
        Self {
            passed: true,
            first_mismatch: None,
        }
    }

    fn fail(mismatch: Mismatch) -> Self {
        Self {
            passed: false,
            first_mismatch: Some(mismatch),
        }
    }
}

/// Compares the projected final state against the expected final state.
///
/// The check order is fixed so the reported first mismatch is reproducible
/// across runs: scalars in the architecture's declared order, then memory
/// regions (sparse, expected cells only), then the cycle count. Comparison
/// stops at the first disagreement.
///
/// The cycle count is exact equality against the expected trace length;
/// no quirk rule applies to it.
pub fn compare_states<S: StateModel>(
    opcode: u8,
    initial: &S,
    expected: &S,
    actual: &S,
    expected_cycles: usize,
    consumed_cycles: u32,
    policy: &QuirkPolicy,
) -> ComparisonResult {
    let expected_scalars = expected.scalars();
    let actual_scalars = actual.scalars();
    debug_assert_eq!(expected_scalars.len(), actual_scalars.len());

    for (exp, act) in expected_scalars.iter().zip(&actual_scalars) {
        debug_assert_eq!(exp.field, act.field);
        let agrees = match policy.field_rule(opcode, exp.field).map(|r| &r.kind) {
            Some(QuirkKind::Exclude) => true,
            Some(QuirkKind::Narrow { mask }) => exp.value & mask == act.value & mask,
            Some(QuirkKind::Tolerance {
                wrap_mask,
                deltas,
                gate,
            }) => {
                let diff = act.value.wrapping_sub(exp.value) & wrap_mask;
                diff == 0 || (gate.is_open(initial) && deltas.contains(&diff))
            }
            None => exp.value == act.value,
        };
        if !agrees {
            return ComparisonResult::fail(Mismatch {
                field: exp.field.to_string(),
                expected: exp.value,
                actual: act.value,
            });
        }
    }

    // Sparse comparison: only addresses present in the expected overlay are
    // asserted; anything else the reference wrote is unconstrained.
    let actual_regions = actual.regions();
    for region in expected.regions() {
        let rule = policy.field_rule(opcode, region.name).map(|r| &r.kind);
        if matches!(rule, Some(QuirkKind::Exclude)) {
            continue;
        }
        let counterpart = actual_regions.iter().find(|r| r.name == region.name);
        for &(addr, exp_byte) in &region.cells {
            let cell = format!("{}[{addr:#06x}]", region.name);
            let Some(got) = counterpart
                .and_then(|r| r.cells.iter().find(|&&(a, _)| a == addr))
                .map(|&(_, byte)| byte)
            else {
                // Both sides must define every compared cell; a hole here
                // is a projection defect, reported as a mismatch so the
                // case surfaces in the failure list.
                return ComparisonResult::fail(Mismatch {
                    field: format!("{cell} (unprojected)"),
                    expected: exp_byte as u64,
                    actual: 0,
                });
            };
            if got != exp_byte {
                return ComparisonResult::fail(Mismatch {
                    field: cell,
                    expected: exp_byte as u64,
                    actual: got as u64,
                });
            }
        }
    }

    if consumed_cycles as usize != expected_cycles {
        return ComparisonResult::fail(Mismatch {
            field: "cycles".to_string(),
            expected: expected_cycles as u64,
            actual: consumed_cycles as u64,
        });
    }

    ComparisonResult::pass()
}
