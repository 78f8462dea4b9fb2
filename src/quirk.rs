//! Declarative table of documented divergences between the two emulators.
//!
//! Every intentional comparison exclusion or tolerance lives here as a
//! rule with a recorded rationale; nothing in the comparator branches on
//! opcodes directly. The table is built once per process and read-only
//! afterwards.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::state::StateModel;

/// Opcode selector for a rule: exact value, bit pattern, contiguous range,
/// or explicit list.
#[derive(Clone, Debug)]
pub enum OpcodeSet {
    Exact(u8),
    Masked { mask: u8, value: u8 },
    Range(RangeInclusive<u8>),
    List(&'static [u8]),
}

impl OpcodeSet {
    pub fn contains(&self, opcode: u8) -> bool {
        match self {
            OpcodeSet::Exact(v) => opcode == *v,
            OpcodeSet::Masked { mask, value } => opcode & mask == *value,
            OpcodeSet::Range(r) => r.contains(&opcode),
            OpcodeSet::List(l) => l.contains(&opcode),
        }
    }
}

/// Precondition for a tolerance window, evaluated against the initial
/// state of the test case.
#[derive(Clone, Copy, Debug)]
pub enum ToleranceGate {
    Always,
    /// Open only when the initial program counter sits at `offset` within
    /// its page (`pc & page_mask == offset`).
    PageOffset { page_mask: u32, offset: u32 },
}

impl ToleranceGate {
    pub fn is_open<S: StateModel>(&self, initial: &S) -> bool {
        match *self {
            ToleranceGate::Always => true,
            ToleranceGate::PageOffset { page_mask, offset } => initial
                .scalar("pc")
                .is_some_and(|pc| pc as u32 & page_mask == offset),
        }
    }
}

/// What a matching rule does to the affected field's comparison.
#[derive(Clone, Debug)]
pub enum QuirkKind {
    /// The field is not compared at all for matching opcodes.
    Exclude,
    /// Exact equality still passes; additionally, while the gate holds, a
    /// wrapped difference `(actual - expected) & wrap_mask` contained in
    /// `deltas` is accepted.
    Tolerance {
        wrap_mask: u64,
        deltas: &'static [u64],
        gate: ToleranceGate,
    },
    /// Both sides are masked to the architecturally defined bits before
    /// comparison.
    Narrow { mask: u64 },
}

/// A single documented divergence.
#[derive(Clone, Debug)]
pub struct QuirkRule {
    pub opcodes: OpcodeSet,
    pub fields: &'static [&'static str],
    pub kind: QuirkKind,
    pub rationale: &'static str,
}

/// A whole-case exclusion: matching opcodes are not executed at all and
/// their cases are counted as skipped, not passed or failed.
#[derive(Clone, Debug)]
pub struct CaseExclusion {
    pub opcodes: OpcodeSet,
    pub rationale: &'static str,
}

#[derive(Debug, Error)]
pub enum PolicyError {
    /// Two rules claim the same field for the same opcode. The table is
    /// the single source of truth for intentional divergence, so ambiguity
    /// is rejected up front instead of resolved by priority.
    #[error("overlapping quirk rules for field `{field}` at opcode {opcode:#04x}")]
    Overlap { field: &'static str, opcode: u8 },
}

#[derive(Debug)]
pub struct QuirkPolicy {
    rules: Vec<QuirkRule>,
    case_exclusions: Vec<CaseExclusion>,
}

impl QuirkPolicy {
    /// Builds the policy, rejecting rule sets that are not disjoint per
    /// field. Brute force over the full opcode space is exhaustive and
    /// cheap for an 8-bit opcode.
    pub fn new(
        rules: Vec<QuirkRule>,
        case_exclusions: Vec<CaseExclusion>,
    ) -> Result<Self, PolicyError> {
        for opcode in 0..=0xFFu8 {
            let mut claimed: Vec<&'static str> = Vec::new();
            for rule in rules.iter().filter(|r| r.opcodes.contains(opcode)) {
                for &field in rule.fields {
                    if claimed.contains(&field) {
                        return Err(PolicyError::Overlap { field, opcode });
                    }
                    claimed.push(field);
                }
            }
        }
        Ok(Self {
            rules,
            case_exclusions,
        })
    }

    /// A policy with no documented divergences: every field compares
    /// exactly.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            case_exclusions: Vec::new(),
        }
    }

    /// The rule affecting `field` for `opcode`, if any. Disjointness makes
    /// the first match the only match.
    pub fn field_rule(&self, opcode: u8, field: &str) -> Option<&QuirkRule> {
        self.rules
            .iter()
            .find(|r| r.opcodes.contains(opcode) && r.fields.iter().any(|&f| f == field))
    }

    /// The whole-case exclusion matching `opcode`, if any.
    pub fn case_exclusion(&self, opcode: u8) -> Option<&CaseExclusion> {
        self.case_exclusions
            .iter()
            .find(|e| e.opcodes.contains(opcode))
    }
}
