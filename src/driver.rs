//! Execution driver: exactly one instruction per call.

use crate::emulator::ReferenceCpu;

/// Reference cores are budget-driven rather than instruction-count-driven:
/// they loop until the cycle budget is exhausted. A budget of 1 is the
/// minimum that still completes the instruction being fetched, and
/// guarantees the core stops at the first boundary instead of catching up
/// a second instruction.
pub const SINGLE_INSTRUCTION_BUDGET: u32 = 1;

/// Advances the reference emulator by exactly one architecturally defined
/// instruction and returns the cycles it consumed. One instruction
/// boundary per call is a hard invariant the comparator relies on.
pub fn step_one<C: ReferenceCpu>(cpu: &mut C) -> u32 {
    cpu.execute(SINGLE_INSTRUCTION_BUDGET)
}
