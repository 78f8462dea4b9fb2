//! MCS-48 (I8035) architecture binding.
//!
//! The richest reconciliation case of the three architectures: a 12-bit
//! program counter, a deferred memory-bank latch the two machines resolve
//! at different pipeline stages, Harvard-separate program and MOVX data
//! spaces that the vectors flatten into one, and a reference core that
//! transfers its state by raw struct copy (hence the layout gate).

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::emulator::ReferenceCpu;
use crate::error::ProjectionFault;
use crate::project::Projector;
use crate::quirk::{CaseExclusion, OpcodeSet, QuirkKind, QuirkPolicy, QuirkRule, ToleranceGate};
use crate::state::{Region, Scalar, StateModel};

/// 12-bit program counter space.
pub const PC_MASK: u16 = 0x0FFF;

/// Page size for page-relative branch targets.
pub const PAGE_SIZE: u16 = 0x100;

/// Adapter address map: program memory occupies `0x0000..=0xFFFF`; the
/// 256-byte external (MOVX) data space sits directly above it.
pub const XDATA_BASE: u32 = 0x1_0000;

/// Logical MCS-48 state exactly as the vector files carry it.
///
/// `ram` is the flat program-space overlay (which doubles as the MOVX data
/// space in the vectors); `internal_ram` is the on-chip register file and
/// stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mcs48State {
    pub pc: u16,
    pub a: u8,
    pub psw: u8,
    pub f1: bool,
    pub t: u8,
    pub dbbb: u8,
    pub p1: u8,
    pub p2: u8,
    pub a11: bool,
    pub a11_pending: bool,
    pub timer_enabled: bool,
    pub counter_enabled: bool,
    pub timer_overflow: bool,
    pub int_enabled: bool,
    pub tcnti_enabled: bool,
    pub in_interrupt: bool,
    pub ram: Vec<(u16, u8)>,
    pub internal_ram: Vec<(u8, u8)>,
}

impl StateModel for Mcs48State {
    fn scalars(&self) -> Vec<Scalar> {
        vec![
            Scalar { field: "pc", value: self.pc as u64 },
            Scalar { field: "a", value: self.a as u64 },
            Scalar { field: "t", value: self.t as u64 },
            Scalar { field: "dbbb", value: self.dbbb as u64 },
            Scalar { field: "p1", value: self.p1 as u64 },
            Scalar { field: "p2", value: self.p2 as u64 },
            Scalar { field: "psw", value: self.psw as u64 },
            Scalar { field: "f1", value: self.f1 as u64 },
            Scalar { field: "a11", value: self.a11 as u64 },
            Scalar { field: "a11_pending", value: self.a11_pending as u64 },
            Scalar { field: "timer_enabled", value: self.timer_enabled as u64 },
            Scalar { field: "counter_enabled", value: self.counter_enabled as u64 },
            Scalar { field: "timer_overflow", value: self.timer_overflow as u64 },
            Scalar { field: "int_enabled", value: self.int_enabled as u64 },
            Scalar { field: "tcnti_enabled", value: self.tcnti_enabled as u64 },
            Scalar { field: "in_interrupt", value: self.in_interrupt as u64 },
        ]
    }

    fn regions(&self) -> Vec<Region> {
        vec![
            Region {
                name: "ram",
                cells: self.ram.iter().map(|&(a, b)| (a as u32, b)).collect(),
            },
            Region {
                name: "iram",
                cells: self
                    .internal_ram
                    .iter()
                    .map(|&(a, b)| (a as u32, b))
                    .collect(),
            },
        ]
    }
}

/// Named-field state contract (v1) every MCS-48 reference adapter exposes.
///
/// Derived values (the register-bank pointer, the stack slot packed into
/// PSW) are the adapter's to recompute from `psw` inside `set_state`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mcs48Native {
    pub pc: u16,
    pub a: u8,
    pub psw: u8,
    pub f1: bool,
    pub timer: u8,
    pub bus: u8,
    pub p1: u8,
    pub p2: u8,
    pub a11: bool,
    pub a11_pending: bool,
    pub timer_run: bool,
    pub counter_run: bool,
    pub timer_overflow: bool,
    pub ext_irq_enabled: bool,
    pub timer_irq_enabled: bool,
    pub in_interrupt: bool,
    pub iram: [u8; 128],
}

impl Default for Mcs48Native {
    fn default() -> Self {
        Self {
            pc: 0,
            a: 0,
            psw: 0,
            f1: false,
            timer: 0,
            bus: 0,
            p1: 0,
            p2: 0,
            a11: false,
            a11_pending: false,
            timer_run: false,
            counter_run: false,
            timer_overflow: false,
            ext_irq_enabled: false,
            timer_irq_enabled: false,
            in_interrupt: false,
            iram: [0; 128],
        }
    }
}

/// Projects logical MCS-48 state into any reference core speaking the
/// [`Mcs48Native`] contract, and back.
pub struct Mcs48Projector<C> {
    _cpu: PhantomData<C>,
}

impl<C> Mcs48Projector<C> {
    pub fn new() -> Self {
        Self { _cpu: PhantomData }
    }
}

impl<C> Default for Mcs48Projector<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ReferenceCpu<State = Mcs48Native>> Projector for Mcs48Projector<C> {
    type Cpu = C;
    type State = Mcs48State;

    fn load(&self, cpu: &mut C, state: &Mcs48State) -> Result<(), ProjectionFault> {
        if state.pc > PC_MASK {
            return Err(ProjectionFault::OutOfRange {
                field: "pc",
                value: state.pc as u64,
                limit: PC_MASK as u64,
            });
        }

        cpu.reset();

        // Program image first: the opcode fetch below and quirk-predicate
        // evaluation both read it. The low page doubles as the MOVX data
        // window, which the reference keeps in a separate space.
        for &(addr, byte) in &state.ram {
            cpu.write_memory(addr as u32, byte);
            if addr < PAGE_SIZE {
                cpu.write_memory(XDATA_BASE + addr as u32, byte);
            }
        }

        let mut native = Mcs48Native {
            pc: state.pc,
            a: state.a,
            psw: state.psw,
            f1: state.f1,
            timer: state.t,
            bus: state.dbbb,
            p1: state.p1,
            p2: state.p2,
            a11: state.a11,
            a11_pending: state.a11_pending,
            timer_run: state.timer_enabled,
            counter_run: state.counter_enabled,
            timer_overflow: state.timer_overflow,
            ext_irq_enabled: state.int_enabled,
            timer_irq_enabled: state.tcnti_enabled,
            in_interrupt: state.in_interrupt,
            iram: [0; 128],
        };
        for &(offset, byte) in &state.internal_ram {
            let Some(cell) = native.iram.get_mut(offset as usize) else {
                return Err(ProjectionFault::OutOfRange {
                    field: "internal_ram",
                    value: offset as u64,
                    limit: native.iram.len() as u64 - 1,
                });
            };
            *cell = byte;
        }

        // The two machines latch the pending memory bank at different
        // pipeline stages: the subject resolves a11_pending when JMP/CALL
        // executes, the reference consumed it earlier. Forward the pending
        // value for exactly this control transfer so both observe the same
        // effective bank.
        let opcode = cpu.read_memory(state.pc as u32);
        let is_jmp = opcode & 0x1F == 0x04;
        let is_call = opcode & 0x1F == 0x14;
        if is_jmp || is_call {
            native.a11 = native.a11_pending;
        }

        cpu.set_state(&native);
        Ok(())
    }

    fn unload(&self, cpu: &mut C, template: &Mcs48State) -> Mcs48State {
        let native = cpu.get_state();
        let ram = template
            .ram
            .iter()
            .map(|&(addr, _)| (addr, cpu.read_memory(addr as u32)))
            .collect();
        let internal_ram = template
            .internal_ram
            .iter()
            .map(|&(offset, _)| {
                (
                    offset,
                    native.iram.get(offset as usize).copied().unwrap_or(0),
                )
            })
            .collect();
        Mcs48State {
            // Native cores may run a wider counter; the architectural
            // space is 12 bits.
            pc: native.pc & PC_MASK,
            a: native.a,
            psw: native.psw,
            f1: native.f1,
            t: native.timer,
            dbbb: native.bus,
            p1: native.p1,
            p2: native.p2,
            a11: native.a11,
            a11_pending: native.a11_pending,
            timer_enabled: native.timer_run,
            counter_enabled: native.counter_run,
            timer_overflow: native.timer_overflow,
            int_enabled: native.ext_irq_enabled,
            tcnti_enabled: native.timer_irq_enabled,
            in_interrupt: native.in_interrupt,
            ram,
            internal_ram,
        }
    }
}

/// The twelve flag/pin conditional jumps (Jcond addr).
const COND_JUMPS: &[u8] = &[
    0x16, 0x26, 0x36, 0x46, 0x56, 0x76, 0x86, 0x96, 0xB6, 0xC6, 0xE6, 0xF6,
];

/// Accepted wrapped PC differences when the reference resolves a
/// page-relative target from the post-fetch page base: one page in either
/// direction within the 12-bit space.
const PAGE_DELTAS: &[u64] = &[0x100, 0xF00];

/// A 2-byte conditional branch starting at page offset 0xFE fetches its
/// target byte from the last byte of the page; the subject forms the
/// target from the pre-fetch page base while the reference uses the
/// post-fetch base, shifting the result by exactly one page.
const PAGE_TOLERANCE: QuirkKind = QuirkKind::Tolerance {
    wrap_mask: PC_MASK as u64,
    deltas: PAGE_DELTAS,
    gate: ToleranceGate::PageOffset {
        page_mask: PAGE_SIZE as u32 - 1,
        offset: 0xFE,
    },
};

/// Documented divergences between the subject and the mame4all-derived
/// MCS-48 reference core.
pub fn policy() -> QuirkPolicy {
    let rules = vec![
        QuirkRule {
            opcodes: OpcodeSet::Masked {
                mask: 0x1F,
                value: 0x12,
            },
            fields: &["pc"],
            kind: PAGE_TOLERANCE,
            rationale: "JBb from page offset 0xFE: the reference forms the \
                        page-relative target from the post-fetch page base, \
                        the subject from the pre-fetch base",
        },
        QuirkRule {
            opcodes: OpcodeSet::List(COND_JUMPS),
            fields: &["pc"],
            kind: PAGE_TOLERANCE,
            rationale: "conditional jumps from page offset 0xFE: post-fetch \
                        vs pre-fetch page base for the branch target",
        },
        QuirkRule {
            opcodes: OpcodeSet::Range(0xE8..=0xEF),
            fields: &["pc"],
            kind: PAGE_TOLERANCE,
            rationale: "DJNZ from page offset 0xFE: post-fetch vs pre-fetch \
                        page base for the branch target",
        },
        QuirkRule {
            opcodes: OpcodeSet::List(&[0xE5, 0xF5]),
            fields: &["a11"],
            kind: QuirkKind::Exclude,
            rationale: "SEL MB0/MB1: the reference retargets the live bank \
                        bit immediately, the subject defers it in the \
                        pending latch until the next JMP/CALL",
        },
        QuirkRule {
            opcodes: OpcodeSet::Exact(0x55),
            fields: &["t", "timer_overflow"],
            kind: QuirkKind::Exclude,
            rationale: "STRT T: the reference runs the timer behind a \
                        divide-by-32 prescaler, the subject ticks it every \
                        machine cycle",
        },
        QuirkRule {
            opcodes: OpcodeSet::Range(0x00..=0xFF),
            fields: &["ram"],
            kind: QuirkKind::Exclude,
            rationale: "the vectors flatten program and MOVX data into one \
                        space; the reference keeps Harvard-separate spaces, \
                        so external memory is load-only",
        },
    ];
    let case_exclusions = vec![CaseExclusion {
        opcodes: OpcodeSet::Range(0x9C..=0x9F),
        rationale: "ANLD Pp,A: the reference reads the next opcode byte \
                    instead of the accumulator for the AND operand",
    }];
    QuirkPolicy::new(rules, case_exclusions).expect("MCS-48 quirk table is disjoint by construction")
}
