//! M6800 architecture binding.
//!
//! A flat 64KB address space and a six-field register file; the only
//! documented divergence is the pair of undefined condition-code bits.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::emulator::ReferenceCpu;
use crate::error::ProjectionFault;
use crate::project::Projector;
use crate::quirk::{OpcodeSet, QuirkKind, QuirkPolicy, QuirkRule};
use crate::state::{Region, Scalar, StateModel};

/// Logical M6800 state exactly as the vector files carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct M6800State {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub x: u16,
    pub cc: u8,
    pub ram: Vec<(u16, u8)>,
}

impl StateModel for M6800State {
    fn scalars(&self) -> Vec<Scalar> {
        vec![
            Scalar { field: "pc", value: self.pc as u64 },
            Scalar { field: "a", value: self.a as u64 },
            Scalar { field: "b", value: self.b as u64 },
            Scalar { field: "x", value: self.x as u64 },
            Scalar { field: "sp", value: self.sp as u64 },
            Scalar { field: "cc", value: self.cc as u64 },
        ]
    }

    fn regions(&self) -> Vec<Region> {
        vec![Region {
            name: "ram",
            cells: self.ram.iter().map(|&(a, b)| (a as u32, b)).collect(),
        }]
    }
}

/// Named-field state contract (v1) every M6800 reference adapter exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct M6800Native {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub x: u16,
    pub cc: u8,
}

/// Projects logical M6800 state into any reference core speaking the
/// [`M6800Native`] contract, and back. No pre-compensation is required;
/// the two machines agree on every pipeline stage.
pub struct M6800Projector<C> {
    _cpu: PhantomData<C>,
}

impl<C> M6800Projector<C> {
    pub fn new() -> Self {
        Self { _cpu: PhantomData }
    }
}

impl<C> Default for M6800Projector<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ReferenceCpu<State = M6800Native>> Projector for M6800Projector<C> {
    type Cpu = C;
    type State = M6800State;

    fn load(&self, cpu: &mut C, state: &M6800State) -> Result<(), ProjectionFault> {
        // Reset first: it clears wait/irq residue but also fetches a reset
        // vector from whatever memory holds, so the overlay and the
        // explicit register state below both land afterwards.
        cpu.reset();
        for &(addr, byte) in &state.ram {
            cpu.write_memory(addr as u32, byte);
        }
        cpu.set_state(&M6800Native {
            pc: state.pc,
            sp: state.sp,
            a: state.a,
            b: state.b,
            x: state.x,
            cc: state.cc,
        });
        Ok(())
    }

    fn unload(&self, cpu: &mut C, template: &M6800State) -> M6800State {
        let native = cpu.get_state();
        let ram = template
            .ram
            .iter()
            .map(|&(addr, _)| (addr, cpu.read_memory(addr as u32)))
            .collect();
        M6800State {
            pc: native.pc,
            sp: native.sp,
            a: native.a,
            b: native.b,
            x: native.x,
            cc: native.cc,
            ram,
        }
    }
}

/// Condition-code bits compared on both sides; bits 6 and 7 are
/// architecturally undefined on the real part.
pub const CC_DEFINED_MASK: u64 = 0x3F;

/// Documented divergences between the subject and the mame4all-derived
/// M6800 reference core.
pub fn policy() -> QuirkPolicy {
    let rules = vec![QuirkRule {
        opcodes: OpcodeSet::Range(0x00..=0xFF),
        fields: &["cc"],
        kind: QuirkKind::Narrow {
            mask: CC_DEFINED_MASK,
        },
        rationale: "CC bits 6-7 are architecturally undefined on the M6800; \
                    the two implementations are free to disagree there",
    }];
    QuirkPolicy::new(rules, Vec::new()).expect("M6800 quirk table is disjoint by construction")
}
