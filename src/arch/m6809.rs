//! M6809 architecture binding.
//!
//! The clean baseline: every field compares exactly, with an empty quirk
//! table. Useful as proof that the engine adds no tolerance of its own.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::emulator::ReferenceCpu;
use crate::error::ProjectionFault;
use crate::project::Projector;
use crate::quirk::QuirkPolicy;
use crate::state::{Region, Scalar, StateModel};

/// Logical M6809 state exactly as the vector files carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct M6809State {
    pub pc: u16,
    pub s: u16,
    pub u: u16,
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub cc: u8,
    pub ram: Vec<(u16, u8)>,
}

impl StateModel for M6809State {
    fn scalars(&self) -> Vec<Scalar> {
        vec![
            Scalar { field: "pc", value: self.pc as u64 },
            Scalar { field: "a", value: self.a as u64 },
            Scalar { field: "b", value: self.b as u64 },
            Scalar { field: "dp", value: self.dp as u64 },
            Scalar { field: "x", value: self.x as u64 },
            Scalar { field: "y", value: self.y as u64 },
            Scalar { field: "u", value: self.u as u64 },
            Scalar { field: "s", value: self.s as u64 },
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

/// Named-field state contract (v1) every M6809 reference adapter exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct M6809Native {
    pub pc: u16,
    pub s: u16,
    pub u: u16,
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub cc: u8,
}

/// Projects logical M6809 state into any reference core speaking the
/// [`M6809Native`] contract, and back.
pub struct M6809Projector<C> {
    _cpu: PhantomData<C>,
}

impl<C> M6809Projector<C> {
    pub fn new() -> Self {
        Self { _cpu: PhantomData }
    }
}

impl<C> Default for M6809Projector<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ReferenceCpu<State = M6809Native>> Projector for M6809Projector<C> {
    type Cpu = C;
    type State = M6809State;

    fn load(&self, cpu: &mut C, state: &M6809State) -> Result<(), ProjectionFault> {
        cpu.reset();
        for &(addr, byte) in &state.ram {
            cpu.write_memory(addr as u32, byte);
        }
        cpu.set_state(&M6809Native {
            pc: state.pc,
            s: state.s,
            u: state.u,
            a: state.a,
            b: state.b,
            dp: state.dp,
            x: state.x,
            y: state.y,
            cc: state.cc,
        });
        Ok(())
    }

    fn unload(&self, cpu: &mut C, template: &M6809State) -> M6809State {
        let native = cpu.get_state();
        let ram = template
            .ram
            .iter()
            .map(|&(addr, _)| (addr, cpu.read_memory(addr as u32)))
            .collect();
        M6809State {
            pc: native.pc,
            s: native.s,
            u: native.u,
            a: native.a,
            b: native.b,
            dp: native.dp,
            x: native.x,
            y: native.y,
            cc: native.cc,
            ram,
        }
    }
}

/// No documented divergences: the M6809 pair agrees field-for-field.
pub fn policy() -> QuirkPolicy {
    QuirkPolicy::empty()
}
