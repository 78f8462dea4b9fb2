//! Shared test doubles: a scripted stand-in for a reference core plus
//! state builders.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use crossval::arch::mcs48::{Mcs48Native, Mcs48State};
use crossval::emulator::ReferenceCpu;

/// One scripted instruction: the post-execution state the double reports,
/// the cycles it claims to consume, and any memory writes it performs.
pub struct ScriptedStep<S> {
    pub state: S,
    pub cycles: u32,
    pub writes: Vec<(u32, u8)>,
}

/// In-process stand-in for a reference core. It emulates nothing: each
/// `execute` call pops the next scripted step and applies it verbatim.
pub struct ScriptedCpu<S> {
    pub state: S,
    pub memory: HashMap<u32, u8>,
    pub steps: VecDeque<ScriptedStep<S>>,
    pub advertised_size: usize,
    pub resets: usize,
    pub budgets: Vec<u32>,
}

impl<S: Clone + Default> ScriptedCpu<S> {
    pub fn new() -> Self {
        Self {
            state: S::default(),
            memory: HashMap::new(),
            steps: VecDeque::new(),
            advertised_size: size_of::<S>(),
            resets: 0,
            budgets: Vec::new(),
        }
    }

    pub fn push_step(&mut self, state: S, cycles: u32) {
        self.steps.push_back(ScriptedStep {
            state,
            cycles,
            writes: Vec::new(),
        });
    }
}

impl<S: Clone + Default> Default for ScriptedCpu<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Default> ReferenceCpu for ScriptedCpu<S> {
    type State = S;

    const NATIVE_STATE_SIZE: usize = size_of::<S>();

    fn reset(&mut self) {
        self.resets += 1;
        self.state = S::default();
        self.memory.clear();
    }

    fn get_state(&mut self) -> S {
        self.state.clone()
    }

    fn set_state(&mut self, state: &S) {
        self.state = state.clone();
    }

    fn execute(&mut self, budget: u32) -> u32 {
        self.budgets.push(budget);
        let step = self
            .steps
            .pop_front()
            .expect("scripted step available for execute");
        self.state = step.state;
        for (addr, byte) in step.writes {
            self.memory.insert(addr, byte);
        }
        step.cycles
    }

    fn read_memory(&mut self, addr: u32) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }

    fn write_memory(&mut self, addr: u32, data: u8) {
        self.memory.insert(addr, data);
    }

    fn native_state_size(&self) -> usize {
        self.advertised_size
    }
}

/// An all-zero MCS-48 logical state at the given program counter.
pub fn mcs48_state(pc: u16) -> Mcs48State {
    Mcs48State {
        pc,
        a: 0,
        psw: 0,
        f1: false,
        t: 0,
        dbbb: 0,
        p1: 0,
        p2: 0,
        a11: false,
        a11_pending: false,
        timer_enabled: false,
        counter_enabled: false,
        timer_overflow: false,
        int_enabled: false,
        tcnti_enabled: false,
        in_interrupt: false,
        ram: Vec::new(),
        internal_ram: Vec::new(),
    }
}

/// The native image of a logical MCS-48 state, as a faithful projector
/// would produce it.
pub fn mcs48_native_of(state: &Mcs48State) -> Mcs48Native {
    let mut iram = [0u8; 128];
    for &(offset, byte) in &state.internal_ram {
        iram[offset as usize] = byte;
    }
    Mcs48Native {
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
        iram,
    }
}
