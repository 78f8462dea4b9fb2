//! Adapter for the vendored mame4all I8039 core.

use std::ffi::{c_int, c_uint, c_void};
use std::marker::PhantomData;
use std::ptr;

use crate::arch::mcs48::{Mcs48Native, XDATA_BASE};
use crate::emulator::ReferenceCpu;

// Interrupt line constants from the vendored core.
const I8039_IGNORE_INT: c_int = 0;
const I8039_EXT_INT: c_int = 1;
const CLEAR_LINE: c_int = 0;

// Port I/O window layout: 0x000-0x0FF is the external (MOVX) data space,
// the rest are port latches.
const PORT_P1: usize = 0x101;
const PORT_P2: usize = 0x102;
const PORT_BUS: usize = 0x120;

/// Mirror of the vendored core's context structure. `get_context` and
/// `set_context` transfer it by whole-struct copy, which is exactly what
/// the one-time layout gate protects: if the vendored source drifts, the
/// advertised size stops matching `size_of` of this mirror.
#[repr(C)]
#[derive(Clone, Copy)]
struct I8039Context {
    prepc: u32,
    pc: u32,
    a: u8,
    sp: u8,
    psw: u8,
    ram: [u8; 128],
    bus: u8,
    f1: u8,
    pending_irq: c_int,
    irq_executing: c_int,
    master_clock: c_int,
    reg_ptr: c_int,
    t_flag: u8,
    timer: u8,
    timer_on: u8,
    count_on: u8,
    xirq_en: u8,
    tirq_en: u8,
    a11: u16,
    a11ff: u16,
    irq_state: c_int,
    irq_callback: Option<unsafe extern "C" fn(c_int) -> c_int>,
}

#[link(name = "i8039")]
unsafe extern "C" {
    fn i8039_reset(param: *mut c_void);
    fn i8039_get_context(ctx: *mut c_void) -> c_uint;
    fn i8039_set_context(ctx: *mut c_void);
    fn i8039_execute(cycles: c_int) -> c_int;
}

// Flat program memory and the port I/O window the vendored core's memory
// macros resolve against. The names are part of the C ABI.
#[unsafe(no_mangle)]
#[allow(non_upper_case_globals)]
static mut i8039_program_memory: [u8; 0x10000] = [0; 0x10000];
#[unsafe(no_mangle)]
#[allow(non_upper_case_globals)]
static mut i8039_port_io: [u8; 0x200] = [0xFF; 0x200];

// Safety: callers must not let two returned borrows overlap. The adapter
// is !Send, one instance exists per process, and every access below is a
// short straight-line section.
unsafe fn program_memory() -> &'static mut [u8; 0x10000] {
    unsafe { &mut *(&raw mut i8039_program_memory) }
}

unsafe fn port_io() -> &'static mut [u8; 0x200] {
    unsafe { &mut *(&raw mut i8039_port_io) }
}

/// The vendored core keeps its register file in process globals, so this
/// adapter is a process-wide singleton and deliberately `!Send`.
pub struct MameMcs48 {
    _single_thread: PhantomData<*const ()>,
}

impl MameMcs48 {
    pub fn new() -> Self {
        Self {
            _single_thread: PhantomData,
        }
    }

    fn context(&self) -> I8039Context {
        let mut ctx = unsafe { std::mem::zeroed::<I8039Context>() };
        unsafe { i8039_get_context(&mut ctx as *mut _ as *mut c_void) };
        ctx
    }

    fn apply(&self, ctx: &mut I8039Context) {
        unsafe { i8039_set_context(ctx as *mut _ as *mut c_void) };
    }
}

impl Default for MameMcs48 {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceCpu for MameMcs48 {
    type State = Mcs48Native;

    const NATIVE_STATE_SIZE: usize = size_of::<I8039Context>();

    fn reset(&mut self) {
        unsafe {
            program_memory().fill(0);
            port_io().fill(0xFF);
        }
        unsafe { i8039_reset(ptr::null_mut()) };

        // The vendored reset leaves the timer running (an arcade-driver
        // convenience) and an IRQ callback installed; the baseline here is
        // everything quiescent.
        let mut ctx = self.context();
        ctx.timer_on = 0;
        ctx.pending_irq = I8039_IGNORE_INT;
        ctx.irq_state = CLEAR_LINE;
        ctx.master_clock = 0;
        ctx.prepc = 0;
        ctx.irq_callback = None;
        self.apply(&mut ctx);
    }

    fn get_state(&mut self) -> Mcs48Native {
        let ctx = self.context();
        let ports = unsafe { port_io() };
        Mcs48Native {
            pc: (ctx.pc & 0xFFFF) as u16,
            a: ctx.a,
            psw: ctx.psw,
            f1: ctx.f1 != 0,
            timer: ctx.timer,
            bus: ports[PORT_BUS],
            p1: ports[PORT_P1],
            p2: ports[PORT_P2],
            a11: ctx.a11 != 0,
            a11_pending: ctx.a11ff != 0,
            timer_run: ctx.timer_on != 0,
            counter_run: ctx.count_on != 0,
            timer_overflow: ctx.t_flag != 0,
            ext_irq_enabled: ctx.xirq_en != 0,
            timer_irq_enabled: ctx.tirq_en != 0,
            in_interrupt: ctx.irq_executing != I8039_IGNORE_INT,
            iram: ctx.ram,
        }
    }

    fn set_state(&mut self, state: &Mcs48Native) {
        let mut ctx = self.context();
        ctx.pc = state.pc as u32;
        ctx.a = state.a;
        ctx.psw = state.psw;
        ctx.f1 = state.f1 as u8;
        ctx.timer = state.timer;
        ctx.bus = state.bus;
        ctx.ram = state.iram;
        // A11 lives at bit 11 of the effective address in the vendored
        // core, not as a boolean.
        ctx.a11 = if state.a11 { 0x800 } else { 0 };
        ctx.a11ff = if state.a11_pending { 0x800 } else { 0 };
        ctx.timer_on = state.timer_run as u8;
        ctx.count_on = state.counter_run as u8;
        ctx.t_flag = state.timer_overflow as u8;
        ctx.xirq_en = state.ext_irq_enabled as u8;
        ctx.tirq_en = state.timer_irq_enabled as u8;
        ctx.irq_executing = if state.in_interrupt {
            I8039_EXT_INT
        } else {
            I8039_IGNORE_INT
        };
        // Derived, never trusted from callers: the register-bank pointer
        // follows PSW.BS.
        ctx.reg_ptr = if state.psw & 0x10 != 0 { 24 } else { 0 };
        self.apply(&mut ctx);

        let ports = unsafe { port_io() };
        ports[PORT_P1] = state.p1;
        ports[PORT_P2] = state.p2;
        ports[PORT_BUS] = state.bus;
    }

    fn execute(&mut self, budget: u32) -> u32 {
        unsafe { i8039_execute(budget as c_int) as u32 }
    }

    fn read_memory(&mut self, addr: u32) -> u8 {
        if addr < XDATA_BASE {
            unsafe { program_memory()[addr as usize & 0xFFFF] }
        } else {
            unsafe { port_io()[(addr - XDATA_BASE) as usize & 0xFF] }
        }
    }

    fn write_memory(&mut self, addr: u32, data: u8) {
        if addr < XDATA_BASE {
            unsafe { program_memory()[addr as usize & 0xFFFF] = data };
        } else {
            unsafe { port_io()[(addr - XDATA_BASE) as usize & 0xFF] = data };
        }
    }

    fn native_state_size(&self) -> usize {
        unsafe { i8039_get_context(ptr::null_mut()) as usize }
    }
}
