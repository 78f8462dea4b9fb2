//! Reference emulator contract.

/// Synchronous interface every reference-emulator adapter implements.
///
/// State crosses this boundary through [`State`](ReferenceCpu::State), a
/// versioned named-field struct owned by the architecture module. Adapters
/// recompute any derived fields (register-bank pointers, packed stack
/// slots) inside `set_state` from the fields actually set, rather than
/// trusting callers to supply them.
pub trait ReferenceCpu {
    /// Named-field state contract for this architecture.
    type State;

    /// Size in bytes the adapter expects the underlying core's state
    /// structure to have. Checked once per process against
    /// [`native_state_size`](ReferenceCpu::native_state_size). Adapters
    /// that move state field-by-field rather than by raw struct copy
    /// report the contract struct size on both ends, making the gate
    /// vacuous for them.
    const NATIVE_STATE_SIZE: usize;

    /// Establishes a defined baseline: registers, flags, timers, pending
    /// interrupts, and the full address space are cleared of any residue
    /// from a prior test case.
    fn reset(&mut self);

    fn get_state(&mut self) -> Self::State;
    fn set_state(&mut self, state: &Self::State);

    /// Runs until at least `budget` cycles are consumed, stopping at the
    /// first instruction boundary at or past that point. Returns the
    /// cycles actually consumed (requested budget minus whatever remained).
    fn execute(&mut self, budget: u32) -> u32;

    fn read_memory(&mut self, addr: u32) -> u8;
    fn write_memory(&mut self, addr: u32, data: u8);

    /// Size in bytes the live core advertises for its state structure.
    fn native_state_size(&self) -> usize;
}
