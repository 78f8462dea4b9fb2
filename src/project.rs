//! State projection between the logical model and a reference emulator.

use crate::emulator::ReferenceCpu;
use crate::error::{FatalError, ProjectionFault};
use crate::state::StateModel;

/// Bidirectional mapping between one architecture's logical state and a
/// reference emulator's native representation.
pub trait Projector {
    type Cpu: ReferenceCpu;
    type State: StateModel;

    /// One-time structural gate, run once per process before any test
    /// case. A reference core whose state structure no longer matches the
    /// adapter's compile-time expectation would invalidate every
    /// comparison, so a mismatch is fatal to the whole run.
    fn verify_native_layout(&self, cpu: &Self::Cpu) -> Result<(), FatalError> {
        let advertised = cpu.native_state_size();
        let expected = <Self::Cpu as ReferenceCpu>::NATIVE_STATE_SIZE;
        if advertised == expected {
            Ok(())
        } else {
            Err(FatalError::LayoutMismatch {
                expected,
                advertised,
            })
        }
    }

    /// Resets the reference to a clean baseline, applies the memory
    /// overlay first, then projects every scalar field through the
    /// reference's state-mutation primitive. Architecture-specific
    /// pre-compensation for pipeline-stage differences between the two
    /// machines happens here, once the projected state is in place.
    fn load(&self, cpu: &mut Self::Cpu, state: &Self::State) -> Result<(), ProjectionFault>;

    /// Reads back every field the comparator will check: all scalars plus
    /// the overlay cells named by `template` (sparse read-back). No
    /// filtering happens here; suppression is the quirk policy's job.
    fn unload(&self, cpu: &mut Self::Cpu, template: &Self::State) -> Self::State;
}
