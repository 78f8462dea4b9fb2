//! FFI adapters wrapping the vendored mame4all reference cores.
//!
//! The cores are plain C translation units built out of tree (see
//! DESIGN.md for the build recipe) and linked as static libraries; each
//! adapter here owns the process-global memory arrays the core's memory
//! macros resolve against and speaks the architecture's named-field state
//! contract. Exactly one adapter instance may exist per process, and the
//! whole run is single-threaded, which is what makes the global arrays
//! sound to touch.

pub mod m6800;
pub mod m6809;
pub mod mcs48;
