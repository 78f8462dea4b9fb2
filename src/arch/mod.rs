//! Per-architecture bindings: logical state shape, native state contract,
//! projector, and the documented quirk table.

pub mod m6800;
pub mod m6809;
pub mod mcs48;
