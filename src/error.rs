//! Error taxonomy: run-fatal conditions versus recoverable per-case faults.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop the entire run with a non-zero exit and no summary.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed vector file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The reference core's advertised state-structure size does not match
    /// the adapter's compile-time expectation. A layout drift invalidates
    /// every subsequent comparison, so the whole run aborts before the
    /// first test case.
    #[error("native state size mismatch: expected {expected} bytes, reference reports {advertised}")]
    LayoutMismatch { expected: usize, advertised: usize },
}

/// Per-case faults raised while projecting a vector into the reference
/// core. Recorded as a failed test case; the run continues with the next.
#[derive(Debug, Error)]
pub enum ProjectionFault {
    #[error("{field} value {value:#x} exceeds the architectural limit {limit:#x}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        limit: u64,
    },

    /// The initial memory overlay carries no byte at the initial program
    /// counter, so the opcode under test cannot be determined.
    #[error("no opcode byte in the initial ram overlay at pc={pc:#05x}")]
    MissingOpcode { pc: u32 },
}
