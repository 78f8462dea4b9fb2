//! Vendor-neutral CPU state model and test vector loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::FatalError;

/// One named scalar field of a logical CPU state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scalar {
    pub field: &'static str,
    pub value: u64,
}

/// A named sparse memory overlay: `(address, byte)` cells applied onto a
/// zeroed address space.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub cells: Vec<(u32, u8)>,
}

/// Logical, vendor-neutral view of one architecture's visible state.
///
/// `scalars` returns fields in the fixed comparison order: program counter
/// and primary accumulator first, then secondary registers, then flags.
/// Regions follow scalars; the cycle count is always compared last.
pub trait StateModel: Clone {
    fn scalars(&self) -> Vec<Scalar>;
    fn regions(&self) -> Vec<Region>;

    fn scalar(&self, field: &str) -> Option<u64> {
        self.scalars()
            .iter()
            .find(|s| s.field == field)
            .map(|s| s.value)
    }
}

/// A single golden test vector: full pre-state, expected post-state, and
/// the recorded cycle trace. Only the trace length is asserted by the
/// comparison core.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase<S> {
    pub name: String,
    pub initial: S,
    #[serde(rename = "final")]
    pub final_state: S,
    pub cycles: Vec<(u16, u8, String)>,
}

impl<S: StateModel> TestCase<S> {
    /// Opcode under test, fetched from the initial memory overlay at the
    /// initial program counter. The overlay is authoritative; a missing
    /// opcode byte is a loader defect, not a quirk.
    pub fn opcode(&self) -> Option<u8> {
        let pc = self.initial.scalar("pc")? as u32;
        let ram = self
            .initial
            .regions()
            .into_iter()
            .find(|r| r.name == "ram")?;
        ram.cells
            .iter()
            .find(|&&(addr, _)| addr == pc)
            .map(|&(_, byte)| byte)
    }
}

/// Loads one vector file: a JSON array of test cases, optionally
/// gzip-compressed (`.json.gz`). Any read or parse problem is fatal to the
/// whole run.
pub fn load_cases<S: DeserializeOwned>(path: &Path) -> Result<Vec<TestCase<S>>, FatalError> {
    let file = File::open(path).map_err(|source| FatalError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut text = String::new();
    let read = if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file).read_to_string(&mut text)
    } else {
        let mut file = file;
        file.read_to_string(&mut text)
    };
    read.map_err(|source| FatalError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| FatalError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
