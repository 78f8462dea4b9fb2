//! Run aggregation and terminal reporting.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// One recorded failure: test name plus a one-line diagnostic.
#[derive(Clone, Debug)]
pub struct FailureRecord {
    pub name: String,
    pub detail: String,
}

impl FailureRecord {
    /// Opcode key for the failure tally. By convention the first two hex
    /// characters of a test name encode the opcode under test.
    pub fn opcode_key(&self) -> String {
        self.name.chars().take(2).collect()
    }
}

/// Outcome counts for one vector file.
#[derive(Clone, Debug, Default)]
pub struct FileSummary {
    pub path: PathBuf,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Whole-run aggregate: global counts, per-file counts, every failure.
#[derive(Debug, Default)]
pub struct Report {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub files: Vec<FileSummary>,
    pub failures: Vec<FailureRecord>,
}

impl Report {
    pub fn record_file(&mut self, file: FileSummary) {
        self.total += file.passed + file.failed + file.skipped;
        self.passed += file.passed;
        self.failed += file.failed;
        self.skipped += file.skipped;
        self.files.push(file);
    }

    pub fn record_failure(&mut self, name: String, detail: String) {
        self.failures.push(FailureRecord { name, detail });
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failure counts by opcode, with one representative diagnostic each
    /// (the first failure recorded for that opcode).
    pub fn opcode_tally(&self) -> BTreeMap<String, (usize, String)> {
        let mut tally: BTreeMap<String, (usize, String)> = BTreeMap::new();
        for f in &self.failures {
            let entry = tally
                .entry(f.opcode_key())
                .or_insert_with(|| (0, f.detail.clone()));
            entry.0 += 1;
        }
        tally
    }

    /// Renders the final summary block: aggregate counts, the full failure
    /// enumeration, and the opcode-keyed tally.
    pub fn print_summary(&self) {
        println!();
        println!("=== Summary ===");
        println!(
            "Total: {} tests, {} passed, {} failed, {} skipped",
            self.total, self.passed, self.failed, self.skipped
        );

        if !self.failures.is_empty() {
            println!();
            println!("All {} failures:", self.failures.len());
            for f in &self.failures {
                println!("  FAIL {}: {}", f.name, f.detail);
            }

            let tally = self.opcode_tally();
            println!();
            println!("Failures by opcode ({} unique):", tally.len());
            for (op, (count, detail)) in &tally {
                println!("  0x{op}: {count} failures  [{detail}]");
            }
        }
    }
}
