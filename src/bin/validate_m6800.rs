//! Cross-validates M6800 golden test vectors against the vendored mame4all
//! M6800 reference core.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crossval::arch::m6800::{self, M6800Projector};
use crossval::mame::m6800::MameM6800;
use crossval::runner;

#[derive(Parser)]
#[command(name = "validate_m6800")]
struct Args {
    /// Vector files (.json or .json.gz), one or more.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let projector = M6800Projector::new();
    let policy = m6800::policy();
    let mut cpu = MameM6800::new();

    match runner::run_files(&projector, &mut cpu, &policy, &args.files) {
        Ok(report) => {
            report.print_summary();
            if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
