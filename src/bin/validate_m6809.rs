//! Cross-validates M6809 golden test vectors against the vendored mame4all
//! M6809 reference core.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crossval::arch::m6809::{self, M6809Projector};
use crossval::mame::m6809::MameM6809;
use crossval::runner;

#[derive(Parser)]
#[command(name = "validate_m6809")]
struct Args {
    /// Vector files (.json or .json.gz), one or more.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let projector = M6809Projector::new();
    let policy = m6809::policy();
    let mut cpu = MameM6809::new();

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
