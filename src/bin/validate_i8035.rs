//! Cross-validates MCS-48 (I8035) golden test vectors against the vendored
//! mame4all I8039 reference core.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crossval::arch::mcs48::{self, Mcs48Projector};
use crossval::mame::mcs48::MameMcs48;
use crossval::runner;

#[derive(Parser)]
#[command(name = "validate_i8035")]
struct Args {
    /// Vector files (.json or .json.gz), one or more.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let projector = Mcs48Projector::new();
    let policy = mcs48::policy();
    let mut cpu = MameMcs48::new();

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
