use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    uxguide_cli::main_entry()
}
