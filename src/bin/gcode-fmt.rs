use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    gcode_block::cli::run()
}
