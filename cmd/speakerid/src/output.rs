//! Output utilities.

use std::{fs::File, io::Write};

use serde::Serialize;

use crate::Cli;

/// Writes `value` as YAML (default) or JSON, to the `-o` file or stdout.
pub fn output_result<T: Serialize>(value: &T, cli: &Cli) -> anyhow::Result<()> {
    let output = if cli.json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_yaml::to_string(value)?
    };

    match &cli.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(output.as_bytes())?;
        }
        None => {
            println!("{}", output.trim_end());
        }
    }
    Ok(())
}

/// Prints a success line to stderr so stdout stays machine-readable.
pub fn print_success(message: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {message}");
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, message: &str) {
    if cli.verbose {
        eprintln!("[verbose] {message}");
    }
}
