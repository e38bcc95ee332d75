//! Example: Format an ABC file from disk
//!
//! Run with: cargo run -p reel_formatter --example format_file -- tune.abc

use std::env;
use std::fs;
use std::process::ExitCode;

use reel_formatter::{format_source, FormatOptions};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.abc> [--verbatim]", args[0]);
        return ExitCode::from(1);
    }

    let source = match fs::read_to_string(&args[1]) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading '{}': {}", args[1], e);
            return ExitCode::from(1);
        }
    };

    let options = if args.iter().any(|a| a == "--verbatim") {
        FormatOptions::passthrough()
    } else {
        FormatOptions::default()
    };

    print!("{}", format_source(&source, &options));
    ExitCode::SUCCESS
}
