//! Assembly to frame stream compiler CLI.
//!
//! Reads an assembly source file and writes the 5-byte frame stream plus the
//! JSON assembly log. Nothing is executed.
//!
//! # Usage
//! ```text
//! assembler <input> [OPTIONS]
//! ```
//!
//! # Options
//! - `-o, --output <file>`: Output file path (defaults to `<input>.bin`)
//! - `-l, --log <file>`: Assembly log path (defaults to `<input>.json`)
//! - `--raw`: Write raw bytes instead of hex text
//!
//! # Examples
//! ```text
//! assembler program.asm
//! assembler program.asm -o output.bin --raw
//! ```

use framevm::types::encoding::Encode;
use framevm::utils::log;
use framevm::virtual_machine::snapshot::to_json_pretty;
use framevm::{assemble_source, error, info};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    log::init_from_env();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut log_path: Option<String> = None;
    let mut raw = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            k @ ("--output" | "-o" | "--log" | "-l") => {
                i += 1;
                if i >= args.len() {
                    error!("{k} requires an argument");
                    process::exit(1);
                }
                if matches!(k, "--output" | "-o") {
                    output_path = Some(args[i].clone());
                } else {
                    log_path = Some(args[i].clone());
                }
                i += 1;
            }
            "--raw" => {
                raw = true;
                i += 1;
            }
            other => {
                error!("Unexpected argument: {other}\n");
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let output_path =
        output_path.unwrap_or_else(|| Path::new(input_path).with_extension("bin").display().to_string());
    let log_path =
        log_path.unwrap_or_else(|| Path::new(input_path).with_extension("json").display().to_string());

    let source = fs::read_to_string(input_path).unwrap_or_else(|e| {
        error!("Failed to read {input_path}: {e}");
        process::exit(1);
    });

    let assembly = assemble_source(&source).unwrap_or_else(|e| {
        error!("Assembly failed: {e}");
        process::exit(1);
    });

    let stream = if raw {
        assembly.program.to_bytes()
    } else {
        assembly.program.to_hex_text().into_bytes()
    };
    if let Err(e) = fs::write(&output_path, &stream) {
        error!("Failed to write {output_path}: {e}");
        process::exit(1);
    }

    let log_json = to_json_pretty(&assembly.log()).unwrap_or_else(|e| {
        error!("Failed to serialize assembly log: {e}");
        process::exit(1);
    });
    if let Err(e) = fs::write(&log_path, log_json) {
        error!("Failed to write {log_path}: {e}");
        process::exit(1);
    }

    info!(
        "Assembled {input_path} -> {output_path} ({} frames, {} bytes)",
        assembly.program.len(),
        stream.len()
    );
}

fn print_usage(program: &str) {
    eprintln!(
        "\
Frame assembler

USAGE:
    {program} <input> [OPTIONS]

OPTIONS:
    -o, --output <file>    Output file path (defaults to <input>.bin)
    -l, --log <file>       Assembly log path (defaults to <input>.json)
        --raw              Write raw 5-byte frames instead of hex text
    -h, --help             Print this help message
"
    );
}
