//! Runs the whole pipeline: assemble, write the frame stream and log, load the
//! stream back, execute it and export a memory window.
//!
//! # Usage
//! ```text
//! framevm [source] [OPTIONS]
//! ```
//!
//! # Arguments
//! - `source`: assembly source file (defaults to `input.txt`)
//!
//! # Options
//! - `-o, --output <file>`: frame stream path (defaults to `binary.bin`)
//! - `-l, --log <file>`: assembly log path (defaults to `log.json`)
//! - `-r, --result <file>`: memory export path (defaults to `result.json`)
//! - `--range <start> <length>`: exported memory window (defaults to `0 1024`)
//! - `--raw`: write the frame stream as raw bytes instead of hex text
//! - `-q, --quiet`: only log warnings and errors

use framevm::utils::log::{self, Level};
use framevm::virtual_machine::snapshot::to_json_pretty;
use framevm::{MEMORY_SIZE, Program, VM, assemble_source, error, info, warn};
use std::env;
use std::fs;
use std::process;

struct Options {
    source: String,
    output: String,
    log: String,
    result: String,
    start: usize,
    length: usize,
    raw: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: "input.txt".to_string(),
            output: "binary.bin".to_string(),
            log: "log.json".to_string(),
            result: "result.json".to_string(),
            start: 0,
            length: MEMORY_SIZE,
            raw: false,
        }
    }
}

fn main() {
    log::init_from_env();
    let args: Vec<String> = env::args().collect();
    let opts = parse_args(&args);

    let source = fs::read_to_string(&opts.source).unwrap_or_else(|e| {
        error!("Failed to read {}: {e}", opts.source);
        process::exit(1);
    });

    // Stage 1: assemble
    let assembly = assemble_source(&source).unwrap_or_else(|e| {
        error!("Assembly failed: {e}");
        process::exit(1);
    });

    let stream = if opts.raw {
        use framevm::types::encoding::Encode;
        assembly.program.to_bytes()
    } else {
        assembly.program.to_hex_text().into_bytes()
    };
    write_or_exit(&opts.output, &stream);

    let log_json = to_json_pretty(&assembly.log()).unwrap_or_else(|e| {
        error!("Failed to serialize assembly log: {e}");
        process::exit(1);
    });
    write_or_exit(&opts.log, log_json.as_bytes());

    info!(
        "Assembled {} -> {} ({} instructions)",
        opts.source,
        opts.output,
        assembly.program.len()
    );

    // Stage 2: load the stream back and execute it
    let loaded = fs::read(&opts.output).unwrap_or_else(|e| {
        error!("Failed to read {}: {e}", opts.output);
        process::exit(1);
    });
    let program = if opts.raw {
        Program::from_bytes(&loaded)
    } else {
        Program::from_hex_text(&String::from_utf8_lossy(&loaded))
    }
    .unwrap_or_else(|e| {
        error!("Failed to load {}: {e}", opts.output);
        process::exit(1);
    });

    let mut vm = VM::new();
    if let Err(e) = vm.run_program(&program) {
        error!("Execution failed after {} instructions: {e}", vm.executed());
        process::exit(1);
    }
    if vm.skipped() > 0 {
        warn!("{} instruction(s) skipped for lack of stack values", vm.skipped());
    }

    // Stage 3: export
    let snapshot = vm.export(opts.start, opts.length).unwrap_or_else(|e| {
        error!("Export failed: {e}");
        process::exit(1);
    });
    if snapshot.is_empty() {
        warn!("Nothing to export: window length is 0");
        return;
    }
    let result_json = snapshot.to_json().unwrap_or_else(|e| {
        error!("Failed to serialize memory snapshot: {e}");
        process::exit(1);
    });
    write_or_exit(&opts.result, result_json.as_bytes());
    info!(
        "Exported memory[{}..{}] -> {} ({} written cells)",
        snapshot.start_address,
        snapshot.start_address + snapshot.length,
        opts.result,
        snapshot.written().count()
    );
}

fn parse_args(args: &[String]) -> Options {
    let program = args.first().map(String::as_str).unwrap_or("framevm");
    let mut opts = Options::default();
    let mut source_set = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage(program);
                process::exit(0);
            }
            k @ ("-o" | "--output" | "-l" | "--log" | "-r" | "--result") => {
                let value = next_value(args, &mut i, k);
                match k {
                    "-o" | "--output" => opts.output = value,
                    "-l" | "--log" => opts.log = value,
                    _ => opts.result = value,
                }
            }
            "--range" => {
                opts.start = parse_number(&next_value(args, &mut i, "--range"));
                opts.length = parse_number(&next_value(args, &mut i, "--range"));
            }
            "--raw" => opts.raw = true,
            "-q" | "--quiet" => log::set_min_level(Level::Warn),
            other if other.starts_with('-') || source_set => {
                error!("Unexpected argument: {other}\n");
                print_usage(program);
                process::exit(1);
            }
            other => {
                opts.source = other.to_string();
                source_set = true;
            }
        }
        i += 1;
    }
    opts
}

/// Advances past a flag and returns its value.
fn next_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            error!("{flag} requires an argument");
            process::exit(1);
        }
    }
}

fn parse_number(raw: &str) -> usize {
    raw.parse().unwrap_or_else(|_| {
        error!("Invalid number: '{raw}'");
        process::exit(1);
    })
}

fn write_or_exit(path: &str, data: &[u8]) {
    if let Err(e) = fs::write(path, data) {
        error!("Failed to write {path}: {e}");
        process::exit(1);
    }
}

const USAGE: &str = "\
Frame VM

USAGE:
    {program} [source] [OPTIONS]

ARGS:
    [source]    Assembly source file (defaults to input.txt)

OPTIONS:
    -o, --output <file>         Frame stream path (defaults to binary.bin)
    -l, --log <file>            Assembly log path (defaults to log.json)
    -r, --result <file>         Memory export path (defaults to result.json)
        --range <start> <len>   Exported memory window (defaults to 0 1024)
        --raw                   Write raw 5-byte frames instead of hex text
    -q, --quiet                 Only log warnings and errors
    -h, --help                  Print this help message

ENVIRONMENT:
    FRAMEVM_LOG    Minimum log level: debug, info, warn or error

EXAMPLES:
    # Assemble and run input.txt with the default file names
    {program}

    # Export only the first 16 cells
    {program} program.asm --range 0 16
";

fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
