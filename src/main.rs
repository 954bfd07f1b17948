// minic: run a C-subset program and print its output

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use minic::runner;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("minic");

    if args.len() < 2 {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.c>", program_name);
        return ExitCode::FAILURE;
    }

    let source_file = &args[1];

    if !Path::new(source_file).exists() {
        eprintln!("Error: File '{}' not found", source_file);
        eprintln!("Usage: {} <file.c>", program_name);
        return ExitCode::FAILURE;
    }

    let source = match fs::read_to_string(source_file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: Failed to read '{}': {}", source_file, err);
            return ExitCode::FAILURE;
        }
    };

    match runner::run(&source) {
        Ok(result) => {
            print!("{}", result.output);
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }
            eprintln!("Finished in {:.3}s", result.duration);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
