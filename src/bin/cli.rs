// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! meshmend CLI

use clap::Parser;
use meshmend::cli::Reporter;
use meshmend::pipeline::{ErrorKind, MeshRepairPipeline, RepairConfig, RepairResult};
use meshmend::NativeEngine;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "meshmend")]
#[command(about = "Repair a triangle mesh and report what changed as JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Input mesh file (STL or OBJ)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output mesh file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Narrate each repair step on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Repair configuration (TOML); defaults to ./meshmend.toml when present
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => RepairConfig::from_file(path),
        None => RepairConfig::load(),
    };

    let result = match config {
        Ok(config) => {
            let start = Instant::now();
            let mut pipeline = MeshRepairPipeline::with_config(NativeEngine::new(), config);
            let result = pipeline.repair(&cli.input, &cli.output, cli.verbose);

            if cli.verbose {
                let input = cli.input.display().to_string();
                let _ = Reporter::report_result(&mut std::io::stderr(), &input, &result, start.elapsed());
            }
            result
        }
        Err(e) => RepairResult::failure(ErrorKind::Unclassified, format!("{:#}", e)),
    };

    match result.to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            Reporter::report_error(&format!("Failed to serialize result: {}", e));
            return ExitCode::FAILURE;
        }
    }

    ExitCode::from(result.exit_code())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,meshmend=debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}
