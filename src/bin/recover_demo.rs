//! Demo driver: load inputs per a JSON config, run the reconstruction, save
//! the canvases and the diagnostics report.

use blocksense::config::{load_config, load_measurements, load_projection_matrix};
use blocksense::diagnostics::BlockStatus;
use blocksense::image::io::{save_binary, save_grayscale_f64, write_json_file};
use blocksense::Reconstructor;
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let config_path: PathBuf = args
        .next()
        .ok_or("Usage: recover_demo <config.json>")?
        .into();

    let config = load_config(&config_path)?;
    let matrix = load_projection_matrix(&config.matrix_path)?;
    let measurements = load_measurements(&config.measurements_path)?;

    let reconstructor =
        Reconstructor::new(matrix, config.params.clone()).map_err(|e| e.to_string())?;
    let report = reconstructor
        .reconstruct(&measurements)
        .map_err(|e| e.to_string())?;

    println!(
        "{}×{} blocks reconstructed in {:.1} ms",
        report.blocks_per_side, report.blocks_per_side, report.timing.total_ms
    );
    if report.low_confidence > 0 {
        println!("low-confidence blocks: {}", report.low_confidence);
    }
    if report.unresolved > 0 {
        println!("unresolved blocks: {}", report.unresolved);
        for block in &report.blocks {
            if block.status == BlockStatus::Unresolved {
                println!("  block ({}, {})", block.row, block.col);
            }
        }
    }

    if let Some(path) = &config.output.raw_out {
        save_grayscale_f64(path, &report.canvas)?;
        println!("Raw canvas written to {}", path.display());
    }
    if let Some(path) = &config.output.binary_out {
        match &report.binary {
            Some(binary) => {
                save_binary(path, binary)?;
                println!("Binary canvas written to {}", path.display());
            }
            None => eprintln!("binary_out set but post-processing is disabled"),
        }
    }
    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}
