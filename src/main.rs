//! Mesh simplification CLI.
//!
//! Three subcommands: `simplify` (single file), `batch` (directory sweep
//! at fixed ratios), and `eval` (symmetric surface error over a batch
//! log).

use std::panic;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mesh_simplify::driver;

#[derive(Parser)]
#[command(name = "mesh-simplify")]
#[command(about = "Quadric-error triangle mesh simplification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simplify a single mesh file.
    Simplify {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long = "output-dir")]
        output_dir: PathBuf,
        #[arg(long)]
        target: Option<usize>,
        #[arg(long)]
        ratio: Option<f64>,
    },
    /// Simplify every mesh file in a directory at a fixed set of ratios.
    Batch {
        #[arg(long = "input-dir")]
        input_dir: PathBuf,
        #[arg(long = "output-dir")]
        output_dir: PathBuf,
        #[arg(long, value_delimiter = ',', default_value = "0.2,0.5,0.8")]
        ratios: Vec<f64>,
    },
    /// Compute symmetric surface error for every row of a batch log.
    Eval {
        #[arg(long)]
        log: PathBuf,
        #[arg(long = "input-dir")]
        input_dir: PathBuf,
        #[arg(long = "output-dir")]
        output_dir: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
}

fn main() -> anyhow::Result<()> {
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("mesh-simplify fatal error:");
        eprintln!("{}", panic_info);
        if let Some(location) = panic_info.location() {
            eprintln!("Location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("mesh-simplify v{}", mesh_simplify::VERSION);

    let cli = Cli::parse();
    match cli.command {
        Commands::Simplify { input, output_dir, target, ratio } => {
            let summary = driver::run_simplify(&input, &output_dir, target, ratio)?;
            log::info!(
                "{} -> {}: {} -> {} vertices, {} -> {} faces, {:.3}s",
                summary.input.display(),
                summary.output.display(),
                summary.original_vertex_count,
                summary.final_vertex_count,
                summary.original_face_count,
                summary.final_face_count,
                summary.elapsed_secs,
            );
        }
        Commands::Batch { input_dir, output_dir, ratios } => {
            let log_path = driver::run_batch(&input_dir, &output_dir, &ratios)?;
            log::info!("batch log written to {}", log_path.display());
        }
        Commands::Eval { log, input_dir, output_dir, samples } => {
            let log_path = driver::run_eval(&log, &input_dir, &output_dir, samples)?;
            log::info!("evaluation appended to {}", log_path.display());
        }
    }

    Ok(())
}
