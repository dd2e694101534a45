//! Batch simplification mode: every mesh file in a directory, at a fixed
//! set of target ratios, in parallel across (file, ratio) pairs.
//!
//! Grounded in the teacher's `io::batch::BatchConverter`, which already
//! parallelizes per-file conversion with `rayon::prelude::*`; generalized
//! here from one-file-per-job to one-(file, ratio)-pair-per-job.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::warn;
use rayon::prelude::*;

use super::DriverError;
use crate::io::{MeshReader, MeshWriter};

const CSV_HEADER: &str = "input_file,target_ratio,time_taken_s,original_vertex_count,output_path,error";

struct BatchRow {
    input: PathBuf,
    ratio: f64,
    elapsed_secs: f64,
    original_vertex_count: usize,
    output: Option<PathBuf>,
    error: Option<String>,
}

impl BatchRow {
    fn to_csv_line(&self) -> String {
        let output = self
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let error = self.error.clone().unwrap_or_default();
        format!(
            "{},{},{:.6},{},{},{}",
            self.input.display(),
            self.ratio,
            self.elapsed_secs,
            self.original_vertex_count,
            output,
            error
        )
    }
}

fn mesh_files(input_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn simplify_one(input: &Path, output_dir: &Path, ratio: f64) -> BatchRow {
    let start = Instant::now();
    let attempt = (|| -> Result<(usize, PathBuf), DriverError> {
        let mut mesh = MeshReader::read_file(input)?;
        let original_vertex_count = mesh.vertex_count();
        let target = ((original_vertex_count as f64) * ratio).round() as usize;
        mesh.simplify(target);

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let ext = input.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
        let suffix = (ratio * 100.0).round() as i64;
        let name = if ext.is_empty() {
            format!("{stem}_r{suffix}")
        } else {
            format!("{stem}_r{suffix}.{ext}")
        };
        let output = output_dir.join(&name);
        MeshWriter::new().write_file(&mesh, &output)?;
        Ok((original_vertex_count, PathBuf::from(name)))
    })();

    let input_name = input
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.to_path_buf());

    let elapsed_secs = start.elapsed().as_secs_f64();
    match attempt {
        Ok((original_vertex_count, output)) => BatchRow {
            input: input_name,
            ratio,
            elapsed_secs,
            original_vertex_count,
            output: Some(output),
            error: None,
        },
        Err(e) => {
            warn!("batch row failed for {} at ratio {ratio}: {e}", input.display());
            BatchRow {
                input: input_name,
                ratio,
                elapsed_secs,
                original_vertex_count: 0,
                output: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Simplifies every file in `input_dir` at each of `ratios`, in parallel
/// across (file, ratio) pairs, and appends one row per pair to
/// `output_dir/simplification_log.csv`. Per-row failures are logged and
/// recorded in the CSV rather than aborting the batch.
pub fn run_batch(input_dir: &Path, output_dir: &Path, ratios: &[f64]) -> Result<PathBuf, DriverError> {
    let files = mesh_files(input_dir)?;
    if files.is_empty() {
        return Err(DriverError::EmptyBatch(input_dir.display().to_string()));
    }

    fs::create_dir_all(output_dir)?;

    let jobs: Vec<(PathBuf, f64)> = files
        .iter()
        .flat_map(|f| ratios.iter().map(move |r| (f.clone(), *r)))
        .collect();

    let rows: Vec<BatchRow> = jobs
        .par_iter()
        .map(|(input, ratio)| simplify_one(input, output_dir, *ratio))
        .collect();

    let log_path = output_dir.join("simplification_log.csv");
    let mut file = std::fs::File::create(&log_path)?;
    writeln!(file, "{CSV_HEADER}")?;
    for row in &rows {
        writeln!(file, "{}", row.to_csv_line())?;
    }

    Ok(log_path)
}
