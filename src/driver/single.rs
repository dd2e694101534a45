//! Single-file simplification mode.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;

use crate::io::{MeshReader, MeshWriter};

use super::{resolve_target, DriverError};

/// Summary of one `simplify` invocation, logged by the caller.
#[derive(Debug, Clone)]
pub struct SingleRunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub original_vertex_count: usize,
    pub original_face_count: usize,
    pub final_vertex_count: usize,
    pub final_face_count: usize,
    pub elapsed_secs: f64,
}

/// Reads `input`, simplifies it to either `target` vertices or
/// `round(vertex_count * ratio)`, and writes `<stem>_simplified.<ext>` into
/// `output_dir`.
pub fn run_simplify(
    input: &Path,
    output_dir: &Path,
    target: Option<usize>,
    ratio: Option<f64>,
) -> Result<SingleRunSummary, DriverError> {
    let start = Instant::now();
    let mut mesh = MeshReader::read_file(input)?;
    let original_vertex_count = mesh.vertex_count();
    let original_face_count = mesh.face_count();

    let target_count = resolve_target(original_vertex_count, target, ratio)?;

    info!(
        "simplifying {} ({original_vertex_count} vertices, {original_face_count} faces) to target {target_count}",
        input.display()
    );

    mesh.simplify(target_count);

    std::fs::create_dir_all(output_dir)?;
    let output = output_path(input, output_dir);
    MeshWriter::new().write_file(&mesh, &output)?;

    let elapsed_secs = start.elapsed().as_secs_f64();
    info!(
        "wrote {} ({} vertices, {} faces) in {:.3}s",
        output.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        elapsed_secs
    );

    Ok(SingleRunSummary {
        input: input.to_path_buf(),
        output,
        original_vertex_count,
        original_face_count,
        final_vertex_count: mesh.vertex_count(),
        final_face_count: mesh.face_count(),
        elapsed_secs,
    })
}

fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
    let mut name = format!("{stem}_simplified");
    if !ext.is_empty() {
        name.push('.');
        name.push_str(&ext);
    }
    output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_suffix_before_extension() {
        let out = output_path(Path::new("/meshes/bunny.mesh"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/bunny_simplified.mesh"));
    }
}
