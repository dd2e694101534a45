//! Reader/writer for the simple line-oriented triangle-mesh text format.
//!
//! Trimmed from the teacher's `io::obj::{ObjReader, ObjWriter}` idiom (a
//! dedicated reader/writer pair, a `thiserror` error enum, line-oriented
//! `BufRead` parsing tracking line numbers) down to the one geometric
//! concern this format has: vertex positions and triangle indices. No
//! materials, texture coordinates, normals, or groups.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::core::Point3;
use crate::mesh::Mesh;

#[derive(Debug, Error)]
pub enum MeshFormatError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: face has {count} vertices, only triangles are supported")]
    NonTriangularFace { line: usize, count: usize },

    #[error("line {line}: vertex index {index} out of range")]
    VertexIndexOutOfRange { line: usize, index: i64 },
}

/// Parses the leading integer of a face token like `12`, `12/4`, or
/// `12/4/7`; only the leading field is meaningful to this format.
fn parse_face_token(token: &str, line: usize) -> Result<i64, MeshFormatError> {
    let leading = token.split('/').next().unwrap_or(token);
    leading.parse::<i64>().map_err(|_| MeshFormatError::Parse {
        line,
        message: format!("invalid face index token '{token}'"),
    })
}

pub struct MeshReader;

impl MeshReader {
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshFormatError> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    pub fn read<R: BufRead>(reader: R) -> Result<Mesh, MeshFormatError> {
        let mut mesh = Mesh::new();
        let mut vertex_ids = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_num = idx + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(prefix) = tokens.next() else { continue };

            match prefix {
                "v" => {
                    let coords: Vec<f64> = tokens
                        .map(|t| {
                            t.parse::<f64>().map_err(|_| MeshFormatError::Parse {
                                line: line_num,
                                message: format!("invalid vertex coordinate '{t}'"),
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    if coords.len() != 3 {
                        return Err(MeshFormatError::Parse {
                            line: line_num,
                            message: format!("expected 3 coordinates, found {}", coords.len()),
                        });
                    }
                    let id = mesh.add_vertex(Point3::new(coords[0], coords[1], coords[2]));
                    vertex_ids.push(id);
                }
                "f" => {
                    let raw_tokens: Vec<&str> = tokens.collect();
                    if raw_tokens.len() != 3 {
                        return Err(MeshFormatError::NonTriangularFace {
                            line: line_num,
                            count: raw_tokens.len(),
                        });
                    }
                    let mut ids = [0usize; 3];
                    for (i, token) in raw_tokens.iter().enumerate() {
                        let one_based = parse_face_token(token, line_num)?;
                        if one_based < 1 || one_based as usize > vertex_ids.len() {
                            return Err(MeshFormatError::VertexIndexOutOfRange {
                                line: line_num,
                                index: one_based,
                            });
                        }
                        ids[i] = one_based as usize - 1;
                    }
                    mesh.add_triangle(vertex_ids[ids[0]], vertex_ids[ids[1]], vertex_ids[ids[2]])
                        .map_err(|e| MeshFormatError::Parse {
                            line: line_num,
                            message: e.to_string(),
                        })?;
                }
                _ => continue,
            }
        }

        Ok(mesh)
    }
}

pub struct MeshWriter {
    precision: usize,
}

impl Default for MeshWriter {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl MeshWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn write_file<P: AsRef<Path>>(&self, mesh: &Mesh, path: P) -> Result<(), MeshFormatError> {
        let file = File::create(path)?;
        self.write(mesh, BufWriter::new(file))
    }

    pub fn write<W: Write>(&self, mesh: &Mesh, mut writer: W) -> Result<(), MeshFormatError> {
        for p in mesh.vertex_positions() {
            writeln!(
                writer,
                "v {:.prec$} {:.prec$} {:.prec$}",
                p.x,
                p.y,
                p.z,
                prec = self.precision
            )?;
        }
        for tri in mesh.triangles() {
            writeln!(writer, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    #[test]
    fn reads_a_single_triangle() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = MeshReader::read(Cursor::new(text)).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn ignores_slash_separated_extra_face_fields() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n";
        let mesh = MeshReader::read(Cursor::new(text)).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn rejects_non_triangular_faces() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3 4\n";
        let err = MeshReader::read(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, MeshFormatError::NonTriangularFace { count: 4, .. }));
    }

    #[test]
    fn rejects_out_of_range_vertex_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        let err = MeshReader::read(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, MeshFormatError::VertexIndexOutOfRange { index: 9, .. }));
    }

    #[test]
    fn round_trips_vertex_positions_and_triangles() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();

        let mut buf = Vec::new();
        MeshWriter::new().write(&mesh, &mut buf).unwrap();
        let read_back = MeshReader::read(Cursor::new(buf)).unwrap();

        assert_eq!(read_back.vertex_count(), mesh.vertex_count());
        assert_eq!(read_back.face_count(), mesh.face_count());
        for (a, b) in read_back.vertex_positions().iter().zip(mesh.vertex_positions()) {
            assert_relative_eq!(a, &b, epsilon = 1e-6);
        }
    }
}
