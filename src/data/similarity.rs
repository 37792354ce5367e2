use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Filename prefix for similarity matrix chunk artifacts
const CHUNK_PREFIX: &str = "similarity_part_";

/// Dense N×N pairwise similarity matrix
///
/// Assembled once at startup by stacking row-partitioned chunks; chunk
/// boundaries are invisible to callers. Row and column `i` both refer to
/// the catalog entry at position `i`.
#[derive(Debug)]
pub struct SimilarityIndex {
    /// Row-major scores, `size * size` entries
    scores: Vec<f32>,
    size: usize,
}

impl SimilarityIndex {
    /// Assembles the index by concatenating chunks along the row axis
    ///
    /// Chunks are stacked in the given order. Fails when rows are ragged
    /// or when the concatenated result is not square; the matrix is never
    /// truncated or padded to fit.
    pub fn from_chunks(chunks: Vec<Vec<Vec<f32>>>) -> AppResult<Self> {
        let mut scores = Vec::new();
        let mut rows = 0usize;
        let mut width: Option<usize> = None;

        for chunk in chunks {
            for row in chunk {
                match width {
                    None => width = Some(row.len()),
                    Some(w) if w != row.len() => {
                        return Err(AppError::ShapeMismatch(format!(
                            "row {} has {} columns, expected {}",
                            rows,
                            row.len(),
                            w
                        )));
                    }
                    Some(_) => {}
                }
                scores.extend(row);
                rows += 1;
            }
        }

        let width = width.unwrap_or(0);
        if rows != width {
            return Err(AppError::ShapeMismatch(format!(
                "assembled matrix is {}x{}, expected square",
                rows, width
            )));
        }

        Ok(Self { scores, size: rows })
    }

    /// Loads and assembles all chunk files found in a directory
    ///
    /// Chunk files are named `similarity_part_<k>.json` and are stacked in
    /// filename order.
    pub fn load_dir(dir: &Path) -> AppResult<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(CHUNK_PREFIX) && name.ends_with(".json"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(AppError::DataFormat(format!(
                "no {}*.json chunk files found in {}",
                CHUNK_PREFIX,
                dir.display()
            )));
        }

        let mut chunks = Vec::with_capacity(paths.len());
        for path in &paths {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let chunk: Vec<Vec<f32>> = serde_json::from_reader(reader).map_err(|e| {
                AppError::DataFormat(format!("invalid similarity chunk {}: {}", path.display(), e))
            })?;
            chunks.push(chunk);
        }

        let index = Self::from_chunks(chunks)?;

        tracing::info!(
            dir = %dir.display(),
            chunk_files = paths.len(),
            size = index.len(),
            "Similarity index assembled"
        );

        Ok(index)
    }

    /// Similarity scores of every movie against `position`
    ///
    /// Indexed identically to catalog positions. Out-of-range positions
    /// indicate a catalog/index mismatch that load-time validation should
    /// have caught.
    pub fn row(&self, position: usize) -> AppResult<&[f32]> {
        if position >= self.size {
            return Err(AppError::IndexOutOfRange(format!(
                "position {} outside 0..{}",
                position, self.size
            )));
        }

        let start = position * self.size;
        Ok(&self.scores[start..start + self.size])
    }

    /// Number of rows (and columns) in the matrix
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
