// ============================================================
// Layer 4 — Embedding Loader
// ============================================================
// Reads a pretrained vector file in the plain text format
// shared by word2vec and fastText exports:
//
//   [3000000 300]                 ← optional header line
//   the 0.0801 0.1050 0.0498 …
//   of  0.0067 -0.0308 0.1000 …
//
// and produces the Vocabulary and EmbeddingMatrix that every
// later stage reads from. Word indices follow file order,
// starting at 2.

use anyhow::{bail, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::vocabulary::{EmbeddingMatrix, Vocabulary};

pub struct EmbeddingLoader {
    path: PathBuf,
    dim:  usize,
}

impl EmbeddingLoader {
    /// `dim` is the vector width every line must have
    pub fn new(path: impl AsRef<Path>, dim: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            dim,
        }
    }

    pub fn load(&self) -> Result<(Vocabulary, EmbeddingMatrix)> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open embeddings file '{}'", self.path.display()))?;
        let (vocab, matrix) = read_vectors(BufReader::new(file), self.dim)
            .with_context(|| format!("Invalid embeddings file '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} word vectors from '{}' (matrix {} x {})",
            vocab.word_count(),
            self.path.display(),
            matrix.rows(),
            matrix.dim(),
        );
        Ok((vocab, matrix))
    }
}

/// Parse vectors from any buffered reader.
pub fn read_vectors<R: BufRead>(reader: R, dim: usize) -> Result<(Vocabulary, EmbeddingMatrix)> {
    let mut vocab  = Vocabulary::new();
    let mut matrix = EmbeddingMatrix::new(dim);
    let mut coefs  = Vec::with_capacity(dim);

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line    = line.with_context(|| format!("line {line_no}: read failed"))?;

        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };

        if line_no == 1 && is_header(&line, dim) {
            tracing::debug!("Skipping vector file header: '{}'", line.trim());
            continue;
        }

        coefs.clear();
        for field in fields {
            let value: f32 = field
                .parse()
                .with_context(|| format!("line {line_no}: non-numeric coefficient '{field}'"))?;
            coefs.push(value);
        }

        if coefs.len() != dim {
            bail!(
                "line {line_no}: vector for '{word}' has {} values, expected {dim}",
                coefs.len()
            );
        }

        vocab.push(word);
        matrix.push_row(&coefs);
    }

    Ok((vocab, matrix))
}

/// `<count> <dim>` header written by word2vec/fastText exports.
///
/// Only recognised when its width matches `dim`. With one-wide
/// vectors a header and a numeric word look the same, so the line
/// is always read as a vector.
fn is_header(line: &str, dim: usize) -> bool {
    if dim == 1 {
        return false;
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [count, width] => count.parse::<u64>().is_ok() && width.parse::<usize>() == Ok(dim),
        _ => false,
    }
}
