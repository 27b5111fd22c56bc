//! Exhaustive flat nearest-neighbour index.
//!
//! The corpus is a few hundred presets in a 29-dimension space, a linear
//! scan beats any structure at this size and keeps ranking exactly
//! reproducible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector {position} has dimension {got}, index expects {expected}")]
    DimensionMismatch {
        position: usize,
        got: usize,
        expected: usize,
    },
}

pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dim: usize, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        for (position, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    position,
                    got: v.len(),
                    expected: dim,
                });
            }
        }
        Ok(Self { dim, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The `k` nearest stored vectors by L2 distance, ascending. Equal
    /// distances keep insertion order, so results are stable for a fixed
    /// corpus.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if query.len() != self.dim || k == 0 {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, l2_distance(query, v)))
            .collect();
        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
