// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector helpers shared by the embedders, the vector store and the memory ranker.
//!
//! All stored vectors are L2-normalized at embed time, so cosine similarity
//! reduces to a plain dot product.

/// Scale `vec` to unit length. Near-zero vectors are returned unchanged.
pub fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm = l2_norm(vec);
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

/// Euclidean length of `vec`.
pub fn l2_norm(vec: &[f32]) -> f32 {
    vec.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Dot product of two vectors.
///
/// Vectors of different lengths score 0.0: a row embedded by a different
/// provider is treated as a zero vector rather than an error.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Re-normalized mean of `vectors`, or `None` when there is nothing to average.
///
/// Vectors whose length differs from the first one are skipped.
pub fn centroid<'a, I>(vectors: I) -> Option<Vec<f32>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut iter = vectors.into_iter();
    let first = iter.next()?;
    let mut sum = first.to_vec();
    let mut count = 1usize;

    for vec in iter {
        if vec.len() != sum.len() {
            continue;
        }
        for (acc, v) in sum.iter_mut().zip(vec) {
            *acc += v;
        }
        count += 1;
    }

    let mean: Vec<f32> = sum.iter().map(|v| v / count as f32).collect();
    Some(l2_normalize(&mean))
}

/// Convert an f32 vector to little-endian bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a SQLite BLOB back to an f32 vector. Trailing partial words are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
