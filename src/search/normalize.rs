//! Vector math shared by the local and remote vector stores.

/// Scale `v` to unit L2 length. The zero vector is returned unchanged to
/// avoid division by zero; its similarity to anything is defined as 0.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// L2 magnitude of a vector. Logged by the remote store before and after
/// normalization.
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity between two vectors. Returns 0.0 for mismatched
/// dimensions or when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Vector-DB result distances are `1 - similarity`.
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 - distance
}

pub fn similarity_to_distance(similarity: f32) -> f32 {
    1.0 - similarity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_produces_unit_length() {
        let v = vec![3.0, 4.0];
        let n = l2_normalize(&v);
        assert!((magnitude(&n) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let v = vec![0.0, 0.0, 0.0];
        assert_eq!(l2_normalize(&v), v);
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = vec![0.2, 0.5, 0.9];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let zero = vec![0.0, 0.0];
        let v = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_dims_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_distance_similarity_round_trip() {
        let sim = 0.73f32;
        assert!((distance_to_similarity(similarity_to_distance(sim)) - sim).abs() < 1e-6);
    }
}
