//! MinHash sketch of a shingle set (§4.G). Rather than H independent hash
//! functions, each of the H sketch slots re-hashes every shingle with
//! `blake3::Hasher::new_derive_key` under a slot-specific context string —
//! `blake3` is already this codebase's content-hashing crate elsewhere, so
//! this reuses it instead of pulling in a family of hash functions.

pub const DEFAULT_H: usize = 64;

pub struct MinHashSketch {
    pub slots: Vec<u64>,
}

fn slot_hash(slot: usize, key: &str) -> u64 {
    let context = format!("coderadar-dup-detect-minhash-slot-{slot}");
    let keyed = blake3::derive_key(&context, key.as_bytes());
    u64::from_le_bytes(keyed[0..8].try_into().unwrap())
}

pub fn sketch(shingle_keys: &[String], h: usize) -> MinHashSketch {
    let mut slots = vec![u64::MAX; h];
    for key in shingle_keys {
        for (slot, min) in slots.iter_mut().enumerate() {
            let v = slot_hash(slot, key);
            if v < *min {
                *min = v;
            }
        }
    }
    MinHashSketch { slots }
}

/// Estimated Jaccard similarity: the fraction of slots where both sketches
/// picked the same minimum.
pub fn estimate_similarity(a: &MinHashSketch, b: &MinHashSketch) -> f64 {
    if a.slots.is_empty() || b.slots.is_empty() {
        return 0.0;
    }
    let matches = a.slots.iter().zip(b.slots.iter()).filter(|(x, y)| x == y).count();
    matches as f64 / a.slots.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_shingle_sets_have_similarity_one() {
        let keys = vec!["a b c".to_string(), "d e f".to_string()];
        let a = sketch(&keys, 16);
        let b = sketch(&keys, 16);
        assert_eq!(estimate_similarity(&a, &b), 1.0);
    }

    #[test]
    fn disjoint_shingle_sets_have_low_similarity() {
        let a = sketch(&["one".to_string()], 64);
        let b = sketch(&["two".to_string()], 64);
        assert!(estimate_similarity(&a, &b) < 1.0);
    }
}
