//! Pure functions generating presynaptic/postsynaptic index pairs for
//! [`crate::projection::Projection::new`] (§4.4)
//!
//! Every connector returns a `Vec<(u32, u32)>` of `(source_index,
//! target_index)` pairs; none allocates a projection itself, so callers
//! choose the synapse-parameter generator independently of the topology.

use rand::Rng;
use std::collections::HashMap;

/// Connect every source neuron to every target neuron
pub fn all_to_all(source_size: usize, target_size: usize) -> Vec<(u32, u32)> {
    let mut pairs = Vec::with_capacity(source_size * target_size);
    for src in 0..source_size {
        for tgt in 0..target_size {
            pairs.push((src as u32, tgt as u32));
        }
    }
    pairs
}

/// Connect neuron `i` of the source to neuron `i` of the target.
/// `source_size` and `target_size` must be equal; the shorter length wins
/// if they are not, connecting only the overlapping prefix.
pub fn one_to_one(source_size: usize, target_size: usize) -> Vec<(u32, u32)> {
    let n = source_size.min(target_size);
    (0..n).map(|i| (i as u32, i as u32)).collect()
}

/// Connect every possible pair independently with probability `p`
pub fn fixed_probability(
    source_size: usize,
    target_size: usize,
    p: f64,
    rng: &mut impl Rng,
) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for src in 0..source_size {
        for tgt in 0..target_size {
            if rng.gen_bool(p.clamp(0.0, 1.0)) {
                pairs.push((src as u32, tgt as u32));
            }
        }
    }
    pairs
}

/// For every source neuron, connect to exactly `count` distinct, randomly
/// chosen target neurons (no self-duplication within one source's fan-out)
pub fn fixed_number_post(
    source_size: usize,
    target_size: usize,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<(u32, u32)> {
    let count = count.min(target_size);
    let mut pairs = Vec::with_capacity(source_size * count);
    for src in 0..source_size {
        let mut targets: Vec<usize> = (0..target_size).collect();
        for i in 0..count {
            let j = rng.gen_range(i..targets.len());
            targets.swap(i, j);
        }
        for &tgt in &targets[..count] {
            pairs.push((src as u32, tgt as u32));
        }
    }
    pairs
}

/// For every target neuron, connect from exactly `count` distinct, randomly
/// chosen source neurons
pub fn fixed_number_pre(
    source_size: usize,
    target_size: usize,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<(u32, u32)> {
    let count = count.min(source_size);
    let mut pairs = Vec::with_capacity(target_size * count);
    for tgt in 0..target_size {
        let mut sources: Vec<usize> = (0..source_size).collect();
        for i in 0..count {
            let j = rng.gen_range(i..sources.len());
            sources.swap(i, j);
        }
        for &src in &sources[..count] {
            pairs.push((src as u32, tgt as u32));
        }
    }
    pairs
}

/// Build pairs from an explicit list, filtering out anything out of range
/// for the declared population sizes
pub fn from_container(
    source_size: usize,
    target_size: usize,
    pairs: impl IntoIterator<Item = (u32, u32)>,
) -> Vec<(u32, u32)> {
    pairs
        .into_iter()
        .filter(|&(src, tgt)| (src as usize) < source_size && (tgt as usize) < target_size)
        .collect()
}

/// Build pairs from a sparse weight-like map keyed by `(source, target)`,
/// discarding the values and keeping only the connectivity shape. Useful
/// when importing connectivity from an external adjacency representation.
pub fn from_map<V>(map: &HashMap<(u32, u32), V>) -> Vec<(u32, u32)> {
    map.keys().copied().collect()
}

/// Duplicate the connectivity shape (not the synapse parameters) of an
/// existing set of pairs, for building a second projection with the same
/// topology but a different synapse kind
pub fn clone_projection(pairs: &[(u32, u32)]) -> Vec<(u32, u32)> {
    pairs.to_vec()
}
