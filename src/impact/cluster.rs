//! Seeded k-means over embedding vectors.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed so repeated runs over identical input produce identical
/// partitions.
pub const CLUSTER_SEED: u64 = 42;

const MAX_ITERATIONS: usize = 10;

/// Assign each vector to one of `k` clusters; returns per-vector labels.
/// `k` is capped at the number of vectors.
pub fn kmeans(vectors: &[Vec<f32>], k: usize, seed: u64) -> Vec<usize> {
    if vectors.is_empty() || k == 0 {
        return Vec::new();
    }
    let k = k.min(vectors.len());
    if k == 1 {
        return vec![0; vectors.len()];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = init_centroids(vectors, k, &mut rng);
    let mut labels = vec![0usize; vectors.len()];
    let dims = vectors[0].len();

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;

        // Assign points to the nearest centroid
        for (i, vector) in vectors.iter().enumerate() {
            let nearest = nearest_centroid(vector, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }

        // Update centroids from their members
        for (j, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f32>> = vectors
                .iter()
                .zip(&labels)
                .filter(|(_, &label)| label == j)
                .map(|(vector, _)| vector)
                .collect();
            if members.is_empty() {
                continue;
            }

            let mut updated = vec![0.0f32; dims];
            for member in &members {
                for (d, value) in member.iter().enumerate() {
                    updated[d] += value;
                }
            }
            for value in &mut updated {
                *value /= members.len() as f32;
            }
            *centroid = updated;
        }

        if !changed {
            break;
        }
    }

    labels
}

/// Number of clusters with at least one member.
pub fn populated_clusters(labels: &[usize]) -> usize {
    labels.iter().collect::<HashSet<_>>().len()
}

/// k-means++ initialization: after a seeded first pick, sample further
/// centroids proportionally to squared distance from the nearest existing
/// one.
fn init_centroids(vectors: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);
    let first = rng.gen_range(0..vectors.len());
    centroids.push(vectors[first].clone());

    while centroids.len() < k {
        let weights: Vec<f32> = vectors
            .iter()
            .map(|vector| {
                centroids
                    .iter()
                    .map(|centroid| squared_distance(vector, centroid))
                    .fold(f32::MAX, f32::min)
            })
            .collect();

        // All remaining points coincide with a centroid; any choice works.
        let next = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            Err(_) => 0,
        };
        centroids.push(vectors[next].clone());
    }

    centroids
}

fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(i, centroid)| (i, squared_distance(vector, centroid)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
