//! # Center Seeding
//!
//! Selection of initial cluster centers from a candidate set. Three
//! strategies; all of them may return fewer than `k` centers, which the
//! clustering step treats as "cannot subdivide".

use std::str::FromStr;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use bonsai_core::error::Error;

use crate::distance::DistanceMetric;
use crate::matrix::Matrix;
use crate::random::{rand_double, rand_int, UniqueRandom};

/// Two prospective centers closer than this are considered duplicates
/// by the random strategy.
const DUPLICATE_EPS: f32 = 1e-16;

/// Strategy for picking initial cluster centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentersInit {
    /// Sample without replacement, rejecting near-duplicate picks
    Random,
    /// Gonzales' farthest-point heuristic
    Gonzales,
    /// k-means++ probability-proportional-to-distance seeding
    KMeansPp,
}

impl Default for CentersInit {
    fn default() -> Self {
        CentersInit::Random
    }
}

impl FromStr for CentersInit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "random" => Ok(CentersInit::Random),
            "gonzales" => Ok(CentersInit::Gonzales),
            "kmeanspp" | "kmeans++" => Ok(CentersInit::KMeansPp),
            other => Err(Error::Configuration {
                message: format!("Unknown centers_init: {other:?}"),
            }),
        }
    }
}

/// Choose up to `k` center ids from `indices`. The returned vector may
/// be shorter than `k` when the strategy runs out of usable candidates.
pub(crate) fn choose_centers(
    init: CentersInit,
    dataset: &Matrix,
    metric: DistanceMetric,
    indices: &[usize],
    k: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    match init {
        CentersInit::Random => choose_centers_random(dataset, metric, indices, k, rng),
        CentersInit::Gonzales => choose_centers_gonzales(dataset, metric, indices, k, rng),
        CentersInit::KMeansPp => choose_centers_kmeanspp(dataset, metric, indices, k, rng),
    }
}

/// Random picks without replacement; a pick closer than `DUPLICATE_EPS`
/// to an already-chosen center is rejected and redrawn. Returns early
/// with fewer centers once the candidate pool is exhausted.
fn choose_centers_random(
    dataset: &Matrix,
    metric: DistanceMetric,
    indices: &[usize],
    k: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut draw = UniqueRandom::new(indices.len(), rng);
    let mut centers = Vec::with_capacity(k);

    'outer: while centers.len() < k {
        loop {
            let rnd = match draw.next() {
                Some(rnd) => rnd,
                None => break 'outer,
            };
            let candidate = indices[rnd];
            let duplicate = centers
                .iter()
                .any(|&c| metric.distance(dataset.row(candidate), dataset.row(c)) < DUPLICATE_EPS);
            if !duplicate {
                centers.push(candidate);
                break;
            }
        }
    }

    centers
}

/// Gonzales' algorithm: first center uniformly at random, each further
/// center the candidate maximizing its minimum distance to the chosen
/// set. Stops early when no candidate has a strictly positive gap.
fn choose_centers_gonzales(
    dataset: &Matrix,
    metric: DistanceMetric,
    indices: &[usize],
    k: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let n = indices.len();
    let mut centers = Vec::with_capacity(k);
    centers.push(indices[rand_int(rng, n)]);

    while centers.len() < k {
        let mut best_index = None;
        let mut best_val = 0.0f32;
        for &candidate in indices {
            let point = dataset.row(candidate);
            let mut dist = metric.distance(dataset.row(centers[0]), point);
            for &center in &centers[1..] {
                let tmp_dist = metric.distance(dataset.row(center), point);
                if tmp_dist < dist {
                    dist = tmp_dist;
                }
            }
            if dist > best_val {
                best_val = dist;
                best_index = Some(candidate);
            }
        }
        match best_index {
            Some(candidate) => centers.push(candidate),
            None => break,
        }
    }

    centers
}

/// k-means++ seeding (Arthur & Vassilvitskii). Each new center is drawn
/// with probability proportional to its distance from the closest
/// already-chosen center; a single local trial is performed per center.
fn choose_centers_kmeanspp(
    dataset: &Matrix,
    metric: DistanceMetric,
    indices: &[usize],
    k: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let n = indices.len();
    let num_local_tries = 1;

    let mut centers = Vec::with_capacity(k);
    let first = rand_int(rng, n);
    centers.push(indices[first]);

    let mut closest_dist_sq = vec![0.0f32; n];
    let mut current_pot = 0.0f64;
    for (j, &candidate) in indices.iter().enumerate() {
        closest_dist_sq[j] = metric.distance(dataset.row(candidate), dataset.row(indices[first]));
        current_pot += closest_dist_sq[j] as f64;
    }

    while centers.len() < k {
        let mut best_new_pot = -1.0f64;
        let mut best_new_index = 0;
        for _ in 0..num_local_tries {
            // Walk the candidates accumulating closest distances;
            // guard against rounding by never walking past the end.
            let mut rand_val = rand_double(rng, current_pot);
            let mut index = 0;
            while index < n - 1 {
                if rand_val <= closest_dist_sq[index] as f64 {
                    break;
                }
                rand_val -= closest_dist_sq[index] as f64;
                index += 1;
            }

            let mut new_pot = 0.0f64;
            for (j, &candidate) in indices.iter().enumerate() {
                let dist = metric.distance(dataset.row(candidate), dataset.row(indices[index]));
                new_pot += dist.min(closest_dist_sq[j]) as f64;
            }

            if best_new_pot < 0.0 || new_pot < best_new_pot {
                best_new_pot = new_pot;
                best_new_index = index;
            }
        }

        centers.push(indices[best_new_index]);
        current_pot = best_new_pot;
        for (j, &candidate) in indices.iter().enumerate() {
            let dist = metric.distance(dataset.row(candidate), dataset.row(indices[best_new_index]));
            closest_dist_sq[j] = dist.min(closest_dist_sq[j]);
        }
    }

    centers
}
