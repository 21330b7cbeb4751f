//! Lloyd's k-means clustering over 3-dimensional points.
//!
//! Each iteration assigns every point to its nearest centroid (squared euclidean distance,
//! ties going to the lowest centroid index) and then moves each centroid to the mean of its
//! assigned points. Iteration stops once no assignment changes or the iteration cap is hit.
//!
//! Clustering never fails. If there are fewer distinct points than clusters,
//! seeding repeats points and clusters left without any points keep their previous centroid,
//! so the result always has exactly `k` (possibly duplicate) centroids.

// Seeding follows:
// Arthur, D. & Vassilvitskii, S. k-means++: The Advantages of Careful Seeding.
// Proceedings of the 18th Annual ACM-SIAM Symposium on Discrete Algorithms, 1027–1035, 2007.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::{prelude::Distribution, seq::index, SeedableRng};
use rand_distr::{Uniform, WeightedIndex};
use rand_xoshiro::Xoroshiro128PlusPlus;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// A point in a 3-dimensional color space.
pub type Point = [f32; 3];

/// The strategy used to pick the initial centroids.
///
/// All strategies draw from a random number generator seeded by the caller,
/// so the same input and seed always produce the same centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CentroidInit {
    /// Picks `k` points at distinct positions uniformly at random.
    Random,
    /// k-means++ seeding: the first centroid is picked uniformly at random and each following
    /// centroid is picked with probability proportional to its squared distance
    /// from the nearest centroid picked so far.
    #[default]
    PlusPlus,
    /// Greedy farthest-point seeding: the first centroid is picked uniformly at random and each
    /// following centroid is the point farthest from all centroids picked so far.
    FarthestPoint,
}

/// The output of [`cluster`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterResult {
    /// The final centroids, in the order they were seeded.
    pub centroids: Vec<Point>,
    /// The index of the centroid owning each input point.
    pub assignments: Vec<u32>,
    /// The number of points assigned to each centroid.
    ///
    /// Counts may be zero if there were fewer distinct points than centroids.
    pub counts: Vec<u32>,
    /// The number of centroid updates that were performed.
    pub iterations: u32,
}

#[inline]
fn squared_distance(a: Point, b: Point) -> f32 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
}

/// Returns the index of the centroid nearest to `point`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn nearest(centroids: &[Point], point: Point) -> u32 {
    let mut min_index = 0;
    let mut min_distance = f32::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(centroid, point);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    min_index as u32
}

impl CentroidInit {
    /// Picks `k` initial centroids from `points`, where `1 <= k <= points.len()`.
    fn seeds(self, points: &[Point], k: usize, rng: &mut Xoroshiro128PlusPlus) -> Vec<Point> {
        match self {
            CentroidInit::Random => index::sample(rng, points.len(), k)
                .into_iter()
                .map(|i| points[i])
                .collect(),
            CentroidInit::PlusPlus => spread_seeds(points, k, rng, |distances, rng| {
                WeightedIndex::new(distances)
                    .ok()
                    .map(|weighted| weighted.sample(rng))
            }),
            CentroidInit::FarthestPoint => {
                spread_seeds(points, k, rng, |distances, _| farthest(distances))
            }
        }
    }
}

/// Returns the index of the largest positive distance, if any.
fn farthest(distances: &[f32]) -> Option<usize> {
    distances
        .iter()
        .enumerate()
        .filter(|&(_, &distance)| distance > 0.0)
        // min_by_key keeps the first of equal keys, so ties go to the lowest index
        .min_by_key(|&(_, &distance)| Reverse(OrderedFloat(distance)))
        .map(|(i, _)| i)
}

/// Seeds centroids one at a time starting from a uniformly random point.
///
/// `pick` chooses the next point given each point's squared distance to its nearest centroid,
/// returning `None` once every point coincides with a centroid.
fn spread_seeds(
    points: &[Point],
    k: usize,
    rng: &mut Xoroshiro128PlusPlus,
    mut pick: impl FnMut(&[f32], &mut Xoroshiro128PlusPlus) -> Option<usize>,
) -> Vec<Point> {
    let first = points[Uniform::new(0, points.len()).sample(rng)];
    let mut centroids = Vec::with_capacity(k);
    centroids.push(first);

    let mut distances = points
        .iter()
        .map(|&point| squared_distance(point, first))
        .collect::<Vec<_>>();

    while centroids.len() < k {
        let Some(next) = pick(distances.as_slice(), rng) else {
            log::debug!(
                "only {} distinct seeds among {} points, repeating the first to reach {k}",
                centroids.len(),
                points.len(),
            );
            centroids.resize(k, first);
            break;
        };

        let next = points[next];
        for (distance, &point) in distances.iter_mut().zip(points) {
            *distance = distance.min(squared_distance(point, next));
        }
        centroids.push(next);
    }

    centroids
}

/// The mutable state of a clustering run.
struct State<'a> {
    points: &'a [Point],
    centroids: Vec<Point>,
    assignments: Vec<u32>,
}

impl<'a> State<'a> {
    fn new(points: &'a [Point], centroids: Vec<Point>) -> Self {
        Self {
            points,
            centroids,
            // no point starts out assigned, so the first pass always counts as a change
            assignments: vec![u32::MAX; points.len()],
        }
    }

    /// Reassigns every point, returning whether any assignment changed.
    fn assign(&mut self) -> bool {
        let Self { points, centroids, assignments } = self;
        let mut changed = false;
        for (assignment, &point) in assignments.iter_mut().zip(points.iter()) {
            let i = nearest(centroids, point);
            changed |= *assignment != i;
            *assignment = i;
        }
        changed
    }

    #[cfg(feature = "threads")]
    fn assign_par(&mut self) -> bool {
        let Self { points, centroids, assignments } = self;
        let centroids = &*centroids;
        // every assignment has to be updated, so this must not short-circuit
        assignments
            .par_iter_mut()
            .zip(points.par_iter())
            .map(|(assignment, &point)| {
                let i = nearest(centroids, point);
                let changed = *assignment != i;
                *assignment = i;
                changed
            })
            .reduce(|| false, |a, b| a || b)
    }

    /// Moves each centroid to the mean of its points. Centroids without points stay put.
    fn update(&mut self) {
        let mut sums = vec![[0.0f64; 3]; self.centroids.len()];
        let mut counts = vec![0u32; self.centroids.len()];

        for (&i, point) in self.assignments.iter().zip(self.points) {
            let i = i as usize;
            for (sum, &c) in sums[i].iter_mut().zip(point) {
                *sum += f64::from(c);
            }
            counts[i] += 1;
        }

        for ((centroid, sum), count) in self.centroids.iter_mut().zip(sums).zip(counts) {
            if count > 0 {
                let n = f64::from(count);
                #[allow(clippy::cast_possible_truncation)]
                {
                    *centroid = sum.map(|s| (s / n) as f32);
                }
            }
        }
    }

    fn run(mut self, max_iterations: u32, assign: impl Fn(&mut Self) -> bool) -> ClusterResult {
        let mut iterations = 0;
        let converged = loop {
            if !assign(&mut self) {
                break true;
            }
            if iterations >= max_iterations {
                break false;
            }
            self.update();
            iterations += 1;
        };

        let Self { points, centroids, assignments } = self;

        if converged {
            log::debug!(
                "k-means converged after {iterations} iterations (k = {}, {} points)",
                centroids.len(),
                points.len(),
            );
        } else {
            log::debug!(
                "k-means stopped at the cap of {max_iterations} iterations (k = {}, {} points)",
                centroids.len(),
                points.len(),
            );
        }

        let mut counts = vec![0; centroids.len()];
        for &i in &assignments {
            counts[i as usize] += 1;
        }

        ClusterResult { centroids, assignments, counts, iterations }
    }
}

/// Seeds the centroids, returning `None` if there is nothing to cluster.
fn seeded_state(points: &[Point], k: usize, init: CentroidInit, seed: u64) -> Option<State<'_>> {
    let k = k.min(points.len());
    if k == 0 {
        return None;
    }

    let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
    Some(State::new(points, init.seeds(points, k, rng)))
}

/// Clusters `points` into `min(k, points.len())` clusters.
///
/// `max_iterations` caps the number of centroid updates.
/// The random number generator used for seeding is seeded with `seed`.
///
/// An empty [`ClusterResult`] is returned if `points` is empty or `k` is zero.
///
/// # Examples
/// ```
/// # use tinct::kmeans::{cluster, CentroidInit};
/// let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [100.0, 0.0, 0.0], [101.0, 0.0, 0.0]];
/// let result = cluster(&points, 2, CentroidInit::FarthestPoint, 100, 0);
/// assert_eq!(result.counts, [2, 2]);
/// assert_eq!(result.assignments[0], result.assignments[1]);
/// assert_ne!(result.assignments[1], result.assignments[2]);
/// ```
#[must_use]
pub fn cluster(
    points: &[Point],
    k: usize,
    init_method: CentroidInit,
    max_iterations: u32,
    seed: u64,
) -> ClusterResult {
    seeded_state(points, k, init_method, seed)
        .map(|state| state.run(max_iterations, State::assign))
        .unwrap_or_default()
}

/// Clusters `points` like [`cluster`], assigning points to centroids in parallel.
///
/// The result is identical to [`cluster`] given the same arguments.
#[cfg(feature = "threads")]
#[must_use]
pub fn cluster_par(
    points: &[Point],
    k: usize,
    init_method: CentroidInit,
    max_iterations: u32,
    seed: u64,
) -> ClusterResult {
    seeded_state(points, k, init_method, seed)
        .map(|state| state.run(max_iterations, State::assign_par))
        .unwrap_or_default()
}
