//! Dominant color extraction via k-means clustering.

use crate::{
    kmeans::{self, ClusterResult, Point},
    ColorSpace, ExtractOptions,
};
use palette::Srgb;
use std::cmp::Reverse;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The order in which extracted colors are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteOrder {
    /// Colors are returned in the order their clusters were seeded.
    #[default]
    Unordered,
    /// Colors are returned from the most to the least populated cluster.
    ///
    /// Clusters with the same population keep their seeding order.
    ByFrequency,
}

impl PaletteOrder {
    /// Returns the centroids of `result` in this order.
    fn apply(self, result: ClusterResult) -> Vec<Point> {
        let ClusterResult { centroids, counts, .. } = result;
        match self {
            PaletteOrder::Unordered => centroids,
            PaletteOrder::ByFrequency => {
                let mut clusters = centroids.into_iter().zip(counts).collect::<Vec<_>>();
                clusters.sort_by_key(|&(_, count)| Reverse(count));
                clusters.into_iter().map(|(centroid, _)| centroid).collect()
            }
        }
    }
}

/// Orders the clusters and converts their centroids back to sRGB.
fn finish(result: ClusterResult, order: PaletteOrder, colorspace: ColorSpace) -> Vec<Srgb<u8>> {
    order
        .apply(result)
        .into_iter()
        .map(|centroid| colorspace.from_point(centroid))
        .collect()
}

/// Computes the `number_of_colors` most representative colors of `pixels`.
///
/// Exactly `min(number_of_colors, pixels.len())` colors are returned.
/// If there are fewer distinct colors than that, the result contains duplicates.
/// The same pixels and options always produce the same colors.
///
/// # Examples
/// ```
/// # use tinct::{dominant_colors, ExtractOptions, PaletteOrder};
/// # use palette::Srgb;
/// let red = Srgb::new(255, 0, 0);
/// let blue = Srgb::new(0, 0, 255);
/// let pixels = [red, blue, blue, red, blue];
///
/// let options = ExtractOptions::new().order(PaletteOrder::ByFrequency);
/// assert_eq!(dominant_colors(&pixels, 2, &options), [blue, red]);
/// ```
#[must_use]
pub fn dominant_colors(
    pixels: &[Srgb<u8>],
    number_of_colors: usize,
    options: &ExtractOptions,
) -> Vec<Srgb<u8>> {
    if pixels.is_empty() || number_of_colors == 0 {
        return Vec::new();
    }

    let &ExtractOptions { init, max_iterations, order, colorspace, seed } = options;
    let points = pixels
        .iter()
        .map(|&color| colorspace.to_point(color))
        .collect::<Vec<_>>();

    let result = kmeans::cluster(&points, number_of_colors, init, max_iterations, seed);
    finish(result, order, colorspace)
}

/// Computes the `number_of_colors` most representative colors of `pixels` in parallel.
///
/// The result is identical to [`dominant_colors`] given the same arguments.
#[cfg(feature = "threads")]
#[must_use]
pub fn dominant_colors_par(
    pixels: &[Srgb<u8>],
    number_of_colors: usize,
    options: &ExtractOptions,
) -> Vec<Srgb<u8>> {
    if pixels.is_empty() || number_of_colors == 0 {
        return Vec::new();
    }

    let &ExtractOptions { init, max_iterations, order, colorspace, seed } = options;
    let points = pixels
        .par_iter()
        .map(|&color| colorspace.to_point(color))
        .collect::<Vec<_>>();

    let result = kmeans::cluster_par(&points, number_of_colors, init, max_iterations, seed);
    finish(result, order, colorspace)
}
