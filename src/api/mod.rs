//! Contains the option types and the builder struct for the high level API.

mod palette_pipeline;

pub use palette_pipeline::PalettePipeline;

use crate::{kmeans::CentroidInit, ColorSpace, PaletteOrder};

/// A builder struct to specify the parameters for dominant color extraction.
///
/// # Examples
/// ```
/// # use tinct::{ExtractOptions, ColorSpace, PaletteOrder, kmeans::CentroidInit};
/// let options = ExtractOptions::new()
///     .centroid_init(CentroidInit::FarthestPoint)
///     .colorspace(ColorSpace::Lab)
///     .order(PaletteOrder::ByFrequency)
///     .seed(42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtractOptions {
    /// How the initial centroids are picked.
    pub(crate) init: CentroidInit,
    /// The maximum number of centroid updates.
    pub(crate) max_iterations: u32,
    /// The order of the returned colors.
    pub(crate) order: PaletteOrder,
    /// The color space to cluster in.
    pub(crate) colorspace: ColorSpace,
    /// The seed value for the random number generator.
    pub(crate) seed: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// The default maximum number of k-means iterations.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

    /// Creates a new [`ExtractOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            init: CentroidInit::PlusPlus,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            order: PaletteOrder::Unordered,
            colorspace: ColorSpace::Srgb,
            seed: 0,
        }
    }

    /// Sets the strategy used to pick the initial centroids.
    ///
    /// The default is [`CentroidInit::PlusPlus`].
    #[must_use]
    pub const fn centroid_init(mut self, init: CentroidInit) -> Self {
        self.init = init;
        self
    }

    /// Sets the maximum number of k-means iterations.
    ///
    /// The default is [`ExtractOptions::DEFAULT_MAX_ITERATIONS`].
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the order of the returned colors.
    ///
    /// The default is [`PaletteOrder::Unordered`].
    #[must_use]
    pub const fn order(mut self, order: PaletteOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the color space in which colors are clustered.
    ///
    /// The default is [`ColorSpace::Srgb`].
    #[must_use]
    pub const fn colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
