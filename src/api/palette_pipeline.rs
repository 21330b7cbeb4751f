//! Contains the [`PalettePipeline`] builder struct for the high level API.

use crate::{
    compose_with_layout, dominant_colors, kmeans::CentroidInit, ColorSpace, ExtractOptions,
    PackedBuffer, PaletteOrder, PixelList, Result, Sampler, SwatchLayout, DEFAULT_MAX_SIZE,
};
#[cfg(feature = "threads")]
use crate::dominant_colors_par;
use palette::Srgb;
use std::borrow::Cow;

#[cfg(feature = "image")]
use image::DynamicImage;

/// A builder struct to specify options to extract a color palette from an image.
///
/// The image is first shrunk so that its longer side is at most
/// [`DEFAULT_MAX_SIZE`] pixels (see [`PalettePipeline::downscale`]),
/// then its pixels are clustered with k-means.
///
/// # Examples
/// To start, create a [`PalettePipeline`] from a [`PackedBuffer`]
/// or a [`DynamicImage`] (note that the `image` feature is needed for the latter):
/// ```no_run
/// # use tinct::PalettePipeline;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?;
/// let pipeline = PalettePipeline::from(&img);
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change different options like the number of colors in the palette:
/// ```
/// # use tinct::{PalettePipeline, PackedBuffer, ColorSpace, PaletteOrder, kmeans::CentroidInit};
/// # fn main() -> tinct::Result<()> {
/// # let image = PackedBuffer::new(vec![0; 4], 1, 1, 4)?;
/// let pipeline = PalettePipeline::new(&image)
///     .palette_size(8)
///     .colorspace(ColorSpace::Lab)
///     .centroid_init(CentroidInit::FarthestPoint)
///     .order(PaletteOrder::ByFrequency)
///     .downscale(Some(128));
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```
/// # use tinct::{PalettePipeline, PackedBuffer, SwatchLayout};
/// # fn main() -> tinct::Result<()> {
/// # let image = PackedBuffer::new(vec![0; 4], 1, 1, 4)?;
/// # let pipeline = PalettePipeline::new(&image);
/// let palette = pipeline.palette()?;
/// let swatch = pipeline.swatch(50, SwatchLayout::Strip)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PalettePipeline<'a> {
    /// The input image.
    pub(crate) image: Cow<'a, PackedBuffer>,
    /// The number of colors to extract.
    pub(crate) k: usize,
    /// The clustering options.
    pub(crate) options: ExtractOptions,
    /// The maximum side length to shrink the image to before clustering.
    pub(crate) max_size: Option<u32>,
    /// The sampler used when shrinking the image.
    pub(crate) sampler: Sampler,
}

impl<'a> PalettePipeline<'a> {
    /// The default number of colors in the palette.
    pub const DEFAULT_PALETTE_SIZE: usize = 5;

    /// Creates a new [`PalettePipeline`] with default options.
    #[must_use]
    pub fn new(image: &'a PackedBuffer) -> Self {
        Self::from_cow(Cow::Borrowed(image))
    }

    fn from_cow(image: Cow<'a, PackedBuffer>) -> Self {
        Self {
            image,
            k: Self::DEFAULT_PALETTE_SIZE,
            options: ExtractOptions::new(),
            max_size: Some(DEFAULT_MAX_SIZE),
            sampler: Sampler::default(),
        }
    }

    /// Sets the number of colors in the palette.
    ///
    /// Fewer colors are returned if the (downscaled) image has fewer pixels than this.
    /// The default is [`PalettePipeline::DEFAULT_PALETTE_SIZE`].
    #[must_use]
    pub fn palette_size(mut self, size: usize) -> Self {
        self.k = size;
        self
    }

    /// Sets the color space in which colors are clustered.
    ///
    /// The default is [`ColorSpace::Srgb`].
    #[must_use]
    pub fn colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.options = self.options.colorspace(colorspace);
        self
    }

    /// Sets the strategy used to pick the initial centroids.
    ///
    /// The default is [`CentroidInit::PlusPlus`].
    #[must_use]
    pub fn centroid_init(mut self, init: CentroidInit) -> Self {
        self.options = self.options.centroid_init(init);
        self
    }

    /// Sets the maximum number of k-means iterations.
    ///
    /// The default is [`ExtractOptions::DEFAULT_MAX_ITERATIONS`].
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.options = self.options.max_iterations(max_iterations);
        self
    }

    /// Sets the order of the returned colors.
    ///
    /// The default is [`PaletteOrder::Unordered`].
    #[must_use]
    pub fn order(mut self, order: PaletteOrder) -> Self {
        self.options = self.options.order(order);
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.options = self.options.seed(seed);
        self
    }

    /// Sets the maximum side length the image is shrunk to before clustering,
    /// or `None` to cluster every pixel of the image.
    ///
    /// The default is `Some(DEFAULT_MAX_SIZE)`.
    #[must_use]
    pub fn downscale(mut self, max_size: Option<u32>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the sampler used to shrink the image.
    ///
    /// The default is [`Sampler::Nearest`].
    #[must_use]
    pub fn sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Converts the (possibly downscaled) image into a list of pixels.
    fn pixels(
        &self,
        downscale: impl FnOnce(&PackedBuffer, u32, Sampler) -> Result<PackedBuffer>,
    ) -> Result<PixelList> {
        let image: &PackedBuffer = &self.image;
        match self.max_size {
            Some(max_size) => PixelList::try_from(&downscale(image, max_size, self.sampler)?),
            None => PixelList::try_from(image),
        }
    }

    /// Runs the pipeline and returns the extracted colors.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimension`](crate::Error::InvalidDimension)
    /// if the downscale size was set to `Some(0)`.
    pub fn palette(&self) -> Result<Vec<Srgb<u8>>> {
        let pixels = self.pixels(PackedBuffer::downscale)?;
        Ok(dominant_colors(pixels.pixels(), self.k, &self.options))
    }

    /// Runs the pipeline in parallel and returns the extracted colors.
    ///
    /// The result is identical to [`PalettePipeline::palette`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimension`](crate::Error::InvalidDimension)
    /// if the downscale size was set to `Some(0)`.
    #[cfg(feature = "threads")]
    pub fn palette_par(&self) -> Result<Vec<Srgb<u8>>> {
        let pixels = self.pixels(PackedBuffer::downscale_par)?;
        Ok(dominant_colors_par(pixels.pixels(), self.k, &self.options))
    }

    /// Runs the pipeline and renders the extracted colors as a swatch.
    ///
    /// See [`compose_with_layout`] for the layout of the result.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimension`](crate::Error::InvalidDimension)
    /// if `swatch_size` is zero or the downscale size was set to `Some(0)`.
    pub fn swatch(&self, swatch_size: u32, layout: SwatchLayout) -> Result<PackedBuffer> {
        compose_with_layout(&self.palette()?, swatch_size, layout)
    }
}

#[cfg(feature = "image")]
impl From<&DynamicImage> for PalettePipeline<'static> {
    fn from(image: &DynamicImage) -> Self {
        Self::from_cow(Cow::Owned(PackedBuffer::from(image)))
    }
}
