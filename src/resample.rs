//! Nearest-neighbor and bilinear resampling of packed pixel buffers.
//!
//! Both samplers map destination pixel `(x, y)` to the source position
//! `(x * src_width / dst_width, y * src_height / dst_height)`, using independent scale factors
//! for each axis. Channels are processed independently, so alpha (if any) is resampled
//! exactly like the color channels.
//!
//! A zero source or destination dimension results in an empty output buffer.

use crate::{
    colorspace::to_u8,
    types::{buffer_len, check_channels, check_len},
    Error, PackedBuffer, Result,
};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The default bound used by [`PackedBuffer::downscale`] callers that have no preference.
pub const DEFAULT_MAX_SIZE: u32 = 256;

/// The strategy used to compute each destination pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sampler {
    /// Copies the single source pixel the destination pixel maps onto.
    #[default]
    Nearest,
    /// Blends the four source pixels surrounding the mapped position,
    /// rounding and clamping the result to a byte.
    Bilinear,
}

/// One destination coordinate mapped onto a source axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    /// The source coordinate at or before the mapped position.
    lo: usize,
    /// The source coordinate at or after the mapped position, clamped to the axis.
    hi: usize,
    /// The weight of `hi`, the distance of the mapped position from `lo`.
    frac: f64,
}

impl Sampler {
    /// Maps each coordinate of a destination axis onto the source axis.
    fn taps(self, src_len: usize, dst_len: usize) -> Vec<Tap> {
        let last = src_len - 1;
        (0..dst_len)
            .map(|i| match self {
                Sampler::Nearest => {
                    #[allow(clippy::cast_possible_truncation)]
                    let lo = ((i as u64 * src_len as u64) / dst_len as u64) as usize;
                    let lo = lo.min(last);
                    Tap { lo, hi: lo, frac: 0.0 }
                }
                Sampler::Bilinear => {
                    #[allow(clippy::cast_precision_loss)]
                    let pos = i as f64 * src_len as f64 / dst_len as f64;
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let lo = (pos.floor() as usize).min(last);
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let hi = (pos.ceil() as usize).min(last);
                    #[allow(clippy::cast_precision_loss)]
                    let frac = pos - lo as f64;
                    Tap { lo, hi, frac }
                }
            })
            .collect()
    }
}

/// A validated resampling job.
struct Resample<'a> {
    src: &'a [u8],
    src_width: usize,
    channels: usize,
    dst_width: usize,
    dst_len: usize,
    sampler: Sampler,
    columns: Vec<Tap>,
    rows: Vec<Tap>,
}

impl<'a> Resample<'a> {
    /// Plans a resampling job, returning `None` if the output is empty.
    ///
    /// The source buffer must already be known to have the right length.
    ///
    /// # Errors
    /// Returns [`Error::TooLarge`] if the output length overflows a `usize`.
    fn new(
        src: &'a [u8],
        (src_width, src_height): (u32, u32),
        channels: usize,
        (dst_width, dst_height): (u32, u32),
        sampler: Sampler,
    ) -> Result<Option<Self>> {
        log::trace!(
            "resampling {src_width}x{src_height} to {dst_width}x{dst_height} ({sampler:?}, {channels} channels)"
        );

        let dst_len = buffer_len(dst_width, dst_height, channels)?;
        if src_width == 0 || src_height == 0 || dst_len == 0 {
            return Ok(None);
        }

        let (src_width, src_height) = (src_width as usize, src_height as usize);
        let (dst_width, dst_height) = (dst_width as usize, dst_height as usize);

        Ok(Some(Self {
            src,
            src_width,
            channels,
            dst_width,
            dst_len,
            sampler,
            columns: sampler.taps(src_width, dst_width),
            rows: sampler.taps(src_height, dst_height),
        }))
    }

    /// The length of one destination row in bytes.
    fn row_len(&self) -> usize {
        self.dst_width * self.channels
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        (y * self.src_width + x) * self.channels
    }

    /// Fills one destination row.
    fn row(&self, y: usize, out: &mut [u8]) {
        let Self { src, channels, sampler, .. } = *self;
        let row = self.rows[y];

        for (pixel, &column) in out.chunks_exact_mut(channels).zip(&self.columns) {
            match sampler {
                Sampler::Nearest => {
                    let i = self.index(column.lo, row.lo);
                    pixel.copy_from_slice(&src[i..(i + channels)]);
                }
                Sampler::Bilinear => {
                    let (dx, dy) = (column.frac, row.frac);
                    let i11 = self.index(column.lo, row.lo);
                    let i12 = self.index(column.lo, row.hi);
                    let i21 = self.index(column.hi, row.lo);
                    let i22 = self.index(column.hi, row.hi);

                    for (c, value) in pixel.iter_mut().enumerate() {
                        let blended = f64::from(src[i11 + c]) * (1.0 - dx) * (1.0 - dy)
                            + f64::from(src[i12 + c]) * (1.0 - dx) * dy
                            + f64::from(src[i21 + c]) * dx * (1.0 - dy)
                            + f64::from(src[i22 + c]) * dx * dy;

                        *value = to_u8(blended);
                    }
                }
            }
        }
    }

    fn run(&self) -> Vec<u8> {
        let row_len = self.row_len();
        let mut dst = vec![0; self.dst_len];
        for (y, row) in dst.chunks_exact_mut(row_len).enumerate() {
            self.row(y, row);
        }
        dst
    }

    #[cfg(feature = "threads")]
    fn run_par(&self) -> Vec<u8> {
        let row_len = self.row_len();
        let mut dst = vec![0; self.dst_len];
        dst.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| self.row(y, row));
        dst
    }
}

/// Checks the inputs common to [`resample`] and [`resample_par`].
fn validate(buffer: &[u8], src_width: u32, src_height: u32, channels: u8) -> Result<usize> {
    let channels = check_channels(channels)?;
    check_len(src_width, src_height, channels, buffer.len())?;
    Ok(channels)
}

/// Resamples an interleaved buffer with `channels` channels per pixel to `dst_width x dst_height`.
///
/// The output has length `dst_width * dst_height * channels`, or is empty if any
/// source or destination dimension is zero.
///
/// # Errors
/// Returns [`Error::InvalidChannelCount`] if `channels` is not in `1..=4`,
/// [`Error::LengthMismatch`] if `buffer.len() != src_width * src_height * channels`,
/// and [`Error::TooLarge`] if the length of either buffer overflows a `usize`.
///
/// # Examples
/// ```
/// # use tinct::{resample, Sampler};
/// # fn main() -> tinct::Result<()> {
/// let gray = [0, 100];
/// assert_eq!(resample(&gray, 2, 1, 1, 4, 1, Sampler::Nearest)?, [0, 0, 100, 100]);
/// assert_eq!(resample(&gray, 2, 1, 1, 4, 1, Sampler::Bilinear)?, [0, 50, 100, 100]);
/// # Ok(())
/// # }
/// ```
pub fn resample(
    buffer: &[u8],
    src_width: u32,
    src_height: u32,
    channels: u8,
    dst_width: u32,
    dst_height: u32,
    sampler: Sampler,
) -> Result<Vec<u8>> {
    let channels = validate(buffer, src_width, src_height, channels)?;
    let job = Resample::new(
        buffer,
        (src_width, src_height),
        channels,
        (dst_width, dst_height),
        sampler,
    )?;
    Ok(job.map_or_else(Vec::new, |job| job.run()))
}

/// Resamples an interleaved buffer in parallel, processing rows independently.
///
/// The output is identical to [`resample`].
///
/// # Errors
/// See [`resample`].
#[cfg(feature = "threads")]
pub fn resample_par(
    buffer: &[u8],
    src_width: u32,
    src_height: u32,
    channels: u8,
    dst_width: u32,
    dst_height: u32,
    sampler: Sampler,
) -> Result<Vec<u8>> {
    let channels = validate(buffer, src_width, src_height, channels)?;
    let job = Resample::new(
        buffer,
        (src_width, src_height),
        channels,
        (dst_width, dst_height),
        sampler,
    )?;
    Ok(job.map_or_else(Vec::new, |job| job.run_par()))
}

/// Computes the dimensions of an image scaled so that its longer side is `max_size`,
/// preserving the aspect ratio.
///
/// Images that already fit are left unchanged, and no side is scaled below `1` pixel.
///
/// # Errors
/// Returns [`Error::InvalidDimension`] if `max_size` is zero.
///
/// # Examples
/// ```
/// # use tinct::fit_dimensions;
/// # fn main() -> tinct::Result<()> {
/// assert_eq!(fit_dimensions(1024, 512, 256)?, (256, 128));
/// assert_eq!(fit_dimensions(100, 50, 256)?, (100, 50));
/// # Ok(())
/// # }
/// ```
pub fn fit_dimensions(width: u32, height: u32, max_size: u32) -> Result<(u32, u32)> {
    if max_size == 0 {
        return Err(Error::InvalidDimension { what: "max size", value: max_size });
    }

    let longer = width.max(height);
    if longer <= max_size {
        return Ok((width, height));
    }

    #[allow(clippy::cast_possible_truncation)]
    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_size) / u64::from(longer);
        (scaled as u32).max(1)
    };

    Ok((scale(width), scale(height)))
}

impl PackedBuffer {
    /// Resamples this image to `width x height`, keeping its channel count.
    ///
    /// See [`resample`] for more details.
    ///
    /// # Errors
    /// Returns [`Error::TooLarge`] if the output length overflows a `usize`.
    pub fn resample(&self, width: u32, height: u32, sampler: Sampler) -> Result<Self> {
        self.resample_with(width, height, sampler, |job| job.run())
    }

    /// Resamples this image to `width x height` in parallel.
    ///
    /// See [`resample_par`] for more details.
    ///
    /// # Errors
    /// Returns [`Error::TooLarge`] if the output length overflows a `usize`.
    #[cfg(feature = "threads")]
    pub fn resample_par(&self, width: u32, height: u32, sampler: Sampler) -> Result<Self> {
        self.resample_with(width, height, sampler, |job| job.run_par())
    }

    /// Shrinks this image so that its longer side is at most `max_size`,
    /// preserving the aspect ratio.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimension`] if `max_size` is zero.
    pub fn downscale(&self, max_size: u32, sampler: Sampler) -> Result<Self> {
        let (width, height) = fit_dimensions(self.width(), self.height(), max_size)?;
        self.resample(width, height, sampler)
    }

    /// Shrinks this image in parallel so that its longer side is at most `max_size`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimension`] if `max_size` is zero.
    #[cfg(feature = "threads")]
    pub fn downscale_par(&self, max_size: u32, sampler: Sampler) -> Result<Self> {
        let (width, height) = fit_dimensions(self.width(), self.height(), max_size)?;
        self.resample_par(width, height, sampler)
    }

    fn resample_with(
        &self,
        width: u32,
        height: u32,
        sampler: Sampler,
        run: impl FnOnce(&Resample<'_>) -> Vec<u8>,
    ) -> Result<Self> {
        let channels = self.channels();
        let job = Resample::new(
            self.as_bytes(),
            (self.width(), self.height()),
            usize::from(channels),
            (width, height),
            sampler,
        )?;

        Ok(match job {
            Some(job) => Self::new_unchecked(run(&job), width, height, channels),
            None => Self::empty(channels),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    const SAMPLERS: [Sampler; 2] = [Sampler::Nearest, Sampler::Bilinear];

    #[rustfmt::skip]
    const IMAGE_3X3: [u8; 27] = [
        255, 0, 0,     0, 255, 0,     0, 0, 255,
        255, 255, 0,   0, 255, 255,   0, 0, 255,
        255, 0, 255,   0, 255, 255,   255, 0, 0,
    ];

    #[test]
    fn same_size_is_identity() {
        for channels in 1..=4 {
            let (width, height) = (13, 7);
            let image = test_bytes(width as usize * height as usize * usize::from(channels));
            for sampler in SAMPLERS {
                let actual = resample(&image, width, height, channels, width, height, sampler);
                assert_eq!(actual.unwrap(), image, "{sampler:?} with {channels} channels");
            }
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        for sampler in SAMPLERS {
            assert!(resample(&[], 0, 0, 3, 6, 6, sampler).unwrap().is_empty());
            assert!(resample(&[], 0, 5, 3, 6, 6, sampler).unwrap().is_empty());
        }
    }

    #[test]
    fn empty_target_gives_empty_output() {
        for sampler in SAMPLERS {
            assert!(resample(&IMAGE_3X3, 3, 3, 3, 0, 0, sampler).unwrap().is_empty());
            assert!(resample(&IMAGE_3X3, 3, 3, 3, 0, 4, sampler).unwrap().is_empty());
            assert!(resample(&IMAGE_3X3, 3, 3, 3, 4, 0, sampler).unwrap().is_empty());
        }
    }

    #[test]
    fn one_by_one_takes_first_pixel() {
        for sampler in SAMPLERS {
            let actual = resample(&IMAGE_3X3, 3, 3, 3, 1, 1, sampler).unwrap();
            assert_eq!(actual, [255, 0, 0]);
        }
    }

    #[test]
    fn nearest_upscale_duplicates_pixels() {
        let actual = resample(&IMAGE_3X3, 3, 3, 3, 6, 6, Sampler::Nearest).unwrap();
        assert_eq!(actual.len(), 6 * 6 * 3);

        for y in 0..6 {
            for x in 0..6 {
                let dst = (y * 6 + x) * 3;
                let src = ((y / 2) * 3 + x / 2) * 3;
                assert_eq!(actual[dst..(dst + 3)], IMAGE_3X3[src..(src + 3)], "({x}, {y})");
            }
        }
    }

    #[test]
    fn nearest_downscale() {
        // scale = 2/3, so destination 1 maps onto floor(1.5) = 1
        let actual = resample(&IMAGE_3X3, 3, 3, 3, 2, 2, Sampler::Nearest).unwrap();
        #[rustfmt::skip]
        let expected = [
            255, 0, 0,     0, 255, 0,
            255, 255, 0,   0, 255, 255,
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn bilinear_interpolates_between_neighbors() {
        let gray = [0, 100, 200, 40];
        let actual = resample(&gray, 2, 2, 1, 4, 4, Sampler::Bilinear).unwrap();
        #[rustfmt::skip]
        let expected = [
              0,  50, 100, 100,
            100,  85,  70,  70,
            200, 120,  40,  40,
            200, 120,  40,  40,
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn bilinear_resamples_alpha_like_color() {
        let rgba = [0, 0, 0, 0, 255, 255, 255, 255];
        let actual = resample(&rgba, 2, 1, 4, 4, 1, Sampler::Bilinear).unwrap();
        #[rustfmt::skip]
        let expected = [
            0, 0, 0, 0,
            128, 128, 128, 128,
            255, 255, 255, 255,
            255, 255, 255, 255,
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn output_length() {
        for channels in 1..=4 {
            for sampler in SAMPLERS {
                let image = test_bytes(5 * 9 * usize::from(channels));
                let actual = resample(&image, 5, 9, channels, 11, 3, sampler).unwrap();
                assert_eq!(actual.len(), 11 * 3 * usize::from(channels));
            }
        }
    }

    #[test]
    fn invalid_input() {
        assert_eq!(
            resample(&IMAGE_3X3, 3, 3, 5, 1, 1, Sampler::Nearest),
            Err(Error::InvalidChannelCount(5))
        );
        assert_eq!(
            resample(&IMAGE_3X3[1..], 3, 3, 3, 1, 1, Sampler::Nearest),
            Err(Error::LengthMismatch { expected: 27, actual: 26 })
        );
    }

    #[test]
    fn overflowing_target_is_rejected() {
        for sampler in SAMPLERS {
            assert_eq!(
                resample(&IMAGE_3X3, 3, 3, 3, u32::MAX, u32::MAX, sampler),
                Err(Error::TooLarge { width: u32::MAX, height: u32::MAX, channels: 3 })
            );
        }

        let image = PackedBuffer::new(IMAGE_3X3.to_vec(), 3, 3, 3).unwrap();
        assert_eq!(
            image.resample(u32::MAX, u32::MAX, Sampler::Nearest),
            Err(Error::TooLarge { width: u32::MAX, height: u32::MAX, channels: 3 })
        );
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        assert_eq!(fit_dimensions(1000, 500, 256).unwrap(), (256, 128));
        assert_eq!(fit_dimensions(500, 1000, 256).unwrap(), (128, 256));
        assert_eq!(fit_dimensions(300, 300, 256).unwrap(), (256, 256));
        assert_eq!(fit_dimensions(10_000, 1, 256).unwrap(), (256, 1));
        assert_eq!(fit_dimensions(256, 100, 256).unwrap(), (256, 100));
        assert_eq!(fit_dimensions(0, 0, 256).unwrap(), (0, 0));
        assert_eq!(
            fit_dimensions(10, 10, 0),
            Err(Error::InvalidDimension { what: "max size", value: 0 })
        );
    }

    #[test]
    fn downscale_packed_buffer() {
        let image = PackedBuffer::new(test_bytes(600 * 300 * 4), 600, 300, 4).unwrap();
        let small = image.downscale(DEFAULT_MAX_SIZE, Sampler::Bilinear).unwrap();
        assert_eq!((small.width(), small.height(), small.channels()), (256, 128, 4));
        assert_eq!(small.as_bytes().len(), 256 * 128 * 4);
        assert_eq!(small.pixel(0, 0), image.pixel(0, 0));

        let same = image.downscale(1000, Sampler::Nearest).unwrap();
        assert_eq!(same, image);
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        for channels in 1..=4 {
            let image = test_bytes(37 * 23 * usize::from(channels));
            for sampler in SAMPLERS {
                for (width, height) in [(1, 1), (16, 9), (37, 23), (80, 51)] {
                    let single = resample(&image, 37, 23, channels, width, height, sampler);
                    let par = resample_par(&image, 37, 23, channels, width, height, sampler);
                    assert_eq!(single.unwrap(), par.unwrap());
                }
            }
        }
    }
}
