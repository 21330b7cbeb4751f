//! Contains various types needed across the crate.

use palette::Srgb;
use thiserror::Error;

/// The error type for operations that validate their input dimensions or buffers.
///
/// All errors are reported to the immediate caller and never retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A dimension that must be positive for the output to be well defined was zero.
    #[error("{what} must be positive, got {value}")]
    InvalidDimension {
        /// The name of the offending parameter.
        what: &'static str,
        /// The value that was provided.
        value: u32,
    },
    /// The number of channels per pixel was not in `1..=4`.
    #[error("channel count must be between 1 and 4, got {0}")]
    InvalidChannelCount(u8),
    /// The length of a buffer does not agree with its declared dimensions.
    #[error("expected a buffer of length {expected}, got {actual}")]
    LengthMismatch {
        /// The length implied by the width, height, and channel count.
        expected: usize,
        /// The actual length of the buffer.
        actual: usize,
    },
    /// The number of bytes needed for an image with the given dimensions does not fit in a `usize`.
    #[error("a {width}x{height} image with {channels} channels is too large")]
    TooLarge {
        /// The width of the image in pixels.
        width: u32,
        /// The height of the image in pixels.
        height: u32,
        /// The number of channels per pixel.
        channels: usize,
    },
}

/// A specialized [`Result`](std::result::Result) with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns `Ok(channels)` if `channels` is a supported channel count.
pub(crate) fn check_channels(channels: u8) -> Result<usize> {
    if (1..=MAX_CHANNELS).contains(&channels) {
        Ok(usize::from(channels))
    } else {
        Err(Error::InvalidChannelCount(channels))
    }
}

/// Returns `width * height * channels`, the length of a buffer with the given dimensions.
pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or(Error::TooLarge { width, height, channels })
}

/// Checks that `actual` is the buffer length implied by the given dimensions.
pub(crate) fn check_len(width: u32, height: u32, channels: usize, actual: usize) -> Result<()> {
    let expected = buffer_len(width, height, channels)?;
    if expected == actual {
        Ok(())
    } else {
        Err(Error::LengthMismatch { expected, actual })
    }
}

/// The maximum number of interleaved channels per pixel.
pub const MAX_CHANNELS: u8 = 4;

/// A flat byte buffer holding interleaved 8-bit channels in row-major order
/// (left to right, top to bottom).
///
/// The length of `buffer` is always `width * height * channels`,
/// and `channels` is always in `1..=4`.
///
/// # Examples
/// ```
/// # use tinct::PackedBuffer;
/// # fn main() -> tinct::Result<()> {
/// let red = PackedBuffer::new(vec![255, 0, 0, 255], 1, 1, 4)?;
/// assert_eq!(red.pixel(0, 0), &[255, 0, 0, 255]);
///
/// assert!(PackedBuffer::new(vec![255, 0, 0], 1, 1, 4).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedBuffer {
    /// The interleaved channel data.
    buffer: Vec<u8>,
    /// The width of the image in pixels.
    width: u32,
    /// The height of the image in pixels.
    height: u32,
    /// The number of channels per pixel.
    channels: u8,
}

impl PackedBuffer {
    /// Creates a new [`PackedBuffer`], checking the channel count and the buffer length.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChannelCount`] if `channels` is not in `1..=4`,
    /// [`Error::TooLarge`] if `width * height * channels` overflows a `usize`,
    /// and [`Error::LengthMismatch`] if `buffer.len() != width * height * channels`.
    pub fn new(buffer: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self> {
        let n = check_channels(channels)?;
        check_len(width, height, n, buffer.len())?;
        Ok(Self { buffer, width, height, channels })
    }

    /// Creates a [`PackedBuffer`] without checking the channel count or the buffer length.
    pub(crate) const fn new_unchecked(
        buffer: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Self {
        Self { buffer, width, height, channels }
    }

    /// Creates a 4-channel [`PackedBuffer`] without checking the buffer length.
    pub(crate) const fn new_rgba_unchecked(buffer: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new_unchecked(buffer, width, height, 4)
    }

    /// An empty `0x0` buffer with the given number of channels.
    pub(crate) const fn empty(channels: u8) -> Self {
        Self::new_unchecked(Vec::new(), 0, 0, channels)
    }

    /// The width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The number of channels per pixel.
    #[must_use]
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    /// Whether the image contains no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The raw channel data.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the buffer, returning the raw channel data.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Returns the channels of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) is out of bounds");
        let channels = usize::from(self.channels);
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &self.buffer[start..(start + channels)]
    }
}

impl AsRef<[u8]> for PackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl From<PackedBuffer> for Vec<u8> {
    fn from(value: PackedBuffer) -> Self {
        value.into_bytes()
    }
}

/// A list of RGB pixels alongside the dimensions of the image they came from.
///
/// The number of pixels is always `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelList {
    /// The pixels in row-major order.
    pixels: Vec<Srgb<u8>>,
    /// The width of the image in pixels.
    width: u32,
    /// The height of the image in pixels.
    height: u32,
}

impl PixelList {
    /// Creates a new [`PixelList`].
    ///
    /// # Errors
    /// Returns [`Error::TooLarge`] if `width * height` overflows a `usize`
    /// and [`Error::LengthMismatch`] if `pixels.len() != width * height`.
    pub fn new(pixels: Vec<Srgb<u8>>, width: u32, height: u32) -> Result<Self> {
        check_len(width, height, 1, pixels.len())?;
        Ok(Self { pixels, width, height })
    }

    /// Creates a [`PixelList`] without checking the number of pixels.
    pub(crate) const fn new_unchecked(pixels: Vec<Srgb<u8>>, width: u32, height: u32) -> Self {
        Self { pixels, width, height }
    }

    /// The width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Srgb<u8>] {
        &self.pixels
    }

    /// The number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the list contains no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Consumes the list, returning the pixels.
    #[must_use]
    pub fn into_pixels(self) -> Vec<Srgb<u8>> {
        self.pixels
    }
}

impl AsRef<[Srgb<u8>]> for PixelList {
    fn as_ref(&self) -> &[Srgb<u8>] {
        &self.pixels
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn packed_buffer_checks_length() {
        assert_eq!(
            PackedBuffer::new(vec![0; 11], 3, 1, 4),
            Err(Error::LengthMismatch { expected: 12, actual: 11 })
        );
        assert!(PackedBuffer::new(vec![0; 12], 3, 1, 4).is_ok());
        assert!(PackedBuffer::new(Vec::new(), 0, 0, 3).unwrap().is_empty());
    }

    #[test]
    fn packed_buffer_checks_channels() {
        assert_eq!(PackedBuffer::new(Vec::new(), 0, 0, 0), Err(Error::InvalidChannelCount(0)));
        assert_eq!(PackedBuffer::new(Vec::new(), 0, 0, 5), Err(Error::InvalidChannelCount(5)));
    }

    #[test]
    fn pixel_indexing_is_row_major() {
        let buffer = PackedBuffer::new((0..18).collect(), 3, 2, 3).unwrap();
        assert_eq!(buffer.pixel(0, 0), &[0, 1, 2]);
        assert_eq!(buffer.pixel(2, 0), &[6, 7, 8]);
        assert_eq!(buffer.pixel(0, 1), &[9, 10, 11]);
        assert_eq!(buffer.pixel(2, 1), &[15, 16, 17]);
    }

    #[test]
    fn pixel_list_checks_length() {
        let pixels = vec![Srgb::new(1, 2, 3); 5];
        assert_eq!(
            PixelList::new(pixels.clone(), 2, 3),
            Err(Error::LengthMismatch { expected: 6, actual: 5 })
        );
        assert_eq!(PixelList::new(pixels, 5, 1).unwrap().len(), 5);
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert_eq!(
            PackedBuffer::new(Vec::new(), u32::MAX, u32::MAX, 4),
            Err(Error::TooLarge { width: u32::MAX, height: u32::MAX, channels: 4 })
        );
        assert_eq!(
            PackedBuffer::new(Vec::new(), 1 << 31, 1 << 31, 4),
            Err(Error::TooLarge { width: 1 << 31, height: 1 << 31, channels: 4 })
        );
        assert_eq!(buffer_len(1 << 12, 1 << 12, 4), Ok(1 << 26));
    }

    #[test]
    fn error_messages() {
        let err = Error::InvalidDimension { what: "swatch size", value: 0 };
        assert_eq!(err.to_string(), "swatch size must be positive, got 0");
        let err = Error::LengthMismatch { expected: 12, actual: 11 };
        assert_eq!(err.to_string(), "expected a buffer of length 12, got 11");
        let err = Error::TooLarge { width: 3, height: 2, channels: 4 };
        assert_eq!(err.to_string(), "a 3x2 image with 4 channels is too large");
    }
}
