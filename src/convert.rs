//! Conversions between [`PackedBuffer`]s and [`PixelList`]s.
//!
//! Alpha does not survive the round trip: converting to a [`PixelList`] drops it,
//! and converting back always produces fully opaque RGBA pixels.

use crate::{
    types::{check_channels, check_len},
    Error, PackedBuffer, PixelList, Result,
};
use palette::{
    cast::{self, ComponentsAs},
    Srgb, Srgba, WithAlpha,
};
#[cfg(feature = "image")]
use crate::types::buffer_len;
#[cfg(feature = "image")]
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// Converts an interleaved RGBA buffer into a [`PixelList`], discarding alpha.
///
/// Every pixel of the buffer is visited, so the result has exactly `width * height` pixels.
///
/// # Errors
/// Returns [`Error::LengthMismatch`] if `buffer.len() != width * height * 4`.
///
/// # Examples
/// ```
/// # use tinct::to_pixel_list;
/// # use palette::Srgb;
/// # fn main() -> tinct::Result<()> {
/// let buffer = [255, 0, 0, 255, 0, 255, 0, 128];
/// let pixels = to_pixel_list(&buffer, 2, 1)?;
/// assert_eq!(pixels.pixels(), &[Srgb::new(255, 0, 0), Srgb::new(0, 255, 0)]);
/// # Ok(())
/// # }
/// ```
pub fn to_pixel_list(buffer: &[u8], width: u32, height: u32) -> Result<PixelList> {
    check_len(width, height, 4, buffer.len())?;
    Ok(PixelList::new_unchecked(rgb_from_channels(buffer, 4), width, height))
}

/// Converts a [`PixelList`] into an interleaved RGBA [`PackedBuffer`] with opaque alpha.
#[must_use]
pub fn to_packed_buffer(pixels: &PixelList) -> PackedBuffer {
    let rgba = pixels
        .pixels()
        .iter()
        .map(|srgb| srgb.with_alpha(u8::MAX))
        .collect::<Vec<Srgba<u8>>>();

    PackedBuffer::new_rgba_unchecked(
        cast::into_component_vec(rgba),
        pixels.width(),
        pixels.height(),
    )
}

/// Reads one RGB color per pixel from a buffer with the given (valid) channel count.
///
/// Gray channels are replicated to RGB and alpha channels are dropped.
fn rgb_from_channels(buffer: &[u8], channels: usize) -> Vec<Srgb<u8>> {
    match channels {
        3 => {
            let rgb: &[Srgb<u8>] = buffer.components_as();
            rgb.to_vec()
        }
        4 => {
            let rgba: &[Srgba<u8>] = buffer.components_as();
            rgba.iter().map(|c| c.color).collect()
        }
        _ => buffer
            .chunks_exact(channels)
            .map(|pixel| Srgb::new(pixel[0], pixel[0], pixel[0]))
            .collect(),
    }
}

impl TryFrom<&PackedBuffer> for PixelList {
    type Error = Error;

    fn try_from(buffer: &PackedBuffer) -> Result<Self> {
        let channels = check_channels(buffer.channels())?;
        Ok(Self::new_unchecked(
            rgb_from_channels(buffer.as_bytes(), channels),
            buffer.width(),
            buffer.height(),
        ))
    }
}

impl From<&PixelList> for PackedBuffer {
    fn from(pixels: &PixelList) -> Self {
        to_packed_buffer(pixels)
    }
}

#[cfg(feature = "image")]
impl From<&DynamicImage> for PackedBuffer {
    fn from(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        Self::new_rgba_unchecked(image.to_rgba8().into_raw(), width, height)
    }
}

#[cfg(feature = "image")]
impl TryFrom<PackedBuffer> for DynamicImage {
    type Error = Error;

    fn try_from(buffer: PackedBuffer) -> Result<Self> {
        let (width, height, channels) = (buffer.width(), buffer.height(), buffer.channels());
        let expected = buffer_len(width, height, usize::from(channels))?;
        let actual = buffer.as_bytes().len();
        let bytes = buffer.into_bytes();

        let image = match channels {
            1 => GrayImage::from_raw(width, height, bytes).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(width, height, bytes).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgba8),
            _ => return Err(Error::InvalidChannelCount(channels)),
        };

        image.ok_or(Error::LengthMismatch { expected, actual })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn pixels_to_buffer() {
        let pixels = PixelList::new(
            vec![Srgb::new(255, 0, 0), Srgb::new(0, 255, 0), Srgb::new(0, 0, 255)],
            3,
            1,
        )
        .unwrap();

        let buffer = to_packed_buffer(&pixels);
        assert_eq!(
            buffer.as_bytes(),
            &[255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255]
        );
        assert_eq!((buffer.width(), buffer.height(), buffer.channels()), (3, 1, 4));
    }

    #[test]
    fn buffer_to_pixels_covers_every_pixel() {
        let (width, height) = (7, 5);
        let colors = test_colors(width as usize * height as usize);
        let buffer = colors
            .iter()
            .flat_map(|c| [c.red, c.green, c.blue, 17])
            .collect::<Vec<_>>();

        let pixels = to_pixel_list(&buffer, width, height).unwrap();
        assert_eq!(pixels.len(), 35);
        assert_eq!(pixels.pixels(), colors.as_slice());
    }

    #[test]
    fn round_trip_forces_opaque_alpha() {
        let colors = test_colors(64);
        let buffer = colors
            .iter()
            .flat_map(|c| [c.red, c.green, c.blue, 0])
            .collect::<Vec<_>>();

        let round_trip = to_packed_buffer(&to_pixel_list(&buffer, 8, 8).unwrap());

        let expected = colors
            .iter()
            .flat_map(|c| [c.red, c.green, c.blue, 255])
            .collect::<Vec<_>>();
        assert_eq!(round_trip.into_bytes(), expected);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert_eq!(
            to_pixel_list(&[0; 15], 2, 2),
            Err(Error::LengthMismatch { expected: 16, actual: 15 })
        );
        assert_eq!(
            to_pixel_list(&[0; 20], 2, 2),
            Err(Error::LengthMismatch { expected: 16, actual: 20 })
        );
    }

    #[test]
    fn empty_buffer() {
        let pixels = to_pixel_list(&[], 0, 0).unwrap();
        assert!(pixels.is_empty());
        assert!(to_packed_buffer(&pixels).is_empty());
    }

    #[test]
    fn any_channel_count() {
        let gray = PackedBuffer::new(vec![10, 20], 2, 1, 1).unwrap();
        let pixels = PixelList::try_from(&gray).unwrap();
        assert_eq!(pixels.pixels(), &[Srgb::new(10, 10, 10), Srgb::new(20, 20, 20)]);

        let gray_alpha = PackedBuffer::new(vec![10, 0, 20, 255], 1, 2, 2).unwrap();
        let pixels = PixelList::try_from(&gray_alpha).unwrap();
        assert_eq!(pixels.pixels(), &[Srgb::new(10, 10, 10), Srgb::new(20, 20, 20)]);
        assert_eq!((pixels.width(), pixels.height()), (1, 2));

        let rgb = PackedBuffer::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 3).unwrap();
        let pixels = PixelList::try_from(&rgb).unwrap();
        assert_eq!(pixels.pixels(), &[Srgb::new(1, 2, 3), Srgb::new(4, 5, 6)]);

        let rgba = PackedBuffer::new(vec![1, 2, 3, 4, 5, 6, 7, 8], 2, 1, 4).unwrap();
        let pixels = PixelList::try_from(&rgba).unwrap();
        assert_eq!(pixels.pixels(), &[Srgb::new(1, 2, 3), Srgb::new(5, 6, 7)]);
    }

    #[test]
    #[cfg(feature = "image")]
    fn image_round_trip() {
        let rgb = PackedBuffer::new((0..24).collect(), 4, 2, 3).unwrap();
        let image = DynamicImage::try_from(rgb.clone()).unwrap();
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
        assert_eq!((image.width(), image.height()), (4, 2));

        let rgba = PackedBuffer::from(&image);
        assert_eq!(rgba.channels(), 4);
        let expected = rgb
            .as_bytes()
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect::<Vec<_>>();
        assert_eq!(rgba.as_bytes(), expected.as_slice());
    }
}
