//! Renders a list of colors as solid square blocks for visual inspection.

use crate::{types::buffer_len, Error, PackedBuffer, Result};
use palette::{cast, Srgb};

/// The default side length in pixels of each color block.
pub const DEFAULT_SWATCH_SIZE: u32 = 50;

/// How color blocks are arranged in a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwatchLayout {
    /// A grid with `ceil(sqrt(n))` columns, filled row by row.
    /// Cells after the last color are left fully transparent.
    #[default]
    Grid,
    /// A single row of `n` blocks.
    Strip,
}

impl SwatchLayout {
    /// The number of blocks per row for `n` colors.
    fn columns(self, n: usize) -> usize {
        match self {
            SwatchLayout::Grid => ceil_sqrt(n),
            SwatchLayout::Strip => n,
        }
    }
}

/// The smallest `c` such that `c * c >= n`.
fn ceil_sqrt(n: usize) -> usize {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let mut c = (n as f64).sqrt().ceil() as usize;
    // correct for float rounding on large inputs
    while c * c < n {
        c += 1;
    }
    while c > 0 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c
}

/// Lays out `colors` as a grid of `swatch_size x swatch_size` blocks in an opaque RGBA buffer.
///
/// This is shorthand for [`compose_with_layout`] with [`SwatchLayout::Grid`].
///
/// # Errors
/// Returns [`Error::InvalidDimension`] if `swatch_size` is zero
/// or so large that the swatch does not fit in memory.
///
/// # Examples
/// ```
/// # use tinct::compose;
/// # use palette::Srgb;
/// # fn main() -> tinct::Result<()> {
/// let colors = [Srgb::new(255, 0, 0), Srgb::new(0, 255, 0), Srgb::new(0, 0, 255)];
/// let swatch = compose(&colors, 10)?;
/// assert_eq!((swatch.width(), swatch.height()), (20, 20));
/// assert_eq!(swatch.pixel(15, 5), &[0, 255, 0, 255]);
/// # Ok(())
/// # }
/// ```
pub fn compose(colors: &[Srgb<u8>], swatch_size: u32) -> Result<PackedBuffer> {
    compose_with_layout(colors, swatch_size, SwatchLayout::Grid)
}

/// Lays out `colors` as `swatch_size x swatch_size` blocks in an RGBA buffer
/// according to `layout`.
///
/// Blocks are opaque and fill rows left to right, top to bottom.
/// No colors result in an empty `0x0` buffer.
///
/// # Errors
/// Returns [`Error::InvalidDimension`] if `swatch_size` is zero
/// or so large that the swatch does not fit in memory.
pub fn compose_with_layout(
    colors: &[Srgb<u8>],
    swatch_size: u32,
    layout: SwatchLayout,
) -> Result<PackedBuffer> {
    let invalid_size = Error::InvalidDimension { what: "swatch size", value: swatch_size };
    if swatch_size == 0 {
        return Err(invalid_size);
    }

    let n = colors.len();
    if n == 0 {
        return Ok(PackedBuffer::empty(4));
    }

    let columns = layout.columns(n);
    let rows = n.div_ceil(columns);

    let dimension = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(swatch_size))
    };
    let (Some(width), Some(height)) = (dimension(columns), dimension(rows)) else {
        return Err(invalid_size);
    };
    let len = buffer_len(width, height, 4).map_err(|_| invalid_size)?;

    let block = swatch_size as usize;
    let stride = width as usize * 4;
    let mut buffer = vec![0; len];

    for (i, &color) in colors.iter().enumerate() {
        let [r, g, b] = cast::into_array(color);
        let pixel = [r, g, b, u8::MAX];

        let (x, y) = ((i % columns) * block, (i / columns) * block);
        for row in buffer.chunks_exact_mut(stride).skip(y).take(block) {
            for dst in row[(x * 4)..((x + block) * 4)].chunks_exact_mut(4) {
                dst.copy_from_slice(&pixel);
            }
        }
    }

    Ok(PackedBuffer::new_rgba_unchecked(buffer, width, height))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    const RED: Srgb<u8> = Srgb::new(255, 0, 0);
    const GREEN: Srgb<u8> = Srgb::new(0, 255, 0);
    const BLUE: Srgb<u8> = Srgb::new(0, 0, 255);

    #[test]
    fn ceil_sqrt_matches_definition() {
        for n in 0..10_000 {
            let c = ceil_sqrt(n);
            assert!(c * c >= n);
            assert!(c == 0 || (c - 1) * (c - 1) < n, "{n}: {c}");
        }
    }

    #[test]
    fn grid_dimensions() {
        for n in 1..=20 {
            let colors = test_colors(n);
            for size in [1, 3, DEFAULT_SWATCH_SIZE] {
                let swatch = compose(&colors, size).unwrap();
                let columns = ceil_sqrt(n);
                let rows = n.div_ceil(columns);
                assert_eq!(swatch.width() as usize, columns * size as usize);
                assert_eq!(swatch.height() as usize, rows * size as usize);
                assert_eq!(swatch.channels(), 4);
                assert_eq!(
                    swatch.as_bytes().len(),
                    swatch.width() as usize * swatch.height() as usize * 4
                );
            }
        }
    }

    #[test]
    fn grid_blocks() {
        let swatch = compose(&[RED, GREEN, BLUE], 2).unwrap();
        assert_eq!((swatch.width(), swatch.height()), (4, 4));

        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(swatch.pixel(x, y), &[255, 0, 0, 255]);
            assert_eq!(swatch.pixel(x + 2, y), &[0, 255, 0, 255]);
            assert_eq!(swatch.pixel(x, y + 2), &[0, 0, 255, 255]);
            assert_eq!(swatch.pixel(x + 2, y + 2), &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn strip_layout() {
        let swatch = compose_with_layout(&[RED, GREEN, BLUE], 5, SwatchLayout::Strip).unwrap();
        assert_eq!((swatch.width(), swatch.height()), (15, 5));
        assert_eq!(swatch.pixel(4, 4), &[255, 0, 0, 255]);
        assert_eq!(swatch.pixel(5, 0), &[0, 255, 0, 255]);
        assert_eq!(swatch.pixel(14, 2), &[0, 0, 255, 255]);
    }

    #[test]
    fn no_colors() {
        for layout in [SwatchLayout::Grid, SwatchLayout::Strip] {
            let swatch = compose_with_layout(&[], 10, layout).unwrap();
            assert!(swatch.is_empty());
            assert_eq!((swatch.width(), swatch.height()), (0, 0));
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            compose(&[RED], 0),
            Err(Error::InvalidDimension { what: "swatch size", value: 0 })
        );
    }

    #[test]
    fn oversized_swatch_is_rejected() {
        let too_large = Err(Error::InvalidDimension { what: "swatch size", value: u32::MAX });
        assert_eq!(compose(&[RED, GREEN], u32::MAX), too_large);
        assert_eq!(compose_with_layout(&[RED, GREEN], u32::MAX, SwatchLayout::Strip), too_large);

        let size = 1 << 31;
        assert_eq!(
            compose_with_layout(&[RED], size, SwatchLayout::Strip),
            Err(Error::InvalidDimension { what: "swatch size", value: size })
        );
    }
}
