#![allow(dead_code)]

use std::sync::OnceLock;

use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use tinct::{kmeans::Point, ColorSpace, PackedBuffer, PixelList, DEFAULT_MAX_SIZE};

pub const IMAGE_SIZES: [(u32, u32); 3] = [(640, 480), (1280, 853), (1920, 1080)];

/// Creates an RGBA image of smooth gradients with a little noise on top,
/// which clusters more like a photo than uniform noise does.
pub fn synthetic_image(width: u32, height: u32, seed: u64) -> PackedBuffer {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let mut buffer = Vec::with_capacity(width as usize * height as usize * 4);

    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 255 / (width + height).max(1)) as u8;
            let noise = |c: u8, rng: &mut Xoroshiro128PlusPlus| c.saturating_add(rng.gen_range(0..16));
            buffer.extend([noise(r, &mut rng), noise(g, &mut rng), noise(b, &mut rng), u8::MAX]);
        }
    }

    PackedBuffer::new(buffer, width, height, 4).unwrap()
}

pub fn load_synthetic_images() -> Vec<(String, PackedBuffer)> {
    IMAGE_SIZES
        .iter()
        .zip(0..)
        .map(|(&(width, height), seed)| {
            (format!("{width}x{height}"), synthetic_image(width, height, seed))
        })
        .collect()
}

static SYNTHETIC_IMAGES: OnceLock<Vec<(String, PackedBuffer)>> = OnceLock::new();

pub fn synthetic_images() -> &'static [(String, PackedBuffer)] {
    SYNTHETIC_IMAGES.get_or_init(load_synthetic_images)
}

/// Downscales each image the way the palette pipeline does by default and returns its pixels.
pub fn to_downscaled_pixels(images: &[(String, PackedBuffer)]) -> Vec<(String, Vec<Srgb<u8>>)> {
    images
        .iter()
        .map(|(name, image)| {
            let small = image.downscale_par(DEFAULT_MAX_SIZE, Default::default()).unwrap();
            (name.clone(), PixelList::try_from(&small).unwrap().into_pixels())
        })
        .collect()
}

pub fn to_points(
    pixels: &[(String, Vec<Srgb<u8>>)],
    colorspace: ColorSpace,
) -> Vec<(String, Vec<Point>)> {
    pixels
        .iter()
        .map(|(name, pixels)| {
            (name.clone(), pixels.iter().map(|&c| colorspace.to_point(c)).collect())
        })
        .collect()
}
