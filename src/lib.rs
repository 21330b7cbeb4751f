//! A library for extracting the dominant colors of an image.
//!
//! `tinct` clusters the pixels of an image with k-means to find a small palette
//! of representative colors. Clustering can be performed directly on sRGB values
//! or in the perceptually uniform CIELAB color space.
//! Alongside that, `tinct` can resample images with nearest-neighbor or bilinear sampling
//! and render palettes as swatches of solid color blocks.
//!
//! # Features
//! To reduce dependencies and compile times, `tinct` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of most functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`PalettePipeline`].
//! Here is an example:
//! ```no_run
//! # use tinct::{PalettePipeline, ColorSpace, PaletteOrder, SwatchLayout};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?;
//!
//! let pipeline = PalettePipeline::from(&img)
//!     .palette_size(8) // set the number of colors in the palette
//!     .colorspace(ColorSpace::Lab) // use a more accurate color space
//!     .order(PaletteOrder::ByFrequency); // most common colors first
//!
//! // Run the pipeline in parallel to get the colors
//! let palette = pipeline.palette_par()?;
//!
//! // Or render them as a single row of 50x50 blocks
//! let swatch = image::DynamicImage::try_from(pipeline.swatch(50, SwatchLayout::Strip)?)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Low-Level API
//! Each step of the pipeline is also available on its own:
//! [`to_pixel_list`] and [`to_packed_buffer`] convert between raw buffers and pixels,
//! [`resample`] scales raw buffers, [`dominant_colors`] clusters pixels,
//! and [`compose`] renders colors. The [`kmeans`] module exposes the clustering itself.
//!
//! Note that some of the functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod colorspace;
mod convert;
mod extract;
mod resample;
mod swatch;
mod types;

pub mod kmeans;

pub use api::*;
pub use colorspace::{lab_to_rgb, rgb_to_lab, ColorSpace};
pub use convert::{to_packed_buffer, to_pixel_list};
pub use extract::{dominant_colors, PaletteOrder};
pub use resample::{fit_dimensions, resample, Sampler, DEFAULT_MAX_SIZE};
pub use swatch::{compose, compose_with_layout, SwatchLayout, DEFAULT_SWATCH_SIZE};
pub use types::*;

#[cfg(feature = "threads")]
pub use extract::dominant_colors_par;
#[cfg(feature = "threads")]
pub use resample::resample_par;
