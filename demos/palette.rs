#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{error::Error, fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use image::DynamicImage;
use tinct::{
    kmeans::CentroidInit, ColorSpace, PackedBuffer, PaletteOrder, PalettePipeline, Sampler,
    SwatchLayout, DEFAULT_MAX_SIZE, DEFAULT_SWATCH_SIZE,
};

/// Implements `Display` with the names clap uses for each variant.
macro_rules! value_names {
    ($name: ident { $($variant: ident => $value: literal),+ $(,)? }) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", match self { $($name::$variant => $value),+ })
            }
        }
    };
}

#[derive(Copy, Clone, ValueEnum)]
enum CliColorSpace {
    Srgb,
    Lab,
}

value_names!(CliColorSpace { Srgb => "srgb", Lab => "lab" });

impl From<CliColorSpace> for ColorSpace {
    fn from(value: CliColorSpace) -> Self {
        match value {
            CliColorSpace::Srgb => ColorSpace::Srgb,
            CliColorSpace::Lab => ColorSpace::Lab,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CliInit {
    Random,
    PlusPlus,
    Farthest,
}

value_names!(CliInit { Random => "random", PlusPlus => "plus-plus", Farthest => "farthest" });

impl From<CliInit> for CentroidInit {
    fn from(value: CliInit) -> Self {
        match value {
            CliInit::Random => CentroidInit::Random,
            CliInit::PlusPlus => CentroidInit::PlusPlus,
            CliInit::Farthest => CentroidInit::FarthestPoint,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CliSampler {
    Nearest,
    Bilinear,
}

value_names!(CliSampler { Nearest => "nearest", Bilinear => "bilinear" });

impl From<CliSampler> for Sampler {
    fn from(value: CliSampler) -> Self {
        match value {
            CliSampler::Nearest => Sampler::Nearest,
            CliSampler::Bilinear => Sampler::Bilinear,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CliLayout {
    Grid,
    Strip,
}

value_names!(CliLayout { Grid => "grid", Strip => "strip" });

impl From<CliLayout> for SwatchLayout {
    fn from(value: CliLayout) -> Self {
        match value {
            CliLayout::Grid => SwatchLayout::Grid,
            CliLayout::Strip => SwatchLayout::Strip,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Prints the dominant colors of an image and optionally writes them as a swatch.
    Palette {
        input: PathBuf,

        #[arg(short, long, default_value_t = PalettePipeline::DEFAULT_PALETTE_SIZE)]
        k: usize,

        #[arg(long, default_value_t = CliColorSpace::Srgb)]
        colorspace: CliColorSpace,

        #[arg(long, default_value_t = CliInit::PlusPlus)]
        init: CliInit,

        #[arg(long)]
        by_frequency: bool,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
        max_size: u32,

        /// Cluster every pixel of the image instead of a downscaled copy.
        #[arg(long)]
        full_size: bool,

        #[arg(long, default_value_t = CliSampler::Nearest)]
        sampler: CliSampler,

        /// Where to write the swatch image.
        #[arg(short, long)]
        swatch: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_SWATCH_SIZE)]
        swatch_size: u32,

        #[arg(long, default_value_t = CliLayout::Strip)]
        layout: CliLayout,

        #[arg(short, long, default_value_t = 0)]
        threads: u8,
    },
    /// Resizes an image.
    Resize {
        input: PathBuf,

        output: PathBuf,

        width: u32,

        height: u32,

        #[arg(long, default_value_t = CliSampler::Bilinear)]
        sampler: CliSampler,
    },
}

#[derive(Parser)]
pub struct Options {
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<(), Box<dyn Error>> {
    let Options { verbose, command } = Options::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    macro_rules! time {
        ($name: literal, $val: expr) => {{
            let time = std::time::Instant::now();
            let value = $val;
            log::info!("{} took {}ms", $name, time.elapsed().as_millis());
            value
        }};
    }

    match command {
        Command::Palette {
            input,
            k,
            colorspace,
            init,
            by_frequency,
            seed,
            max_size,
            full_size,
            sampler,
            swatch,
            swatch_size,
            layout,
            threads,
        } => {
            let image = time!("read image", image::open(input)?);

            let order = if by_frequency {
                PaletteOrder::ByFrequency
            } else {
                PaletteOrder::Unordered
            };

            let pipeline = PalettePipeline::from(&image)
                .palette_size(k)
                .colorspace(colorspace.into())
                .centroid_init(init.into())
                .order(order)
                .seed(seed)
                .downscale((!full_size).then_some(max_size))
                .sampler(sampler.into());

            let palette = time!(
                "palette extraction",
                match threads {
                    0 => pipeline.palette_par(),
                    1 => pipeline.palette(),
                    t => rayon::ThreadPoolBuilder::new()
                        .num_threads(t.into())
                        .build()?
                        .install(|| pipeline.palette_par()),
                }
            )?;

            for color in &palette {
                println!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue);
            }

            if let Some(path) = swatch {
                let swatch = tinct::compose_with_layout(&palette, swatch_size, layout.into())?;
                time!("write swatch", DynamicImage::try_from(swatch)?.save(path)?);
            }
        }
        Command::Resize { input, output, width, height, sampler } => {
            let image = time!("read image", image::open(input)?);
            let buffer = PackedBuffer::from(&image);
            let resized = time!("resize", buffer.resample_par(width, height, sampler.into())?);
            time!("write image", DynamicImage::try_from(resized)?.save(output)?);
        }
    }

    Ok(())
}
