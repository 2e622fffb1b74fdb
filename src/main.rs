use std::path::PathBuf;

use clap::Parser;

use font_ttf::{AtlasOptions, FontFace};

/// Renders a glyph atlas for a TrueType font and lays out a sample string
#[derive(Parser, Debug)]
#[command(name = "font-atlas")]
struct Args {
    /// TrueType font to load
    font: PathBuf,

    /// Where to write the atlas as a grayscale PNG
    #[arg(short, long, default_value = "atlas.png")]
    out: PathBuf,

    /// String to shape with the loaded font
    #[arg(short, long)]
    text: Option<String>,

    /// Font size in pixels used for --text
    #[arg(long, default_value_t = 32.0)]
    size: f32,

    /// Rasterize coverage masks instead of signed distance fields
    #[arg(long)]
    no_sdf: bool,

    /// Minimum atlas width in pixels
    #[arg(long, default_value_t = 1024)]
    atlas_width: u32,

    /// Pixels per em glyphs are rasterized at
    #[arg(long, default_value_t = 48.0)]
    em_size: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let options = AtlasOptions {
        use_sdf: !args.no_sdf,
        em_size: args.em_size,
        atlas_width: args.atlas_width,
        ..AtlasOptions::default()
    };

    let face = FontFace::load(&args.font, &options)?;
    let atlas = face.atlas();

    atlas.write_png(&args.out)?;

    log::info!(
        "wrote {}x{} atlas with {} glyphs to {}",
        atlas.width(),
        atlas.height(),
        face.lookups().uvs().len(),
        args.out.display()
    );

    if let Some(text) = &args.text {
        let shape = face.shape(text, args.size)?;

        for ((c, position), size) in text.chars().zip(&shape.positions).zip(&shape.sizes) {
            println!(
                "{:?}\tx={:.2}\ty={:.2}\tw={:.2}\th={:.2}",
                c, position.x, position.y, size.width, size.height
            );
        }

        let bounds = shape.bounding_rectangle;
        println!(
            "bounds: x={:.2} y={:.2} w={:.2} h={:.2}",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
    }

    Ok(())
}
