//! LC7981 font tool
//!
//! Turns glyph sheet images into font blobs for [`lc7981::Font`], and renders
//! text through the controller simulator to check the result.
//!
//! ```bash
//! # 16 glyphs per sheet row starting at code 0, bright pixels are ink
//! lc7981-font convert --input font_8x16.png --height 16 --format bin --output font_8x16.bin
//!
//! # Sheet that starts at ' ' instead of code 0
//! lc7981-font convert --input font_6x8.png --height 8 --first-cell ' ' --format bin
//!
//! # Rust source for a const table
//! lc7981-font convert --input font_5x7.png --height 7 --width 6 --border 1 --name FONT_5X7
//!
//! # Look at the result on a 240x128 panel over a gray background
//! lc7981-font preview --font font_8x16.bin --text "Hello" --x 3 --y 10 --background gray
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::{GrayImage, Luma};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use lc7981::pattern::presets;
use lc7981::sim::Simulator;
use lc7981::{Builder, Font, Lc7981};

/// First character of every font table
const FIRST_CHAR: char = ' ';

/// LC7981 font tool
#[derive(Parser)]
#[command(name = "lc7981-font")]
#[command(version)]
#[command(about = "Convert glyph sheets to LC7981 font blobs and preview them")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a glyph sheet into a font blob
    Convert(ConvertArgs),

    /// Render text with a font blob into a PNG
    Preview(PreviewArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Glyph sheet (PNG)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; Rust source goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Glyph height in pixels
    #[arg(long)]
    height: u8,

    /// Horizontal cell pitch in pixels, border included (default: sheet width / 16)
    #[arg(long)]
    width: Option<u32>,

    /// Pixels between neighbouring cells
    #[arg(long, default_value_t = 0)]
    border: u32,

    /// Character in the sheet's first cell
    #[arg(long, default_value_t = '\0')]
    first_cell: char,

    /// First character to export; glyphs from ' ' up to it are left blank
    #[arg(long, default_value_t = ' ')]
    start: char,

    /// Last character to export
    #[arg(long, default_value_t = '~')]
    end: char,

    /// Color channel holding the glyphs
    #[arg(long, value_enum, default_value_t = Channel::G)]
    channel: Channel,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Rust)]
    format: Format,

    /// Name of the generated constant (default: FONT_<sheet name>)
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args)]
struct PreviewArgs {
    /// Font blob written by `convert --format bin`
    #[arg(short, long)]
    font: PathBuf,

    /// Text to draw
    #[arg(short, long)]
    text: String,

    /// Left edge of the text
    #[arg(short, long, default_value_t = 0)]
    x: u16,

    /// Top edge of the text
    #[arg(short, long, default_value_t = 0)]
    y: u16,

    /// Panel width in pixels
    #[arg(long, default_value_t = lc7981::DEFAULT_WIDTH)]
    width: u16,

    /// Panel height in pixels
    #[arg(long, default_value_t = lc7981::DEFAULT_HEIGHT)]
    height: u16,

    /// Stock pattern to fill the panel with first
    #[arg(long)]
    background: Option<String>,

    /// PNG to write
    #[arg(short, long, default_value = "preview.png")]
    output: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Channel {
    R,
    G,
    B,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Rust `const` array
    Rust,
    /// Raw blob
    Bin,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Convert(args) => convert(&args),
        Commands::Preview(args) => preview(&args),
    }
}

/// Pack one glyph in blob layout; `lit(x, y)` tells whether a pixel is ink
fn pack_glyph(width: u32, height: u32, lit: impl Fn(u32, u32) -> bool) -> Vec<u8> {
    if width <= 8 {
        return (0..height)
            .map(|y| (0..width).filter(|&x| lit(x, y)).fold(0u8, |row, x| row | 1 << x))
            .collect();
    }

    let mut glyph = vec![0u8; ((width * height + 7) / 8) as usize];
    for y in 0..height {
        for x in 0..width {
            if lit(x, y) {
                let bit = (y * width + x) as usize;
                glyph[bit / 8] |= 1 << (bit % 8);
            }
        }
    }
    glyph
}

/// Cut the glyphs `start..=end` out of a sheet and build a font blob
///
/// Cell `n` of the sheet holds character `first_cell + n`, row by row.
fn build_blob(sheet: &image::RgbImage, args: &ConvertArgs) -> Result<Vec<u8>> {
    let pitch = args.width.unwrap_or(sheet.width() / 16);
    let width = pitch
        .checked_sub(args.border)
        .filter(|w| (1..=255).contains(w))
        .with_context(|| format!("Glyph width {} minus border {} is unusable", pitch, args.border))?;
    let height = u32::from(args.height);
    if height == 0 {
        bail!("Glyph height must not be zero");
    }
    let stride_y = height + args.border;

    if args.start < FIRST_CHAR {
        bail!("Font tables start at {:?}, cannot export from {:?}", FIRST_CHAR, args.start);
    }
    if args.first_cell > args.start {
        bail!(
            "Sheet starts at {:?}, after the first exported character {:?}",
            args.first_cell,
            args.start
        );
    }
    if args.end < args.start {
        bail!("Last character {:?} comes before {:?}", args.end, args.start);
    }

    let columns = sheet.width() / pitch;
    let rows = sheet.height() / stride_y;
    let origin = args.first_cell as u32;
    let needed = args.end as u32 - origin + 1;
    if needed > columns * rows {
        bail!(
            "Sheet has {} cells of {}x{}, {} needed up to {:?}",
            columns * rows,
            pitch,
            stride_y,
            needed,
            args.end
        );
    }

    let blank = FIRST_CHAR as u32..args.start as u32;
    let exported = args.start as u32..=args.end as u32;
    log::info!(
        "Slicing {} glyphs of {}x{} from a {}x{} sheet ({} per row, {} blank)",
        exported.clone().count(),
        width,
        height,
        sheet.width(),
        sheet.height(),
        columns,
        blank.len()
    );

    let channel = args.channel.index();
    let mut blob = vec![width as u8, height as u8];
    for _ in blank {
        blob.extend(pack_glyph(width, height, |_, _| false));
    }
    for code in exported {
        let cell = code - origin;
        let cx = (cell % columns) * pitch;
        let cy = (cell / columns) * stride_y;
        blob.extend(pack_glyph(width, height, |x, y| {
            sheet.get_pixel(cx + x, cy + y)[channel] > 127
        }));
    }

    Font::from_blob(&blob).context("Converted font does not validate")?;
    Ok(blob)
}

/// Rust source for a blob: header first, then one line per glyph
fn rust_source(name: &str, blob: &[u8], source: &Path) -> Result<String> {
    let font = Font::from_blob(blob).context("Invalid font blob")?;
    let per_glyph = font.bytes_per_glyph();

    let mut out = String::new();
    writeln!(out, "// Generated by lc7981-font from {}", source.display())?;
    writeln!(out, "pub const {}: [u8; {}] = [", name, blob.len())?;
    writeln!(out, "    {}, {}, // width, height", font.width(), font.height())?;
    for (i, glyph) in blob[2..].chunks(per_glyph).enumerate() {
        let bytes: Vec<String> = glyph.iter().map(|b| format!("0x{:02X}", b)).collect();
        let code = FIRST_CHAR as u32 + i as u32;
        let label = char::from_u32(code).map_or_else(|| code.to_string(), |c| format!("{:?}", c));
        writeln!(out, "    {}, // {}", bytes.join(", "), label)?;
    }
    writeln!(out, "];")?;
    Ok(out)
}

/// `FONT_<STEM>` with everything but ASCII alphanumerics replaced
fn default_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if cleaned.starts_with("FONT") {
        cleaned
    } else {
        format!("FONT_{}", cleaned)
    }
}

fn convert(args: &ConvertArgs) -> Result<()> {
    let sheet = image::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?
        .to_rgb8();
    let blob = build_blob(&sheet, args)?;

    match args.format {
        Format::Bin => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| args.input.with_extension("bin"));
            fs::write(&output, &blob)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!("Wrote {} bytes to {}", blob.len(), output.display());
        }
        Format::Rust => {
            let name = args
                .name
                .clone()
                .unwrap_or_else(|| default_name(&args.input));
            let source = rust_source(&name, &blob, &args.input)?;
            match &args.output {
                Some(output) => {
                    fs::write(output, source)
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    log::info!("Wrote {} to {}", name, output.display());
                }
                None => print!("{}", source),
            }
        }
    }
    Ok(())
}

/// Snapshot of the simulated panel, black pixels dark
fn render(sim: &Simulator) -> GrayImage {
    GrayImage::from_fn(u32::from(sim.width()), u32::from(sim.height()), |x, y| {
        if sim.pixel(x as u16, y as u16) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

fn preview(args: &PreviewArgs) -> Result<()> {
    let blob =
        fs::read(&args.font).with_context(|| format!("Failed to read {}", args.font.display()))?;
    let font = Font::from_blob(&blob).context("Invalid font blob")?;
    let config = Builder::new()
        .dimensions(args.width, args.height)
        .build()
        .context("Invalid panel size")?;

    let mut display = Lc7981::new(Simulator::new(args.width, args.height), config);
    display.init()?;

    if let Some(name) = &args.background {
        let pattern = presets::by_name(name).with_context(|| {
            let names: Vec<&str> = presets::ALL.iter().map(|(n, _)| *n).collect();
            format!("Unknown pattern {:?}, expected one of: {}", name, names.join(", "))
        })?;
        display.fill_pattern(0, 0, args.width, args.height, &pattern)?;
    }

    display
        .draw_text(args.x, args.y, &args.text, &font)
        .with_context(|| format!("Failed to draw {:?} at ({}, {})", args.text, args.x, args.y))?;

    render(display.interface())
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote preview to {}", args.output.display());
    Ok(())
}
