//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use qrsave_core::ImageFormat;

/// Generate QR code images and save files locally.
///
/// Saves go through the same strategy dispatcher a browser page would use;
/// on the desktop every file lands in the output directory.
#[derive(Parser, Debug)]
#[command(name = "qrsave")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a QR code and save it in one or more image formats
    Qr(QrArgs),
    /// Download a URL and save it
    Save(SaveArgs),
    /// Save a local file through the blob path
    SaveFile(SaveFileArgs),
}

/// Output directory shared by every subcommand.
#[derive(ClapArgs, Debug, Clone)]
pub struct OutputArgs {
    /// Directory to save into (default: config `output_dir`, then ".")
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct QrArgs {
    /// Text or URL to encode (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Image format to save (repeatable; default: all)
    #[arg(short = 'f', long = "format", value_enum)]
    pub formats: Vec<FormatArg>,

    /// Edge length in pixels (10-1000)
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=1000))]
    pub size: Option<u32>,

    /// Quiet-zone margin in pixels (0-50)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=50))]
    pub margin: Option<u32>,

    /// QR image API endpoint
    #[arg(long)]
    pub api_base: Option<String>,

    /// Print the image URLs instead of saving
    #[arg(long)]
    pub print_url: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl QrArgs {
    /// Text to encode.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.text.join(" ")
    }

    /// Requested formats, or all of them when none were given.
    #[must_use]
    pub fn image_formats(&self) -> Vec<ImageFormat> {
        if self.formats.is_empty() {
            ImageFormat::ALL.to_vec()
        } else {
            let mut formats: Vec<ImageFormat> = Vec::with_capacity(self.formats.len());
            for format in self.formats.iter().map(|f| ImageFormat::from(*f)) {
                if !formats.contains(&format) {
                    formats.push(format);
                }
            }
            formats
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct SaveArgs {
    /// URL to download
    pub url: String,

    /// File name to save as
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Save options as JSON (e.g. '{"autoBom": true}')
    #[arg(long)]
    pub options: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ClapArgs, Debug)]
pub struct SaveFileArgs {
    /// File to save
    pub path: PathBuf,

    /// MIME type of the content (default: application/octet-stream)
    #[arg(short = 't', long = "type")]
    pub content_type: Option<String>,

    /// File name to save as (default: the source file name)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Prepend a UTF-8 BOM to UTF-8 text and XML content
    #[arg(long, conflicts_with = "options")]
    pub auto_bom: bool,

    /// Save options as JSON (e.g. '{"autoBom": true}')
    #[arg(long)]
    pub options: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Jpeg,
    Png,
    Svg,
}

impl From<FormatArg> for ImageFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Png => Self::Png,
            FormatArg::Svg => Self::Svg,
        }
    }
}
