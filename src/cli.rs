use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tocsplit")]
#[command(about = "Split a PDF into one file per top-level table of contents entry")]
#[command(version)]
pub struct Cli {
    /// PDF file to split
    pub input_pdf: PathBuf,

    /// Prefix for output files, written as <prefix>_NN_<title>.pdf
    pub output_prefix: String,
}
