use std::path::PathBuf;

use clap::Parser;

/// Render a spectral plot request to PNG, the terminal, or both.
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(name = "specplot")]
#[command(version, about = "Spectral plot renderer", long_about = None)]
pub struct Args {
    /// JSON plot request, tagged by "kind"
    pub request: PathBuf,

    /// TOML file with [style] and [export] tables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// PNG output path (overrides [export])
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Show the figure inline (iTerm2/WezTerm image protocol)
    #[arg(long)]
    pub inline: bool,

    /// Draw a half-block preview in the terminal
    #[arg(long)]
    pub preview: bool,
}
