use clap::Parser;
use std::path::PathBuf;

/// Download radio broadcasts.
///
/// Anything not given on the command line is asked for interactively. A
/// terminal with bidirectional text support is recommended for Hebrew names.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Station number or name
    #[arg(short, long)]
    pub station: Option<String>,

    /// Program number or name
    #[arg(short, long)]
    pub program: Option<String>,

    /// Broadcast number, list or range (`3`, `1-5,9`), or `*` for all
    #[arg(short, long)]
    pub broadcasts: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Directory the broadcasts are written to [default: current directory]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of files downloaded in parallel [default: 1]
    #[arg(long)]
    pub parallel: Option<usize>,

    /// First index used in displayed numbers and file names [default: 1]
    #[arg(short, long)]
    pub index: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
