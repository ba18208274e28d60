use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "runtar")]
#[command(version)]
#[command(about = "A Rust untar utility for robot model bundles, with HTTP URL support", long_about = None)]
#[command(after_help = "Examples:\n  \
  runtar bundle.tgz -x thumbs.png       extract all files except thumbs.png\n  \
  runtar -s .urdf bundle.tgz            print the bundle's URDF document\n  \
  runtar -l https://example.com/model.tgz   list files from a remote bundle")]
pub struct Cli {
    /// Bundle file path or HTTP URL (a .tar or gzip-compressed .tgz archive)
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Files to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely with sizes and entry kinds
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Print the primary document (first entry matching SUFFIX) to stdout
    #[arg(short = 's', long = "show", value_name = "SUFFIX")]
    pub show: Option<String>,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe || self.show.is_some()
    }
}
