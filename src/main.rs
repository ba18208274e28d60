//! Main entry point for the runtar CLI application.
//!
//! This binary provides a command-line interface for listing and extracting
//! robot model bundles (.tar / .tgz) from both local filesystem and remote
//! HTTP URLs, and for printing a bundle's primary document.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use runtar::tar::DEFAULT_PRIMARY_SUFFIX;
use runtar::{Bundle, BundleExtractor, Cli, HttpReader, LocalFileReader, ReadSource, TarEntry};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to the appropriate handler
/// based on whether the input is a local file or HTTP URL.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_http_url() {
        // Handle remote bundle via HTTP
        let reader = HttpReader::new(cli.file.clone())?;
        let transferred_before = reader.transferred_bytes();
        let reader = Arc::new(reader);

        process_bundle(reader.clone(), &cli).await?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = reader.transferred_bytes() - transferred_before;
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
    } else {
        // Handle local bundle file
        let reader = Arc::new(LocalFileReader::new(Path::new(&cli.file))?);
        process_bundle(reader, &cli).await?;
    }

    Ok(())
}

/// Process a bundle based on CLI options.
///
/// Handles three modes:
/// - Show mode (`-s`): print the primary document's text
/// - List mode (`-l` or `-v`): display bundle contents
/// - Extract mode: extract files matching the specified filters
async fn process_bundle<R: ReadSource + 'static>(reader: Arc<R>, cli: &Cli) -> Result<()> {
    let extractor = BundleExtractor::new(reader);
    let bundle = extractor.load().await?;

    // Show mode: print the primary document and exit
    if let Some(suffix) = &cli.show {
        return show_primary(&bundle, suffix).await;
    }

    // List mode: display bundle contents and exit
    if cli.list || cli.verbose {
        return list_entries(&bundle, cli.verbose);
    }

    // Extract mode: apply filters to determine which files to extract:
    // 1. If specific files are requested, only include matching entries
    // 2. Exclude files matching the exclusion patterns
    let to_extract: Vec<_> = bundle
        .entries()
        .iter()
        .filter(|e| {
            // If specific files are requested via positional arguments,
            // only include entries that match
            if !cli.files.is_empty() {
                let matches = cli.files.iter().any(|f| {
                    if has_glob_chars(f) {
                        glob_match(f, &e.name)
                    } else {
                        // No wildcards: exact match on filename or full path
                        let basename = Path::new(&e.name)
                            .file_name()
                            .map(|s| s.to_string_lossy())
                            .unwrap_or_default();
                        e.name == *f || basename == *f
                    }
                });
                if !matches {
                    return false;
                }
            }

            // Exclude files matching the -x patterns
            if cli
                .exclude
                .iter()
                .any(|x| e.name.contains(x) || glob_match(x, &e.name))
            {
                return false;
            }

            true
        })
        .collect();

    // Extract each matching file
    let multiple_files = cli.pipe && to_extract.len() > 1;
    for entry in to_extract {
        extract_entry(entry, cli, multiple_files).await?;
    }

    Ok(())
}

/// Print the primary document's text content to stdout.
///
/// A bundle with no entry matching the suffix is reported as an error;
/// it is a content property of the archive, so there is nothing to retry.
async fn show_primary(bundle: &Bundle, suffix: &str) -> Result<()> {
    let entry = bundle
        .primary(suffix)
        .ok_or_else(|| anyhow!("no entry matching {suffix} found in bundle"))?;

    // The primary document is text (URDF is XML); decode before printing
    // so invalid content is reported instead of dumped raw
    let text = entry.text()?;

    use tokio::io::AsyncWriteExt;
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;

    Ok(())
}

/// List entries in the bundle.
///
/// Supports two output formats:
/// - Simple format (`-l`): just entry names, one per line
/// - Verbose format (`-v`): size and kind per entry, with totals
fn list_entries(bundle: &Bundle, verbose: bool) -> Result<()> {
    if verbose {
        println!("{:>10}  {:>8}  Name", "Length", "Kind");
        println!("{}", "-".repeat(50));
    }

    let mut total_size = 0usize;

    for entry in bundle.entries() {
        if verbose {
            println!(
                "{:>10}  {:>8}  {}",
                entry.content.len(),
                entry.kind(DEFAULT_PRIMARY_SUFFIX).label(),
                entry.name
            );
            total_size += entry.content.len();
        } else {
            println!("{}", entry.name);
        }
    }

    if verbose {
        println!("{}", "-".repeat(50));
        println!(
            "{:>10}  {:>8}  {} files",
            total_size,
            "",
            bundle.entries().len()
        );
    }

    Ok(())
}

/// Extract a single entry from the bundle.
///
/// Handles the extraction options:
/// - Pipe mode (`-p`): write to stdout instead of file
/// - Custom output directory (`-d`): extract to specified directory
/// - Junk paths (`-j`): ignore directory structure in archive
/// - Overwrite control (`-n`, `-o`): handle existing files
async fn extract_entry(entry: &TarEntry, cli: &Cli, show_filename: bool) -> Result<()> {
    // Pipe mode: write entry contents directly to stdout
    if cli.pipe {
        if show_filename {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(format!("--- {} ---\n", entry.name).as_bytes())
                .await?;
        }
        return entry.write_to_stdout().await;
    }

    // Determine the output path based on CLI options
    let file_name = if cli.junk_paths {
        // Junk paths: use only the base filename, ignore directory structure
        Path::new(&entry.name)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| entry.name.clone())
    } else {
        // Preserve directory structure from archive
        entry.name.clone()
    };

    let output_path = match &cli.extract_dir {
        Some(dir) => PathBuf::from(dir).join(&file_name),
        None => PathBuf::from(&file_name),
    };

    // Handle existing files based on overwrite options
    if output_path.exists() {
        if cli.never_overwrite {
            // -n flag: never overwrite, skip silently (unless quiet)
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (file exists)", entry.name);
            }
            return Ok(());
        }

        if !cli.overwrite {
            // Default behavior: skip with suggestion to use -o
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (use -o to overwrite)", entry.name);
            }
            return Ok(());
        }
        // -o flag: overwrite without prompting (fall through to extraction)
    }

    // Display extraction progress
    if !cli.is_quiet() {
        println!("  extracting: {}", entry.name);
    }

    // Perform the actual extraction
    entry.write_to(&output_path).await?;

    Ok(())
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    // Backtracking matcher: `*` matches zero or more characters by either
    // skipping itself or consuming one text character and staying
    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
