//! Parse command handler

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use arblog::cli::ParseArgs;
use arblog::config::default_log_path;
use arblog::progress::ParseProgressReporter;
use arblog::report::render_text;
use arblog::{Config, ParseOptions};

/// Handle `arblog parse`.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &ParseArgs) -> Result<()> {
    let config = Config::load()?;
    let options = resolve_options(&config, args)?;

    let stdin = io::stdin();
    let path = resolve_log_path(
        args.file.as_deref(),
        config.log_path(),
        default_log_path(),
        &mut stdin.lock(),
        &mut io::stderr(),
    )?;

    let mut reporter = if args.quiet {
        ParseProgressReporter::quiet()
    } else {
        eprintln!("Parsing {}", path.display());
        ParseProgressReporter::new()
    };

    let parsed = {
        let on_progress: &mut dyn FnMut(f64) = &mut |fraction| reporter.update(fraction);
        arblog::parse_file(&path, &options, Some(on_progress))
    };
    reporter.finish();
    let result = parsed.with_context(|| format!("Failed to parse {}", path.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{}", json);
    } else {
        print!("{}", render_text(&result));
    }

    Ok(())
}

/// Merge config defaults with command line overrides.
pub(crate) fn resolve_options(config: &Config, args: &ParseArgs) -> Result<ParseOptions> {
    let mut options = config.parse.to_options();

    if let Some(count) = args.count {
        if count == 0 {
            bail!("--count must be at least 1");
        }
        options.count = count;
    }
    if let Some(min) = args.min {
        if !min.is_finite() || min <= 0.0 {
            bail!("--min must be a positive number of seconds");
        }
        options.min_duration_sec = min;
    }
    if let Some(chunk_bytes) = args.chunk_bytes {
        if chunk_bytes == 0 {
            bail!("--chunk-bytes must be greater than 0");
        }
        options.chunk_bytes = chunk_bytes;
    }

    Ok(options)
}

/// Pick the log to parse.
///
/// Order: explicit argument, configured path, the game's default location
/// when it exists, then a path typed on `input`.
pub(crate) fn resolve_log_path(
    file: Option<&Path>,
    configured: Option<PathBuf>,
    platform_default: Option<PathBuf>,
    input: &mut dyn BufRead,
    prompt: &mut dyn Write,
) -> Result<PathBuf> {
    if let Some(file) = file {
        return Ok(file.to_path_buf());
    }
    if let Some(path) = configured {
        tracing::debug!(path = %path.display(), "Using configured log path");
        return Ok(path);
    }
    if let Some(path) = platform_default.filter(|p| p.is_file()) {
        tracing::debug!(path = %path.display(), "Using default log path");
        return Ok(path);
    }

    writeln!(prompt, "Enter the path to EE.log and press Enter:")?;
    prompt.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read log path from stdin")?;

    let typed = line.trim().trim_matches('"').trim();
    if typed.is_empty() {
        bail!("No log file path provided");
    }
    Ok(PathBuf::from(typed))
}
