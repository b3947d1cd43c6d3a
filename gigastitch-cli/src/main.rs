//! gigastitch CLI - Command-line interface
//!
//! Downloads every tile of a panorama at one pyramid level and stitches
//! them into a single image.

mod commands;
mod error;
mod runner;

use clap::Parser;
use commands::common::{parse_base_url, CompositorArg};
use commands::stitch::StitchArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gigastitch")]
#[command(version = gigastitch::VERSION)]
#[command(about = "Download and stitch tiled gigapixel panoramas", long_about = None)]
struct Args {
    /// Panorama identifier
    photo_id: u64,

    /// Pyramid level to download (0 = highest resolution)
    #[arg(allow_negative_numbers = true)]
    level: i64,

    /// Directory for tiles and the final image [config: output.directory]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Concurrent tile downloads, 1-64 [config: download.parallel_downloads]
    #[arg(long)]
    parallel: Option<usize>,

    /// Per-request timeout in seconds [config: download.timeout]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Retries per failed tile [config: download.max_retries]
    #[arg(long)]
    retries: Option<u32>,

    /// Composition backend [config: assembly.compositor]
    #[arg(long, value_enum)]
    compositor: Option<CompositorArg>,

    /// ImageMagick executable [config: assembly.magick_path]
    #[arg(long)]
    magick_path: Option<PathBuf>,

    /// Tile host base URL [config: source.base_url]
    #[arg(long, value_parser = parse_base_url)]
    base_url: Option<String>,

    /// Config file to use instead of ~/.gigastitch/config.ini
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Log only to the log file
    #[arg(long, short)]
    quiet: bool,
}

impl From<Args> for StitchArgs {
    fn from(args: Args) -> Self {
        Self {
            photo_id: args.photo_id,
            level: args.level,
            output: args.output,
            parallel: args.parallel,
            timeout: args.timeout,
            retries: args.retries,
            compositor: args.compositor,
            magick_path: args.magick_path,
            base_url: args.base_url,
            config: args.config,
            debug: args.debug,
            quiet: args.quiet,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = commands::stitch::run(args.into()) {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let args = Args::try_parse_from(["gigastitch", "12345", "0"]).unwrap();
        assert_eq!(args.photo_id, 12345);
        assert_eq!(args.level, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_negative_level_parses() {
        let args = Args::try_parse_from(["gigastitch", "12345", "-1"]).unwrap();
        assert_eq!(args.level, -1);
    }

    #[test]
    fn test_options() {
        let args = Args::try_parse_from([
            "gigastitch",
            "7",
            "3",
            "--output",
            "/tmp/out",
            "--parallel",
            "4",
            "--compositor",
            "magick",
            "--retries",
            "2",
            "--quiet",
        ])
        .unwrap();

        let stitch: StitchArgs = args.into();
        assert_eq!(stitch.output, Some(PathBuf::from("/tmp/out")));
        assert_eq!(stitch.parallel, Some(4));
        assert_eq!(stitch.compositor, Some(CompositorArg::Magick));
        assert_eq!(stitch.retries, Some(2));
        assert!(stitch.quiet);
    }

    #[test]
    fn test_missing_level_is_usage_error() {
        let err = Args::try_parse_from(["gigastitch", "12345"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_zero_timeout_is_usage_error() {
        let err = Args::try_parse_from(["gigastitch", "1", "0", "--timeout", "0"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);

        let args = Args::try_parse_from(["gigastitch", "1", "0", "--timeout", "1"]).unwrap();
        assert_eq!(args.timeout, Some(1));
    }

    #[test]
    fn test_base_url_is_validated() {
        let err = Args::try_parse_from(["gigastitch", "1", "0", "--base-url", "ftp://host"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);

        let args =
            Args::try_parse_from(["gigastitch", "1", "0", "--base-url", "https://host/"]).unwrap();
        assert_eq!(args.base_url.as_deref(), Some("https://host"));
    }

    #[test]
    fn test_unknown_compositor_rejected() {
        assert!(Args::try_parse_from(["gigastitch", "1", "0", "--compositor", "gimp"]).is_err());
    }
}
