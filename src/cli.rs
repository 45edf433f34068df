//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Usage line printed when the album URL is missing.
pub const USAGE: &str = "Usage: album-dl <album_page_URL>";

/// Download every track of an album page.
///
/// Reads the album's track table, finds each track's MP3 link and saves the
/// files into ./downloaded.
#[derive(Parser, Debug)]
#[command(name = "album-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Album page URL
    #[arg(value_name = "ALBUM_PAGE_URL")]
    pub url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_url_is_positional() {
        let args = Args::try_parse_from(["album-dl", "https://example.com/album"]).unwrap();
        assert_eq!(args.url.as_deref(), Some("https://example.com/album"));
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_missing_url_parses_as_none() {
        let args = Args::try_parse_from(["album-dl"]).unwrap();
        assert!(args.url.is_none());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["album-dl", "-vv", "https://example.com/a"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["album-dl", "--quiet", "https://example.com/a"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_extra_positional_is_rejected() {
        let result = Args::try_parse_from(["album-dl", "https://a.example", "https://b.example"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["album-dl", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
