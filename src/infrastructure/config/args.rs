use super::app_config::{LogLevel, TOKEN_ENV};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "cinefeed",
    version,
    about = "Browse the movie catalogue and fetch posters and trailers",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Metadata API bearer token.
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Response language, e.g. `en-US`.
    #[arg(long)]
    pub language: Option<String>,

    /// Override the metadata API base URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List popular movies.
    Popular {
        /// Number of consecutive pages to load.
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Search movies by title.
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Resolve the trailer for a movie.
    Trailer {
        /// Movie identifier.
        id: u64,
    },
    /// Download and decode every poster on a page of the popular listing.
    Posters {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let args = CliArgs::parse_from(["cinefeed", "search", "the matrix", "--page", "3"]);
        assert_eq!(
            args.command,
            Command::Search {
                query: "the matrix".to_string(),
                page: 3
            }
        );
    }

    #[test]
    fn test_popular_defaults() {
        let args = CliArgs::parse_from(["cinefeed", "popular"]);
        assert_eq!(args.command, Command::Popular { pages: 1 });
    }
}
