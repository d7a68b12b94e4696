//! CLI arguments

use crate::types::Method;
use clap::Parser;
use std::path::PathBuf;

/// Fetch a GitHub-style REST resource, waiting out rate limits and following pagination
#[derive(Parser, Debug)]
#[command(name = "resilient-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Absolute URI to request
    pub uri: String,

    /// Follow rel="next" links and print every page as a JSON array
    #[arg(short, long)]
    pub paginate: bool,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Extra request header, as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Settings file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Override the page cap from the settings file
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Override the rate-limit retry cap from the settings file
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Also wait out `retry-after` and 429 responses
    #[arg(long)]
    pub secondary_rate_limits: bool,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse a `Name: value` header argument
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: application/json").unwrap(),
            ("Accept".to_string(), "application/json".to_string())
        );
        assert_eq!(
            parse_header("X-Empty:").unwrap(),
            ("X-Empty".to_string(), String::new())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from([
            "resilient-fetch",
            "https://api.github.com/repos/rust-lang/rust/issues",
            "--paginate",
            "-X",
            "post",
            "-H",
            "Accept: application/vnd.github+json",
            "--max-pages",
            "5",
        ]);

        assert!(cli.paginate);
        assert_eq!(cli.method, Method::POST);
        assert_eq!(cli.headers.len(), 1);
        assert_eq!(cli.max_pages, Some(5));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["resilient-fetch", "https://api.example/items"]);
        assert!(!cli.paginate);
        assert_eq!(cli.method, Method::GET);
        assert!(cli.headers.is_empty());
        assert!(!cli.verbose);
    }
}
