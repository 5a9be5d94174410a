use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use log::warn;
use uuid::Uuid;

use crate::cli::RunArgs;

pub const DEFAULT_API_URL: &str = "https://api.planetbun.com/v1";

// Read-only snapshot of everything one run needs. Resolved once in main
// from the CLI plus the environment; nothing below this layer touches env.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub urls: Vec<String>,
    pub api_token: Option<String>,
    pub tag: String,
    pub timeout: Duration,
    pub interval: Duration,
    pub max_retries: u32,
    pub verbose: bool,
    pub output_dir: Option<PathBuf>,
    pub device: Device,
    pub locale: Option<String>,
    pub extra_headers: HashMap<String, String>,
    pub slack_webhook_url: Option<String>,
    pub pr_comment_url: Option<String>,
    pub pr_comment_token: Option<String>,
    pub archive_bucket: Option<String>,
    pub thresholds: Thresholds,
    pub api_url: String,
    pub accept_invalid_certs: bool,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Device {
    Mobile,
    Desktop,
}

impl Device {
    pub fn as_flag(&self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Thresholds {
    pub min_accessibility_score: Option<u8>,
    pub min_best_practices_score: Option<u8>,
    pub min_performance_score: Option<u8>,
    pub min_progressive_web_app_score: Option<u8>,
    pub min_seo_score: Option<u8>,
}

impl Thresholds {
    pub fn is_empty(&self) -> bool {
        self.min_accessibility_score.is_none()
            && self.min_best_practices_score.is_none()
            && self.min_performance_score.is_none()
            && self.min_progressive_web_app_score.is_none()
            && self.min_seo_score.is_none()
    }
}

pub fn resolve(args: RunArgs) -> CheckConfig {
    let api_url = env::var("API_URL").ok().filter(|value| !value.is_empty());
    // An API_URL override points at a local or staging queue, which runs
    // on a self-signed certificate.
    let accept_invalid_certs = api_url.is_some();

    CheckConfig {
        urls: args.urls,
        api_token: args.api_token.filter(|token| !token.is_empty()),
        tag: args
            .tag
            .unwrap_or_else(|| format!("lightcheck-{}", Uuid::new_v4())),
        timeout: Duration::from_secs(args.timeout * 60),
        interval: Duration::from_secs(args.interval),
        max_retries: args.max_retries,
        verbose: args.verbose,
        output_dir: args.output_dir,
        device: args.device,
        locale: args.locale,
        extra_headers: parse_headers(&args.headers),
        slack_webhook_url: args.slack_webhook_url,
        pr_comment_url: args.pr_comment_url,
        pr_comment_token: args.pr_comment_token,
        archive_bucket: args.archive_bucket,
        thresholds: args.thresholds.into(),
        api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        accept_invalid_certs,
        log_level: env::var("LOG_LEVEL").ok(),
    }
}

// "Name: value" pairs from the command line.
pub fn parse_headers(raw: &[String]) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for entry in raw {
        match entry.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
            _ => warn!("ignoring malformed header {:?}, expected \"Name: value\"", entry),
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["lightcheck", "run"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Run(args) => args,
            Commands::Validate(_) => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn parse_headers_trims_and_skips_garbage() {
        let raw = vec![
            "X-Api-Key: abc123".to_string(),
            "not-a-header".to_string(),
            "Accept-Language: de".to_string(),
        ];
        let headers = parse_headers(&raw);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X-Api-Key").map(String::as_str), Some("abc123"));
        assert_eq!(headers.get("Accept-Language").map(String::as_str), Some("de"));
    }

    #[test]
    fn resolve_fills_defaults_and_generates_a_tag() {
        let config = resolve(run_args(&["--urls", "https://example.com"]));
        assert!(config.tag.starts_with("lightcheck-"));
        assert_eq!(config.timeout, Duration::from_secs(600));
        assert_eq!(config.interval, Duration::from_secs(10));
        assert!(config.api_token.is_none());
    }

    // Set and clear API_URL in one test; splitting it races the parallel
    // test runner on the shared environment.
    #[test]
    fn resolve_honors_api_url_override() {
        env::set_var("API_URL", "https://localhost:8443/v1");
        let overridden = resolve(run_args(&["--urls", "https://example.com"]));
        env::remove_var("API_URL");
        assert_eq!(overridden.api_url, "https://localhost:8443/v1");
        assert!(overridden.accept_invalid_certs);

        let plain = resolve(run_args(&["--urls", "https://example.com"]));
        assert_eq!(plain.api_url, DEFAULT_API_URL);
        assert!(!plain.accept_invalid_certs);
    }
}
