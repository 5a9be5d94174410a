use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Device, Thresholds};

#[derive(Debug, Parser)]
#[command(
    name = "lightcheck",
    version,
    about = "Queue Lighthouse audits, wait for the scores, report them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run audits (remotely with an API token, locally without) and report scores
    Run(RunArgs),
    /// Check a saved results.json against minimum score thresholds
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Comma-separated URLs to audit
    #[arg(long, value_delimiter = ',')]
    pub urls: Vec<String>,

    /// Queue API token; when absent audits run locally
    #[arg(long)]
    pub api_token: Option<String>,

    /// Tag grouping this run's audits (defaults to a generated one)
    #[arg(long)]
    pub tag: Option<String>,

    /// Minutes to wait for queued results
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Seconds between status checks
    #[arg(long, default_value_t = 10)]
    pub interval: u64,

    /// Extra attempts for a failed local audit
    #[arg(long, default_value_t = 0)]
    pub max_retries: u32,

    /// Device emulation for local audits
    #[arg(long, value_enum, default_value_t = Device::Mobile)]
    pub device: Device,

    /// Locale forwarded to the local audit engine
    #[arg(long)]
    pub locale: Option<String>,

    /// Extra request header as "Name: value", repeatable
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Directory local reports and results.json are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Slack incoming-webhook URL notified once per result
    #[arg(long)]
    pub slack_webhook_url: Option<String>,

    /// Pull-request comments endpoint the score comment is posted to
    #[arg(long)]
    pub pr_comment_url: Option<String>,

    /// Access token for the PR comment endpoint
    #[arg(long)]
    pub pr_comment_token: Option<String>,

    /// Bucket the saved results are archived to after the run
    #[arg(long)]
    pub archive_bucket: Option<String>,

    /// Log every poll attempt and retry
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Directory holding results.json from an earlier run
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Re-send the Slack notification for the saved results
    #[arg(long)]
    pub slack_webhook_url: Option<String>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

#[derive(Debug, Args)]
pub struct ThresholdArgs {
    /// Fail when any accessibility score drops below this
    #[arg(long)]
    pub min_accessibility_score: Option<u8>,

    /// Fail when any best-practices score drops below this
    #[arg(long)]
    pub min_best_practices_score: Option<u8>,

    /// Fail when any performance score drops below this
    #[arg(long)]
    pub min_performance_score: Option<u8>,

    /// Fail when any progressive-web-app score drops below this
    #[arg(long)]
    pub min_progressive_web_app_score: Option<u8>,

    /// Fail when any SEO score drops below this
    #[arg(long)]
    pub min_seo_score: Option<u8>,
}

impl From<ThresholdArgs> for Thresholds {
    fn from(args: ThresholdArgs) -> Thresholds {
        Thresholds {
            min_accessibility_score: args.min_accessibility_score,
            min_best_practices_score: args.min_best_practices_score,
            min_performance_score: args.min_performance_score,
            min_progressive_web_app_score: args.min_progressive_web_app_score,
            min_seo_score: args.min_seo_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::Parser;

    use super::Cli;
    use super::Commands;

    #[test]
    fn command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_urls_and_thresholds() {
        let cli = Cli::parse_from([
            "lightcheck",
            "run",
            "--urls",
            "https://example.com,https://example.com/shop",
            "--min-performance-score",
            "50",
            "--verbose",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.urls.len(), 2);
                assert_eq!(args.thresholds.min_performance_score, Some(50));
                assert!(args.verbose);
                assert_eq!(args.timeout, 10);
                assert_eq!(args.interval, 10);
                assert_eq!(args.max_retries, 0);
            }
            Commands::Validate(_) => panic!("expected the run subcommand"),
        }
    }
}
