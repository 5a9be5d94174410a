use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

mod api;
mod check;
mod cli;
mod config;
mod error;
mod github;
mod models;
mod poller;
mod runner;
mod slack;
mod utils;
mod validate;

#[tokio::main]
async fn main() {
    dotenv().ok();
    if let Err(err) = init_logging() {
        eprintln!("logging setup failed: {:#}", err);
    }

    let args = cli::Cli::parse();
    let outcome = match args.command {
        cli::Commands::Run(run_args) => run_command(run_args).await,
        cli::Commands::Validate(validate_args) => validate_command(validate_args).await,
    };

    if let Err(err) = outcome {
        eprintln!("❌ {}", err);
        if let Some(partial) = &err.data {
            eprintln!("partial results:\n{}", utils::score_table(partial));
        }
        std::process::exit(1);
    }
}

async fn run_command(args: cli::RunArgs) -> Result<(), error::CheckError> {
    let config = config::resolve(args);
    let results = check::run_check(&config).await?;
    println!("✅ {} audit(s) complete", results.len());
    Ok(())
}

async fn validate_command(args: cli::ValidateArgs) -> Result<(), error::CheckError> {
    let saved = utils::load_results(&args.output_dir)?;
    println!(
        "loaded {} result(s) from run {} ({})",
        saved.results.len(),
        saved.tag,
        saved.generated_at
    );

    if let Some(webhook_url) = &args.slack_webhook_url {
        if let Err(err) = slack::notify_results(webhook_url, &saved.results).await {
            log::warn!("slack notification failed: {}", err);
        }
    }

    let thresholds: config::Thresholds = args.thresholds.into();
    if !thresholds.is_empty() {
        validate::validate_scores(&saved.results, &thresholds)?;
        println!("✅ all scores clear the configured minimums");
    }
    Ok(())
}

// LOG_LEVEL is the one knob: it picks the console level here and gets
// forwarded to the local audit engine by the runner.
fn init_logging() -> anyhow::Result<()> {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .context("failed to assemble the logging config")?;
    log4rs::init_config(config).context("failed to install the logger")?;
    Ok(())
}
