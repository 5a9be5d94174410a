use log::{info, warn};

use crate::api::ApiClient;
use crate::config::CheckConfig;
use crate::error::{CheckError, ErrorCode};
use crate::models::AuditResult;
use crate::{github, poller, runner, slack, utils, validate};

// One full run: audit everything, print the table, then fan the results
// out to whatever reporting surfaces are configured. Reporting failures
// are logged and never sink the run; threshold failures do.
pub async fn run_check(config: &CheckConfig) -> Result<Vec<AuditResult>, CheckError> {
    let results = match &config.api_token {
        Some(token) => run_remote(config, token).await?,
        None => runner::run_local_audits(config).await?,
    };

    println!("{}", utils::score_table(&results));

    if let Some(dir) = &config.output_dir {
        let path = utils::save_results(dir, &config.tag, &results)?;
        if let Some(bucket) = &config.archive_bucket {
            if let Err(err) = utils::archive_results(bucket, &path, &config.tag).await {
                warn!("archive upload failed: {}", err);
            }
        }
    } else if config.archive_bucket.is_some() {
        warn!("--archive-bucket needs --output-dir, skipping the upload");
    }

    if let Some(webhook_url) = &config.slack_webhook_url {
        if let Err(err) = slack::notify_results(webhook_url, &results).await {
            warn!("slack notification failed: {}", err);
        }
    }

    match (&config.pr_comment_url, &config.pr_comment_token) {
        (Some(comments_url), Some(token)) => {
            if let Err(err) = github::post_score_comment(comments_url, token, &results).await {
                warn!("PR comment failed: {}", err);
            }
        }
        (Some(_), None) => warn!("--pr-comment-url needs --pr-comment-token, skipping"),
        _ => {}
    }

    if !config.thresholds.is_empty() {
        validate::validate_scores(&results, &config.thresholds)?;
        println!("✅ all scores clear the configured minimums");
    }

    Ok(results)
}

// Remote flow: resolve the account's registered pages, enqueue audits
// for them, then wait on the queue until every score is in.
async fn run_remote(config: &CheckConfig, token: &str) -> Result<Vec<AuditResult>, CheckError> {
    let client = ApiClient::new(config, token)?;

    let mut pages = client.fetch_pages().await?;
    if !config.urls.is_empty() {
        // audits run against registered pages; URLs on the command line
        // just select among them
        pages.retain(|page| config.urls.iter().any(|url| url == &page.url));
        if pages.is_empty() {
            return Err(CheckError::new(
                ErrorCode::NoUrls,
                "none of the requested URLs are registered for this account",
            ));
        }
    }

    let handles = client.trigger_audits(&pages, &config.tag).await?;
    info!("waiting on {} audit(s) under tag {}", handles.len(), config.tag);
    poller::await_results(
        &client,
        &handles,
        config.timeout,
        config.interval,
        config.verbose,
    )
    .await
}
