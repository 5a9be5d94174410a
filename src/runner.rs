use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{info, warn};
use tokio::process::Command;

use crate::config::CheckConfig;
use crate::error::{CheckError, ErrorCode};
use crate::models::audit::Scores;
use crate::models::{AuditResult, LocalReport};
use crate::utils::sanitize_filename;

// Categories asked of the lighthouse CLI; keep in sync with Scores.
const CATEGORIES: &str = "accessibility,best-practices,performance,pwa,seo";

// One finished engine invocation. The engine can exit zero while
// reporting it never actually audited the page, so the runtime error
// rides alongside the mapped result instead of replacing it.
pub struct LocalRun {
    pub result: AuditResult,
    pub runtime_error: Option<String>,
}

// Audits every configured URL through the local lighthouse CLI, one page
// at a time. Parallel Chrome sessions starve each other, so the list is
// processed strictly in order.
pub async fn run_local_audits(config: &CheckConfig) -> Result<Vec<AuditResult>, CheckError> {
    if config.urls.is_empty() {
        return Err(CheckError::new(
            ErrorCode::NoUrls,
            "no URLs to audit; pass --urls",
        ));
    }

    let out_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("lightcheck-reports"));
    tokio::fs::create_dir_all(&out_dir).await?;

    let mut results = Vec::new();
    for url in &config.urls {
        info!("auditing {} locally", url);
        let result =
            run_with_retries(config.max_retries, || run_once(config, url, &out_dir)).await?;
        results.push(result);
    }
    Ok(results)
}

// Bounded retry around one audit. max_retries counts EXTRA attempts:
// max_retries = 3 means up to 4 invocations, the default 0 means exactly
// one. A populated runtime error counts as a failed attempt exactly like
// an engine failure, and the last failure is the one the caller sees.
pub async fn run_with_retries<F, Fut>(max_retries: u32, mut op: F) -> Result<AuditResult, CheckError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<LocalRun, CheckError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let failure = match op().await {
            Ok(run) => match run.runtime_error {
                None => return Ok(run.result),
                Some(message) => CheckError::new(ErrorCode::Generic, message),
            },
            Err(err) => err,
        };
        if attempt > max_retries {
            return Err(failure);
        }
        warn!("audit attempt {} failed, retrying: {}", attempt, failure);
    }
}

async fn run_once(config: &CheckConfig, url: &str, out_dir: &Path) -> Result<LocalRun, CheckError> {
    let report_path = out_dir.join(format!("{}.json", sanitize_filename(url)));

    let mut command = Command::new("lighthouse");
    command
        .arg(url)
        .arg("--output=json")
        .arg("--no-enable-error-reporting")
        .arg("--chrome-flags=--headless --no-sandbox")
        .arg("--max-wait-for-load=120000")
        .arg(format!("--only-categories={}", CATEGORIES))
        .arg(format!("--emulated-form-factor={}", config.device.as_flag()))
        .arg("--output-path")
        .arg(&report_path);
    if let Some(locale) = &config.locale {
        command.arg(format!("--locale={}", locale));
    }
    if !config.extra_headers.is_empty() {
        command.arg(format!(
            "--extra-headers={}",
            serde_json::to_string(&config.extra_headers)?
        ));
    }
    if let Some(level) = &config.log_level {
        command.env("LOG_LEVEL", level);
    }

    let output = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;
    if !output.status.success() {
        return Err(CheckError::new(
            ErrorCode::Generic,
            format!(
                "lighthouse failed for {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr)
            ),
        ));
    }

    let raw = tokio::fs::read(&report_path).await?;
    let report: LocalReport = serde_json::from_slice(&raw)?;
    Ok(map_report(url, report, report_path))
}

fn map_report(url: &str, report: LocalReport, report_path: PathBuf) -> LocalRun {
    let runtime_error = report.runtime_error.map(|err| match (err.code, err.message) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (Some(code), None) => code,
        (None, Some(message)) => message,
        (None, None) => "audit engine reported a runtime error".to_string(),
    });

    let categories = report.categories;
    let result = AuditResult {
        name: url.to_string(),
        url: url.to_string(),
        report: None,
        local_report: Some(report_path.display().to_string()),
        scores: Scores {
            accessibility: to_percent(categories.accessibility.and_then(|c| c.score)),
            best_practices: to_percent(categories.best_practices.and_then(|c| c.score)),
            performance: to_percent(categories.performance.and_then(|c| c.score)),
            progressive_web_app: to_percent(categories.pwa.and_then(|c| c.score)),
            seo: to_percent(categories.seo.and_then(|c| c.score)),
        },
    };

    LocalRun {
        result,
        runtime_error,
    }
}

// The engine scores 0..1; everything downstream talks 0..100.
fn to_percent(score: Option<f64>) -> Option<u8> {
    score.map(|value| (value * 100.0).round() as u8)
}
