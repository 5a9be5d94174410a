use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{CheckError, ErrorCode};
use crate::models::AuditResult;

// The comments API echoes the created comment back; an id means it stuck.
#[derive(Debug, Deserialize)]
struct CommentResponse {
    id: Option<u64>,
}

pub async fn post_score_comment(
    comments_url: &str,
    token: &str,
    results: &[AuditResult],
) -> Result<(), CheckError> {
    let body = comment_markdown(results);
    let client = Client::new();
    let response = client
        .post(comments_url)
        .header("authorization", format!("token {}", token))
        .header("user-agent", "lightcheck")
        .json(&json!({ "body": body }))
        .send()
        .await?;

    let status = response.status();
    let parsed: CommentResponse = response.json().await?;
    match parsed.id {
        Some(_) => Ok(()),
        None => Err(CheckError::new(
            ErrorCode::Generic,
            format!("PR comment was not created (HTTP {})", status),
        )),
    }
}

// Markdown score table, one row per audited page.
pub fn comment_markdown(results: &[AuditResult]) -> String {
    let mut out = String::from("## Lighthouse scores\n\n");
    out.push_str("| URL | Accessibility | Best practices | Performance | PWA | SEO |\n");
    out.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for result in results {
        let cells: Vec<String> = result
            .scores
            .entries()
            .into_iter()
            .map(|(_, score)| match score {
                Some(value) => value.to_string(),
                None => "-".to_string(),
            })
            .collect();
        out.push_str(&format!("| {} | {} |\n", result.url, cells.join(" | ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scores;

    #[test]
    fn markdown_has_one_row_per_result_and_dashes_for_gaps() {
        let results = vec![
            AuditResult {
                name: "Home".to_string(),
                url: "https://example.com".to_string(),
                report: None,
                local_report: None,
                scores: Scores {
                    accessibility: Some(98),
                    best_practices: Some(93),
                    performance: Some(71),
                    progressive_web_app: None,
                    seo: Some(100),
                },
            },
            AuditResult {
                name: "Shop".to_string(),
                url: "https://example.com/shop".to_string(),
                report: None,
                local_report: None,
                scores: Scores::default(),
            },
        ];
        let markdown = comment_markdown(&results);
        assert!(markdown.starts_with("## Lighthouse scores"));
        assert!(markdown.contains("| https://example.com | 98 | 93 | 71 | - | 100 |"));
        assert!(markdown.contains("| https://example.com/shop | - | - | - | - | - |"));
    }
}
