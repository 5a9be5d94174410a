use log::debug;
use reqwest::Client;
use serde::Serialize;

use crate::error::{CheckError, ErrorCode};
use crate::models::AuditResult;

#[derive(Serialize)]
struct SlackMessage {
    text: String,
    attachments: Vec<Attachment>,
}

#[derive(Serialize)]
struct Attachment {
    color: String,
    fields: Vec<Field>,
}

#[derive(Serialize)]
struct Field {
    title: String,
    value: String,
    short: bool,
}

// One webhook message per result: the average up front, the category
// breakdown as attachment fields.
pub async fn notify_results(webhook_url: &str, results: &[AuditResult]) -> Result<(), CheckError> {
    let client = Client::new();
    for result in results {
        let message = build_message(result);
        let response = client.post(webhook_url).json(&message).send().await?;
        if !response.status().is_success() {
            return Err(CheckError::new(
                ErrorCode::Generic,
                format!("slack webhook returned {}", response.status()),
            ));
        }
        debug!("slack notification sent for {}", result.url);
    }
    Ok(())
}

fn build_message(result: &AuditResult) -> SlackMessage {
    let average = result.scores.average();
    let average_label = match average {
        Some(value) => format!("{:.0}", value),
        None => "-".to_string(),
    };

    let mut text = format!(
        "Lighthouse scores for {}: average {}",
        result.name, average_label
    );
    if let Some(report) = &result.report {
        text.push_str(&format!(" (<{}|full report>)", report));
    }

    let fields = result
        .scores
        .entries()
        .into_iter()
        .map(|(category, score)| Field {
            title: category.to_string(),
            value: match score {
                Some(value) => value.to_string(),
                None => "-".to_string(),
            },
            short: true,
        })
        .collect();

    let color = match average {
        Some(value) if value >= 90.0 => "good",
        Some(value) if value >= 50.0 => "warning",
        Some(_) => "danger",
        None => "#cccccc",
    };

    SlackMessage {
        text,
        attachments: vec![Attachment {
            color: color.to_string(),
            fields,
        }],
    }
}
