use std::time::Duration;

use log::{info, warn};
use reqwest::Client;
use serde_json::json;

use crate::config::CheckConfig;
use crate::error::{CheckError, ErrorCode};
use crate::models::queue::{PagesResponse, QueueItem, QueueSummary, TriggerResponse};
use crate::models::{JobHandle, PageRecord, QueueItemsResponse};
use crate::poller::StatusSource;

// Client for the audit queue API. One instance per run; the token and
// base URL never change mid-flight.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &CheckConfig, token: &str) -> Result<ApiClient, CheckError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    // Pages registered for the account; used when no URLs were passed.
    pub async fn fetch_pages(&self) -> Result<Vec<PageRecord>, CheckError> {
        let response = self
            .http
            .get(format!("{}/pages", self.base_url))
            .header("Authorization", &self.token)
            .send()
            .await?;
        if response.status().as_u16() == 401 {
            return Err(CheckError::new(
                ErrorCode::Unauthorized,
                "the provided API token was rejected",
            ));
        }
        let body: PagesResponse = response.json().await?;
        let pages = body.data.map(|data| data.pages).unwrap_or_default();
        if pages.is_empty() {
            return Err(CheckError::new(
                ErrorCode::NoUrls,
                "no URLs are registered for this account",
            ));
        }
        Ok(pages)
    }

    // Enqueues one audit per page and returns a handle per accepted page.
    // Rejections (daily quota and friends) are logged verbatim and only
    // become fatal when nothing was accepted at all.
    pub async fn trigger_audits(
        &self,
        pages: &[PageRecord],
        tag: &str,
    ) -> Result<Vec<JobHandle>, CheckError> {
        let ids: Vec<&str> = pages.iter().map(|page| page.id.as_str()).collect();
        let body = json!({
            "tag": tag,
            "pages": ids.join(","),
            "source": "lightcheck",
            "type": "lighthouseAudit",
        });

        let response = self
            .http
            .post(format!("{}/queue/items", self.base_url))
            .header("Authorization", &self.token)
            .json(&body)
            .send()
            .await?;
        if response.status().as_u16() == 401 {
            return Err(CheckError::new(
                ErrorCode::Unauthorized,
                "the provided API token was rejected",
            ));
        }

        let body: TriggerResponse = response.json().await?;
        let queue = body.data.map(|data| data.queue).ok_or_else(|| {
            CheckError::new(ErrorCode::Generic, "trigger response carried no queue data")
        })?;
        let errors = queue.errors;
        let (handles, rejections) = partition_queue(queue);

        for item in &rejections {
            let label = item
                .name
                .as_deref()
                .or(item.url.as_deref())
                .unwrap_or("page");
            let reason = item
                .message
                .as_deref()
                .or(item.code.as_deref())
                .unwrap_or("unknown error");
            warn!("queue rejected {}: {}", label, reason);
        }

        if handles.is_empty() {
            let code = rejections
                .iter()
                .find_map(|item| item.code.as_deref())
                .map(ErrorCode::from_remote)
                .unwrap_or(ErrorCode::NoResults);
            let message = rejections
                .iter()
                .find_map(|item| item.message.clone())
                .unwrap_or_else(|| "the queue accepted none of the requested audits".to_string());
            return Err(CheckError::new(code, message));
        }

        info!(
            "queued {} of {} page(s), {} rejected",
            handles.len(),
            pages.len(),
            errors
        );
        Ok(handles)
    }

    pub async fn fetch_queue_items(
        &self,
        ids: &[String],
    ) -> Result<QueueItemsResponse, CheckError> {
        let response = self
            .http
            .get(format!("{}/queue/items?ids={}", self.base_url, ids.join(",")))
            .header("Authorization", &self.token)
            .send()
            .await?;
        if response.status().as_u16() == 401 {
            return Err(CheckError::new(
                ErrorCode::Unauthorized,
                "the provided API token was rejected",
            ));
        }
        let body = response.json().await?;
        Ok(body)
    }
}

impl StatusSource for ApiClient {
    async fn fetch(&self, ids: &[String]) -> Result<QueueItemsResponse, CheckError> {
        self.fetch_queue_items(ids).await
    }
}

// An entry with an id and no error code was accepted; everything else is
// a rejection.
fn partition_queue(queue: QueueSummary) -> (Vec<JobHandle>, Vec<QueueItem>) {
    let mut handles = Vec::new();
    let mut rejections = Vec::new();
    for item in queue.results {
        match (&item.id, &item.code) {
            (Some(id), None) => handles.push(JobHandle {
                id: id.clone(),
                name: item.name.clone().unwrap_or_default(),
                url: item.url.clone().unwrap_or_default(),
            }),
            _ => rejections.push(item),
        }
    }
    (handles, rejections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(id: &str, url: &str) -> QueueItem {
        QueueItem {
            id: Some(id.to_string()),
            name: Some(url.to_string()),
            url: Some(url.to_string()),
            code: None,
            message: None,
        }
    }

    fn rejected(url: &str, code: &str, message: &str) -> QueueItem {
        QueueItem {
            id: None,
            name: None,
            url: Some(url.to_string()),
            code: Some(code.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn partition_keeps_accepted_order_and_splits_rejections() {
        let queue = QueueSummary {
            results: vec![
                accepted("a1", "https://example.com"),
                rejected(
                    "https://example.com/shop",
                    "QUEUE_MAX_USED_DAY",
                    "Daily audit limit reached.",
                ),
                accepted("a2", "https://example.com/docs"),
            ],
            errors: 1,
        };
        let (handles, rejections) = partition_queue(queue);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].id, "a1");
        assert_eq!(handles[1].id, "a2");
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].code.as_deref(), Some("QUEUE_MAX_USED_DAY"));
    }

    #[test]
    fn entry_with_code_is_rejected_even_if_it_has_an_id() {
        let mut item = accepted("a1", "https://example.com");
        item.code = Some("QUEUE_MAX_USED_DAY".to_string());
        let queue = QueueSummary {
            results: vec![item],
            errors: 1,
        };
        let (handles, rejections) = partition_queue(queue);
        assert!(handles.is_empty());
        assert_eq!(rejections.len(), 1);
    }
}
