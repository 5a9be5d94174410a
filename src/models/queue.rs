use serde::Deserialize;

use crate::models::audit::{AuditResult, Scores};

// GET /pages response: { status, data: { page: [...] } }
#[derive(Debug, Clone, Deserialize)]
pub struct PagesResponse {
    pub data: Option<PagesData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagesData {
    #[serde(rename = "page")]
    pub pages: Vec<PageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub url: String,
}

// POST /queue/items response: { data: { queue: { results: [...], errors: N } } }
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerResponse {
    pub data: Option<TriggerData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerData {
    pub queue: QueueSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueSummary {
    pub results: Vec<QueueItem>,
    pub errors: u32,
}

// One accepted or rejected queue entry. Rejections carry a code and the
// verbatim server message instead of an id.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

// GET /queue/items response: { status, data: { lighthouseaudit: [...] } }.
// A body status >= 400 travels through the same shape with code/message set.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueItemsResponse {
    pub status: u16,
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Option<QueueItemsData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueItemsData {
    #[serde(rename = "lighthouseaudit")]
    pub lighthouse_audit: Vec<RawAuditPayload>,
}

// Raw per-URL payload as the queue returns it; the scoreXxx fields get
// renamed into the stable five-key map.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuditPayload {
    pub name: Option<String>,
    pub url: Option<String>,
    pub report: Option<String>,
    pub score_accessibility: Option<u8>,
    pub score_best_practices: Option<u8>,
    pub score_performance: Option<u8>,
    pub score_progressive_web_app: Option<u8>,
    pub score_seo: Option<u8>,
}

impl RawAuditPayload {
    pub fn into_result(self) -> AuditResult {
        let url = self.url.unwrap_or_default();
        let name = self.name.unwrap_or_else(|| url.clone());
        AuditResult {
            name,
            url,
            report: self.report,
            local_report: None,
            scores: Scores {
                accessibility: self.score_accessibility,
                best_practices: self.score_best_practices,
                performance: self.score_performance,
                progressive_web_app: self.score_progressive_web_app,
                seo: self.score_seo,
            },
        }
    }
}
