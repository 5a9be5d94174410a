use serde::{Deserialize, Serialize};

use crate::error::CheckError;

// Correlates a queued audit with its eventual result.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: String,
    pub name: String,
    pub url: String,
}

// Fixed five-category score summary for one audited page. A category the
// audit did not score stays None, never zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub accessibility: Option<u8>,
    pub best_practices: Option<u8>,
    pub performance: Option<u8>,
    pub progressive_web_app: Option<u8>,
    pub seo: Option<u8>,
}

impl Scores {
    pub fn entries(&self) -> [(&'static str, Option<u8>); 5] {
        [
            ("accessibility", self.accessibility),
            ("best-practices", self.best_practices),
            ("performance", self.performance),
            ("progressive-web-app", self.progressive_web_app),
            ("seo", self.seo),
        ]
    }

    // Average over whichever categories actually carry a score.
    pub fn average(&self) -> Option<f64> {
        let present: Vec<u8> = self
            .entries()
            .into_iter()
            .filter_map(|(_, score)| score)
            .collect();
        if present.is_empty() {
            return None;
        }
        let sum: f64 = present.iter().map(|score| f64::from(*score)).sum();
        Some(sum / present.len() as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub name: String,
    pub url: String,
    pub report: Option<String>,
    pub local_report: Option<String>,
    pub scores: Scores,
}

// One classified poll tick. Pending keeps whatever results have already
// landed so a timeout can still surface them.
#[derive(Debug)]
pub enum PollOutcome {
    Pending(Vec<AuditResult>),
    Complete(Vec<AuditResult>),
    Failed(CheckError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_skips_absent_categories() {
        let scores = Scores {
            accessibility: Some(90),
            best_practices: None,
            performance: Some(50),
            progressive_web_app: None,
            seo: Some(100),
        };
        assert_eq!(scores.average(), Some(80.0));
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(Scores::default().average(), None);
    }

    #[test]
    fn entries_always_lists_all_five_categories() {
        let entries = Scores::default().entries();
        let names: Vec<&str> = entries.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "accessibility",
                "best-practices",
                "performance",
                "progressive-web-app",
                "seo"
            ]
        );
    }
}
