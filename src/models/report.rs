use serde::Deserialize;

// Shape of the JSON report the lighthouse CLI writes. Only the slice we
// read is modeled; the report itself is a few megabytes of audit detail.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalReport {
    pub runtime_error: Option<RuntimeError>,
    pub categories: LocalCategories,
}

// The engine can exit zero and still have failed to reach the page; that
// failure lands here instead of the exit status.
#[derive(Debug, Deserialize)]
pub struct RuntimeError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalCategories {
    pub accessibility: Option<CategoryScore>,
    #[serde(rename = "best-practices")]
    pub best_practices: Option<CategoryScore>,
    pub performance: Option<CategoryScore>,
    pub pwa: Option<CategoryScore>,
    pub seo: Option<CategoryScore>,
}

// Category scores come out of the engine as 0..1 floats.
#[derive(Debug, Deserialize)]
pub struct CategoryScore {
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_with_runtime_error() {
        let body = r#"{
            "requestedUrl": "https://example.com",
            "runtimeError": { "code": "NO_FCP", "message": "The page did not paint any content." },
            "categories": {
                "performance": { "score": null },
                "seo": { "score": 0.92 }
            }
        }"#;
        let report: LocalReport = serde_json::from_str(body).unwrap();
        let runtime_error = report.runtime_error.unwrap();
        assert_eq!(runtime_error.code.as_deref(), Some("NO_FCP"));
        assert!(report.categories.accessibility.is_none());
        assert_eq!(report.categories.seo.unwrap().score, Some(0.92));
    }
}
