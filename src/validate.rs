use crate::config::Thresholds;
use crate::error::{CheckError, ErrorCode};
use crate::models::AuditResult;

// Checks every result against the configured minimums. All failures are
// collected first so one run reports every page and category that fell
// short, not just the first.
pub fn validate_scores(results: &[AuditResult], thresholds: &Thresholds) -> Result<bool, CheckError> {
    let mut failures: Vec<String> = Vec::new();

    for result in results {
        let checks = [
            (
                "accessibility",
                result.scores.accessibility,
                thresholds.min_accessibility_score,
            ),
            (
                "best-practices",
                result.scores.best_practices,
                thresholds.min_best_practices_score,
            ),
            (
                "performance",
                result.scores.performance,
                thresholds.min_performance_score,
            ),
            (
                "progressive-web-app",
                result.scores.progressive_web_app,
                thresholds.min_progressive_web_app_score,
            ),
            ("seo", result.scores.seo, thresholds.min_seo_score),
        ];
        for (category, actual, minimum) in checks {
            // a category the audit did not score is not a failure
            if let (Some(actual), Some(minimum)) = (actual, minimum) {
                if actual < minimum {
                    failures.push(format!(
                        "{}: {}: minimum score: {}, actual score: {}",
                        result.url, category, minimum, actual
                    ));
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(true)
    } else {
        Err(CheckError::new(ErrorCode::Invalid, failures.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scores;

    fn result_with_performance(score: Option<u8>) -> AuditResult {
        AuditResult {
            name: "Home".to_string(),
            url: "https://example.com".to_string(),
            report: None,
            local_report: None,
            scores: Scores {
                performance: score,
                ..Scores::default()
            },
        }
    }

    #[test]
    fn score_below_minimum_fails_with_both_numbers() {
        let thresholds = Thresholds {
            min_performance_score: Some(50),
            ..Thresholds::default()
        };
        let err = validate_scores(&[result_with_performance(Some(45))], &thresholds).unwrap_err();
        assert_eq!(err.code, ErrorCode::Invalid);
        assert!(
            err.message.contains("minimum score: 50, actual score: 45"),
            "message was {:?}",
            err.message
        );
    }

    #[test]
    fn score_above_minimum_passes() {
        let thresholds = Thresholds {
            min_performance_score: Some(50),
            ..Thresholds::default()
        };
        assert!(validate_scores(&[result_with_performance(Some(80))], &thresholds).unwrap());
    }

    #[test]
    fn unscored_category_never_fails_a_threshold() {
        let thresholds = Thresholds {
            min_performance_score: Some(50),
            ..Thresholds::default()
        };
        assert!(validate_scores(&[result_with_performance(None)], &thresholds).unwrap());
    }

    #[test]
    fn failures_across_pages_and_categories_aggregate() {
        let thresholds = Thresholds {
            min_performance_score: Some(90),
            min_seo_score: Some(90),
            ..Thresholds::default()
        };
        let mut first = result_with_performance(Some(45));
        first.scores.seo = Some(80);
        let mut second = result_with_performance(Some(50));
        second.url = "https://example.com/shop".to_string();

        let err = validate_scores(&[first, second], &thresholds).unwrap_err();
        assert_eq!(err.message.lines().count(), 3);
        assert!(err.message.contains("https://example.com/shop"));
        assert!(err.message.contains("seo"));
    }
}
