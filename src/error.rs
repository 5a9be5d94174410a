use std::fmt;

use thiserror::Error;

use crate::models::AuditResult;

// Error codes mirrored from the queue API, plus the local-only ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NoResults,
    Timeout,
    Unauthorized,
    NoUrls,
    QueueMaxUsedDay,
    Generic,
    Invalid,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoResults => "NO_RESULTS",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NoUrls => "NO_URLS",
            ErrorCode::QueueMaxUsedDay => "QUEUE_MAX_USED_DAY",
            ErrorCode::Generic => "GENERIC",
            ErrorCode::Invalid => "INVALID",
        }
    }

    // The queue reports codes as the same strings it logs server-side.
    pub fn from_remote(code: &str) -> ErrorCode {
        match code {
            "NO_RESULTS" => ErrorCode::NoResults,
            "TIMEOUT" => ErrorCode::Timeout,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "NO_URLS" => ErrorCode::NoUrls,
            "QUEUE_MAX_USED_DAY" => ErrorCode::QueueMaxUsedDay,
            "INVALID" => ErrorCode::Invalid,
            _ => ErrorCode::Generic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Every failure in the tool carries a code callers can branch on and,
// when a run died partway, whatever results had already arrived.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct CheckError {
    pub code: ErrorCode,
    pub message: String,
    pub data: Option<Vec<AuditResult>>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CheckError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> CheckError {
        CheckError {
            code,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(
        code: ErrorCode,
        message: impl Into<String>,
        data: Vec<AuditResult>,
    ) -> CheckError {
        CheckError {
            code,
            message: message.into(),
            data: Some(data),
            source: None,
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> CheckError {
        let code = if err.status().map(|s| s.as_u16()) == Some(401) {
            ErrorCode::Unauthorized
        } else {
            ErrorCode::Generic
        };
        CheckError {
            code,
            message: err.to_string(),
            data: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> CheckError {
        CheckError {
            code: ErrorCode::Generic,
            message: err.to_string(),
            data: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> CheckError {
        CheckError {
            code: ErrorCode::Generic,
            message: err.to_string(),
            data: None,
            source: Some(Box::new(err)),
        }
    }
}
