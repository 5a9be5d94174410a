use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, ErrorCode};
use crate::models::AuditResult;

pub const RESULTS_FILE: &str = "results.json";

// Everything a later validate or re-notify pass needs from a run.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResults {
    pub tag: String,
    pub generated_at: String,
    pub results: Vec<AuditResult>,
}

pub fn save_results(
    dir: &Path,
    tag: &str,
    results: &[AuditResult],
) -> Result<PathBuf, CheckError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(RESULTS_FILE);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(
        file,
        &SavedResults {
            tag: tag.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            results: results.to_vec(),
        },
    )?;
    info!("results saved to {}", path.display());
    Ok(path)
}

pub fn load_results(dir: &Path) -> Result<SavedResults, CheckError> {
    let path = dir.join(RESULTS_FILE);
    let file = File::open(&path)?;
    let saved = serde_json::from_reader(BufReader::new(file))?;
    Ok(saved)
}

// Helper function to sanitize filenames
pub fn sanitize_filename(url: &str) -> String {
    url.replace(|c: char| !c.is_alphanumeric() && c != '.', "_")
}

// Copies the saved results into the reports bucket, the same way the
// comprehensive report archive has always been shipped.
pub async fn archive_results(bucket: &str, path: &Path, tag: &str) -> Result<(), CheckError> {
    let status = tokio::process::Command::new("aws")
        .args([
            "s3",
            "cp",
            &path.display().to_string(),
            &format!("s3://{}/reports/{}.json", bucket, tag),
            "--endpoint-url",
            "https://0e9b5fad61935c0d6483962f4a522a89.r2.cloudflarestorage.com",
            "--checksum-algorithm",
            "CRC32",
        ])
        .status()
        .await?;
    if !status.success() {
        return Err(CheckError::new(
            ErrorCode::Generic,
            format!("failed to upload {} to {}", path.display(), bucket),
        ));
    }
    info!("results archived to s3://{}/reports/{}.json", bucket, tag);
    Ok(())
}
