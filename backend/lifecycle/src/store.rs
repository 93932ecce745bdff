//! Snapshot input and report output on the local filesystem.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};
use waqf_engine::WaqfProfile;

use crate::errors::Result;
use crate::report::SweepReport;

/// Read the persisted waqf profiles. A missing file is an empty snapshot.
pub async fn load_snapshot(path: &Path) -> Result<Vec<WaqfProfile>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Snapshot {} not found; nothing to sweep", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let waqfs: Vec<WaqfProfile> = serde_json::from_str(&raw)?;
    debug!("Loaded {} waqfs from {}", waqfs.len(), path.display());
    Ok(waqfs)
}

/// Write `report` as pretty JSON through a temp file and rename, so readers
/// never see a half-written report.
pub async fn save_report(path: &Path, report: &SweepReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
