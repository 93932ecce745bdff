//! Long-running background task that sweeps the waqf snapshot and reports
//! completions, due distributions and matured revolving waqfs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use waqf_engine::completion::evaluate_at;
use waqf_engine::distribution::{distribution_summary_at, DistributionStatus};
use waqf_engine::maturity::matured_at;
use waqf_engine::{EngineConfig, WaqfProfile, WaqfStatus, WaqfType};

use crate::config::Config;
use crate::errors::Result;
use crate::report::{SweepAction, SweepRecord, SweepReport};
use crate::store;

/// Spawn the sweeper loop as a background [`tokio`] task.
pub async fn run(config: Arc<Config>) {
    info!(
        "Sweeper starting: snapshot {}, every {}s",
        config.snapshot_path.display(),
        config.sweep_interval_secs
    );

    loop {
        if let Err(e) = sweep_once(&config).await {
            error!("Sweep error: {e}");
        }
        tokio::time::sleep(Duration::from_secs(config.sweep_interval_secs)).await;
    }
}

pub async fn sweep_once(config: &Config) -> Result<SweepReport> {
    sweep_once_at(config, Utc::now()).await
}

/// Load the snapshot, classify every waqf, and save the report.
pub async fn sweep_once_at(config: &Config, now: DateTime<Utc>) -> Result<SweepReport> {
    let waqfs = store::load_snapshot(&config.snapshot_path).await?;
    let report = sweep(&waqfs, &config.engine, now);
    store::save_report(&config.report_path, &report).await?;

    info!(
        "Swept {} waqfs: {} completed, {} distributions due, {} matured, {} unchanged",
        waqfs.len(),
        report.counts.completed,
        report.counts.distribution_due,
        report.counts.matured,
        report.counts.unchanged
    );
    Ok(report)
}

/// Classify `waqfs` as of `now`. Only active waqfs can produce a record.
pub fn sweep(waqfs: &[WaqfProfile], engine: &EngineConfig, now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::new(now);
    for waqf in waqfs {
        match classify(waqf, engine, now) {
            Some(record) => {
                debug!("{} -> {}", waqf.name, record.action.as_str());
                report.record(record);
            }
            None => report.unchanged(),
        }
    }
    report
}

fn classify(waqf: &WaqfProfile, engine: &EngineConfig, now: DateTime<Utc>) -> Option<SweepRecord> {
    if waqf.status != WaqfStatus::Active {
        return None;
    }
    let record = |action: SweepAction| SweepRecord {
        waqf_id: waqf.id.clone(),
        name: waqf.name.clone(),
        action,
        reason: None,
        progress: None,
        due_date: None,
        amount: None,
    };

    match waqf.waqf_type {
        WaqfType::TemporaryConsumable => {
            let completion = evaluate_at(waqf, now);
            if completion.is_completed {
                return Some(SweepRecord {
                    reason: completion.reason,
                    progress: Some(completion.progress),
                    ..record(SweepAction::Completed)
                });
            }
            let summary = distribution_summary_at(waqf, now);
            (summary.status == DistributionStatus::Ready).then(|| SweepRecord {
                progress: Some(summary.progress),
                due_date: summary.next_distribution,
                amount: Some(summary.planned_amount()),
                ..record(SweepAction::DistributionDue)
            })
        }
        WaqfType::TemporaryRevolving => {
            let maturity = matured_at(waqf, engine, now)?;
            Some(SweepRecord {
                due_date: Some(maturity),
                amount: Some(waqf.financial.current_balance),
                ..record(SweepAction::Matured)
            })
        }
        WaqfType::Permanent | WaqfType::Hybrid => None,
    }
}
