//! # Completion
//!
//! Decides whether a persisted consumable waqf has reached its end and how
//! far along it is. Checks run in strict order; the first match wins:
//!
//! 1. balance `≤ 0` ⇒ completed, "All funds distributed"
//! 2. end date passed ⇒ completed, "End date reached"
//! 3. positive target amount ⇒ progress `distributed / target`
//! 4. target beneficiaries with beneficiaries recorded ⇒ progress by count
//! 5. start and end date ⇒ elapsed-time progress, never completed
//! 6. otherwise ⇒ progress 0
//!
//! [`evaluate_at`] is total: a waqf without consumable details evaluates as
//! not completed at progress 0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{WaqfProfile, WaqfStatus};

pub const REASON_FUNDS_DISTRIBUTED: &str = "All funds distributed";
pub const REASON_END_DATE: &str = "End date reached";
pub const REASON_TARGET_AMOUNT: &str = "Target amount distributed";
pub const REASON_TARGET_BENEFICIARIES: &str = "Target beneficiaries reached";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub is_completed: bool,
    /// 0-100.
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CompletionStatus {
    fn completed(reason: &str) -> Self {
        CompletionStatus {
            is_completed: true,
            progress: 100.0,
            reason: Some(reason.to_string()),
        }
    }

    fn in_progress(progress: f64) -> Self {
        CompletionStatus {
            is_completed: false,
            progress,
            reason: None,
        }
    }

    /// Completed once `progress` reaches 100.
    fn by_progress(progress: f64, reason: &str) -> Self {
        if progress >= 100.0 {
            Self::completed(reason)
        } else {
            Self::in_progress(progress.max(0.0))
        }
    }
}

pub fn evaluate(waqf: &WaqfProfile) -> CompletionStatus {
    evaluate_at(waqf, Utc::now())
}

pub fn evaluate_at(waqf: &WaqfProfile, now: DateTime<Utc>) -> CompletionStatus {
    let Some(details) = &waqf.consumable_details else {
        return CompletionStatus::in_progress(0.0);
    };
    let financial = &waqf.financial;

    debug!(
        "Completion check for {}: balance={} distributed={} target={:?}",
        waqf.name, financial.current_balance, financial.total_distributed, details.target_amount
    );

    if financial.current_balance <= 0.0 {
        return CompletionStatus::completed(REASON_FUNDS_DISTRIBUTED);
    }

    if details.end_date.is_some_and(|end| end < now) {
        return CompletionStatus::completed(REASON_END_DATE);
    }

    if let Some(target) = details.target_amount() {
        let progress = financial.total_distributed / target * 100.0;
        return CompletionStatus::by_progress(progress, REASON_TARGET_AMOUNT);
    }

    let supported = financial
        .impact_metrics
        .as_ref()
        .map_or(0, |impact| impact.beneficiaries_supported);
    if let Some(target) = details.target_beneficiaries.filter(|t| *t > 0) {
        if supported > 0 {
            let progress = supported as f64 / target as f64 * 100.0;
            return CompletionStatus::by_progress(progress, REASON_TARGET_BENEFICIARIES);
        }
    }

    if let (Some(start), Some(end)) = (details.start_date, details.end_date) {
        return CompletionStatus::in_progress(time_progress(start, end, now));
    }

    CompletionStatus::in_progress(0.0)
}

/// Elapsed share of `[start, end]` as a percentage, clamped to 0-100.
pub fn time_progress(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let total = (end - start).num_milliseconds();
    if total <= 0 {
        return 0.0;
    }
    let elapsed = (now - start).num_milliseconds();
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn settle_status(waqf: &WaqfProfile) -> Option<WaqfStatus> {
    settle_status_at(waqf, Utc::now())
}

/// `Some(Completed)` when an active waqf evaluates as completed.
pub fn settle_status_at(waqf: &WaqfProfile, now: DateTime<Utc>) -> Option<WaqfStatus> {
    if waqf.status != WaqfStatus::Active {
        return None;
    }
    evaluate_at(waqf, now)
        .is_completed
        .then_some(WaqfStatus::Completed)
}
