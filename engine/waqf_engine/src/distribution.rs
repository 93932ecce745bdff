//! Monthly payouts from consumable waqfs.
//!
//! A distribution moves money from the current balance to
//! `total_distributed`, then re-runs [`crate::completion`] so a waqf that
//! paid out its last funds is settled as completed in the same step.

use std::cmp::Ordering;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::completion::{evaluate_at, CompletionStatus};
use crate::errors::{EngineError, Result};
use crate::types::{FinancialMetrics, SpendingSchedule, WaqfProfile, WaqfStatus, WaqfType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionStatus {
    Pending,
    Ready,
    Completed,
}

impl DistributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waqf_id: Option<String>,
    pub name: String,
    pub schedule: SpendingSchedule,
    /// `None` once the waqf is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_distribution: Option<DateTime<Utc>>,
    pub monthly_amount: f64,
    pub total_distributed: f64,
    pub current_balance: f64,
    pub progress: f64,
    pub status: DistributionStatus,
}

impl DistributionSummary {
    /// What the next payout would be: the monthly amount capped by the
    /// balance.
    pub fn planned_amount(&self) -> f64 {
        self.monthly_amount.min(self.current_balance).max(0.0)
    }
}

/// Result of [`apply_distribution_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionOutcome {
    pub waqf: WaqfProfile,
    pub amount: f64,
    pub completion: CompletionStatus,
}

impl DistributionOutcome {
    pub fn financial(&self) -> &FinancialMetrics {
        &self.waqf.financial
    }

    pub fn status(&self) -> WaqfStatus {
        self.waqf.status
    }
}

pub fn apply_distribution(waqf: &WaqfProfile, amount: f64) -> Result<DistributionOutcome> {
    apply_distribution_at(waqf, amount, Utc::now())
}

/// Pay `amount` out of a consumable waqf.
///
/// Fails with [`EngineError::InvalidAmount`] for a non-positive amount,
/// [`EngineError::InsufficientBalance`] when the balance cannot cover it,
/// and [`EngineError::InvalidStatusTransition`] when the waqf would complete
/// from a status that cannot move to `Completed`.
pub fn apply_distribution_at(
    waqf: &WaqfProfile,
    amount: f64,
    now: DateTime<Utc>,
) -> Result<DistributionOutcome> {
    if waqf.waqf_type != WaqfType::TemporaryConsumable {
        return Err(EngineError::NotConsumable);
    }
    if amount.is_nan() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(amount));
    }
    let available = waqf.financial.current_balance;
    if amount > available {
        return Err(EngineError::InsufficientBalance {
            requested: amount,
            available,
        });
    }

    let mut updated = waqf.clone();
    let financial = &mut updated.financial;
    financial.total_distributed += amount;
    financial.recompute_balance();
    let impact = financial.impact_metrics.get_or_insert_with(Default::default);
    impact.projects_completed = impact.projects_completed.saturating_add(1);
    impact.last_distribution_date = Some(now);

    let completion = evaluate_at(&updated, now);
    if completion.is_completed {
        updated.status = updated.status.transition_to(WaqfStatus::Completed)?;
    }
    updated.updated_at = Some(now);

    debug!(
        "Distributed {} from {}: balance={} completed={}",
        amount, updated.name, updated.financial.current_balance, completion.is_completed
    );

    Ok(DistributionOutcome {
        waqf: updated,
        amount,
        completion,
    })
}

/// When the next monthly payout falls due: one calendar month after the
/// last distribution, else after the start date, else after creation.
pub fn next_distribution_date(waqf: &WaqfProfile, now: DateTime<Utc>) -> DateTime<Utc> {
    let last = waqf
        .financial
        .impact_metrics
        .as_ref()
        .and_then(|impact| impact.last_distribution_date)
        .or_else(|| waqf.consumable_details.as_ref().and_then(|d| d.start_date))
        .or(waqf.created_at)
        .unwrap_or(now);
    last.checked_add_months(Months::new(1)).unwrap_or(last)
}

pub fn distribution_summary(waqf: &WaqfProfile) -> DistributionSummary {
    distribution_summary_at(waqf, Utc::now())
}

pub fn distribution_summary_at(waqf: &WaqfProfile, now: DateTime<Utc>) -> DistributionSummary {
    let completion = evaluate_at(waqf, now);
    let next = next_distribution_date(waqf, now);

    let status = if completion.is_completed {
        DistributionStatus::Completed
    } else if now >= next {
        DistributionStatus::Ready
    } else {
        DistributionStatus::Pending
    };

    let details = waqf.consumable_details.as_ref();
    DistributionSummary {
        waqf_id: waqf.id.clone(),
        name: waqf.name.clone(),
        schedule: details.map_or(SpendingSchedule::Unknown, |d| d.spending_schedule),
        next_distribution: (status != DistributionStatus::Completed).then_some(next),
        monthly_amount: details
            .and_then(|d| d.minimum_monthly_distribution)
            .unwrap_or(0.0),
        total_distributed: waqf.financial.total_distributed,
        current_balance: waqf.financial.current_balance,
        progress: completion.progress,
        status,
    }
}

/// Ready first, then by next distribution date; completed summaries (no
/// next date) go last.
pub fn order_summaries(summaries: &mut [DistributionSummary]) {
    summaries.sort_by(|a, b| {
        let a_ready = a.status == DistributionStatus::Ready;
        let b_ready = b.status == DistributionStatus::Ready;
        b_ready
            .cmp(&a_ready)
            .then_with(|| match (a.next_distribution, b.next_distribution) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}
