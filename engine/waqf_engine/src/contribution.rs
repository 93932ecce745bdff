//! # Contribution acceptance
//!
//! Decides whether an active consumable waqf may take a top-up. The
//! decision dispatches on the spending schedule:
//!
//! | Schedule        | Rejected when                                              |
//! |-----------------|------------------------------------------------------------|
//! | ongoing         | a positive target would be exceeded                        |
//! | phased          | the end date has passed                                    |
//! | milestone-based | every milestone date and the end date (if any) have passed |
//! | immediate       | the end date has passed                                    |
//!
//! An accepted phased top-up with both dates pushes the end date out by
//! `duration × amount / waqf_asset`, keeping the original spend rate.
//!
//! A rejection is a normal [`ContributionResult`], never an error.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::types::{ConsumableWaqfDetails, SpendingSchedule, WaqfProfile, WaqfType};

/// Length of a month for distribution-rate maths.
const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialUpdate {
    pub current_balance: f64,
    pub total_donations: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResult {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_financial: Option<FinancialUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_details: Option<ConsumableWaqfDetails>,
}

impl ContributionResult {
    fn rejected(reason: impl Into<String>) -> Self {
        ContributionResult {
            accepted: false,
            reason: Some(reason.into()),
            updated_financial: None,
            updated_details: None,
        }
    }

    fn accepted(waqf: &WaqfProfile, amount: f64) -> Self {
        ContributionResult {
            accepted: true,
            reason: None,
            updated_financial: Some(FinancialUpdate {
                current_balance: waqf.financial.current_balance + amount,
                total_donations: waqf.financial.total_donations + amount,
            }),
            updated_details: None,
        }
    }

    /// Write an accepted result back onto `waqf`. Rejections leave it as is.
    pub fn apply_to(&self, mut waqf: WaqfProfile) -> WaqfProfile {
        if !self.accepted {
            return waqf;
        }
        if let Some(update) = self.updated_financial {
            waqf.financial.current_balance = update.current_balance;
            waqf.financial.total_donations = update.total_donations;
        }
        if let Some(details) = &self.updated_details {
            waqf.consumable_details = Some(details.clone());
        }
        waqf
    }
}

pub fn can_accept(waqf: &WaqfProfile, amount: f64) -> ContributionResult {
    can_accept_at(waqf, amount, Utc::now())
}

pub fn can_accept_at(waqf: &WaqfProfile, amount: f64, now: DateTime<Utc>) -> ContributionResult {
    if waqf.waqf_type != WaqfType::TemporaryConsumable {
        return ContributionResult::rejected("This waqf is not a consumable type");
    }
    let Some(details) = &waqf.consumable_details else {
        return ContributionResult::rejected("Consumable details are missing");
    };

    let result = match details.spending_schedule {
        SpendingSchedule::Ongoing => ongoing(waqf, details, amount),
        SpendingSchedule::Phased => phased(waqf, details, amount, now),
        SpendingSchedule::MilestoneBased => milestone_based(waqf, details, amount, now),
        SpendingSchedule::Immediate => {
            if is_past(details.end_date, now) {
                ContributionResult::rejected("This waqf has completed its immediate spending period")
            } else {
                ContributionResult::accepted(waqf, amount)
            }
        }
        SpendingSchedule::Unknown => ContributionResult::rejected("Unknown spending schedule"),
    };

    debug!(
        "Contribution of {} to {} ({}): accepted={}",
        amount,
        waqf.name,
        details.spending_schedule.as_str(),
        result.accepted
    );
    result
}

/// Minimum-amount gate followed by [`can_accept_at`].
pub fn check_contribution_at(
    waqf: &WaqfProfile,
    amount: f64,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> ContributionResult {
    if amount < config.min_contribution {
        return ContributionResult::rejected(format!(
            "Minimum contribution is {}",
            config.min_contribution
        ));
    }
    can_accept_at(waqf, amount, now)
}

fn ongoing(waqf: &WaqfProfile, details: &ConsumableWaqfDetails, amount: f64) -> ContributionResult {
    if let Some(target) = details.target_amount() {
        if waqf.financial.total_donations + amount > target {
            return ContributionResult::rejected(format!(
                "Target amount of ${} would be exceeded",
                target
            ));
        }
    }
    ContributionResult::accepted(waqf, amount)
}

fn phased(
    waqf: &WaqfProfile,
    details: &ConsumableWaqfDetails,
    amount: f64,
    now: DateTime<Utc>,
) -> ContributionResult {
    if is_past(details.end_date, now) {
        return ContributionResult::rejected("The phased spending period has ended");
    }

    let mut result = ContributionResult::accepted(waqf, amount);
    if let (Some(start), Some(end)) = (details.start_date, details.end_date) {
        if waqf.waqf_asset > 0.0 {
            let ratio = amount / waqf.waqf_asset;
            let extension_ms = ((end - start).num_milliseconds() as f64 * ratio).round();
            let new_end = Duration::try_milliseconds(extension_ms as i64)
                .and_then(|extension| end.checked_add_signed(extension));
            if let Some(new_end) = new_end {
                result.updated_details = Some(ConsumableWaqfDetails {
                    end_date: Some(new_end),
                    ..details.clone()
                });
            }
        }
    }
    result
}

fn milestone_based(
    waqf: &WaqfProfile,
    details: &ConsumableWaqfDetails,
    amount: f64,
    now: DateTime<Utc>,
) -> ContributionResult {
    let all_milestones_past = !details.milestones.is_empty()
        && details
            .milestones
            .iter()
            .all(|m| is_past(m.target_date, now));
    let end_passed = details.end_date.map_or(true, |end| end < now);

    if all_milestones_past && end_passed {
        return ContributionResult::rejected("All milestones have been completed");
    }
    ContributionResult::accepted(waqf, amount)
}

/// Monthly distribution a consumable waqf should run at after taking
/// `additional`.
pub fn recommended_monthly_distribution_at(
    waqf: &WaqfProfile,
    additional: f64,
    now: DateTime<Utc>,
) -> Option<f64> {
    let details = waqf.consumable_details.as_ref()?;
    let new_balance = waqf.financial.current_balance + additional;

    if let (SpendingSchedule::Phased, Some(_), Some(end)) =
        (details.spending_schedule, details.start_date, details.end_date)
    {
        let remaining_days = (end - now).num_milliseconds() as f64 / 86_400_000.0;
        let remaining_months = (remaining_days / DAYS_PER_MONTH).max(1.0);
        return Some(new_balance / remaining_months);
    }

    details.minimum_monthly_distribution.filter(|m| *m > 0.0)
}

fn is_past(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    date.is_some_and(|d| d < now)
}

pub fn recommended_monthly_distribution(waqf: &WaqfProfile, additional: f64) -> Option<f64> {
    recommended_monthly_distribution_at(waqf, additional, Utc::now())
}
