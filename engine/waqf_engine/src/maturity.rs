//! Revolving waqf maturity and contribution tranches.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::{ContributionTranche, WaqfProfile, WaqfStatus, WaqfType};

/// `start` plus `lock_period_months` calendar months. The day is clamped to
/// the end of shorter months (Jan 31 + 1 month = Feb 28/29).
pub fn maturity_date(lock_period_months: u32, start: DateTime<Utc>) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(lock_period_months))
        .unwrap_or(start)
}

pub fn has_matured(maturity: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= maturity
}

/// Elapsed share of the lock period, clamped to 0-100. A zero-length lock
/// is fully mature.
pub fn maturity_progress(start: DateTime<Utc>, maturity: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let total = (maturity - start).num_milliseconds();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (now - start).num_milliseconds();
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrancheState {
    Locked,
    Matured,
    Returned,
}

/// A returned tranche stays returned; otherwise it is matured once its
/// maturity date is reached. A tranche with no maturity date is locked.
pub fn tranche_state(tranche: &ContributionTranche, now: DateTime<Utc>) -> TrancheState {
    if tranche.is_returned {
        TrancheState::Returned
    } else if tranche.maturity_date.is_some_and(|m| has_matured(m, now)) {
        TrancheState::Matured
    } else {
        TrancheState::Locked
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevolvingBalance {
    pub total_principal: f64,
    pub locked_balance: f64,
    pub matured_balance: f64,
    pub returned_balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_maturity_date: Option<DateTime<Utc>>,
    pub next_maturity_amount: f64,
}

/// Break a revolving waqf's principal down by tranche state.
pub fn revolving_balance(waqf: &WaqfProfile, now: DateTime<Utc>) -> RevolvingBalance {
    let mut balance = RevolvingBalance {
        total_principal: waqf.financial.total_donations,
        ..RevolvingBalance::default()
    };
    let tranches = waqf
        .revolving_details
        .as_ref()
        .map(|details| details.contribution_tranches.as_slice())
        .unwrap_or_default();

    let mut next: Option<&ContributionTranche> = None;
    for tranche in tranches {
        match tranche_state(tranche, now) {
            TrancheState::Returned => balance.returned_balance += tranche.amount,
            TrancheState::Matured => balance.matured_balance += tranche.amount,
            TrancheState::Locked => {
                balance.locked_balance += tranche.amount;
                if let Some(date) = tranche.maturity_date {
                    if next.and_then(|n| n.maturity_date).map_or(true, |d| date < d) {
                        next = Some(tranche);
                    }
                }
            }
        }
    }

    if let Some(tranche) = next {
        balance.next_maturity_date = tranche.maturity_date;
        balance.next_maturity_amount = tranche.amount;
    }
    balance
}

/// When the lock on a revolving waqf ends: the stored maturity date, else
/// `created_at` plus the recorded lock period, or plus
/// `config.default_lock_period_months` when the record has no revolving details.
pub fn effective_maturity(waqf: &WaqfProfile, config: &EngineConfig) -> Option<DateTime<Utc>> {
    let (stored, lock) = match &waqf.revolving_details {
        Some(details) => (details.maturity_date, details.lock_period_months),
        None => (None, config.default_lock_period_months),
    };
    stored.or_else(|| waqf.created_at.map(|created| maturity_date(lock, created)))
}

fn active_revolving_maturity(waqf: &WaqfProfile, config: &EngineConfig) -> Option<DateTime<Utc>> {
    if waqf.waqf_type != WaqfType::TemporaryRevolving || waqf.status != WaqfStatus::Active {
        return None;
    }
    effective_maturity(waqf, config)
}

/// Maturity date of an active revolving waqf whose lock is over.
pub fn matured_at(
    waqf: &WaqfProfile,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    active_revolving_maturity(waqf, config).filter(|m| has_matured(*m, now))
}

/// Active revolving waqfs whose lock period is over.
pub fn matured_waqfs<'a>(
    waqfs: &'a [WaqfProfile],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Vec<&'a WaqfProfile> {
    waqfs
        .iter()
        .filter(|waqf| matured_at(waqf, config, now).is_some())
        .collect()
}

/// Active revolving waqfs maturing after `now` and within `days`.
pub fn maturing_within<'a>(
    waqfs: &'a [WaqfProfile],
    days: i64,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Vec<&'a WaqfProfile> {
    let threshold = Duration::try_days(days)
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(now);
    waqfs
        .iter()
        .filter(|waqf| {
            active_revolving_maturity(waqf, config).is_some_and(|m| m > now && m <= threshold)
        })
        .collect()
}
