//! # Impact projection
//!
//! Beneficiary-count estimates derived from resolved instrument amounts.
//!
//! Model constants:
//!
//! | Constant                      | Value     |
//! |-------------------------------|-----------|
//! | consumable deployment horizon | 24 months |
//! | permanent annual return       | 7%        |
//! | revolving annual return       | 5%        |
//! | revolving lock                | 5 years   |
//!
//! Year 10 reuses the year-5 revolving return: the revolving principal
//! matures at year 5 and is not compounded afterwards.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::{resolve, ResolvedAllocation};
use crate::config::{EngineConfig, AVERAGE_BENEFICIARY_COST};
use crate::types::Portfolio;

pub const CONSUMABLE_DEPLOYMENT_MONTHS: u32 = 24;
pub const PERMANENT_ANNUAL_RETURN: f64 = 0.07;
pub const REVOLVING_ANNUAL_RETURN: f64 = 0.05;
pub const REVOLVING_LOCK_YEARS: u32 = 5;
/// Years counted after year 10 for the lifetime heuristic (100-year horizon).
const LIFETIME_TAIL_YEARS: u64 = 90;
/// Share of the consumable amount deployed in the first year.
const YEAR_ONE_DEPLOYMENT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactProjection {
    pub year1_beneficiaries: u64,
    pub year5_beneficiaries: u64,
    pub year10_beneficiaries: u64,
    pub lifetime_beneficiaries: u64,
    pub annual_beneficiaries_after10_years: u64,
    pub consumable_deployment_months: u32,
    pub revolving_maturity_date: DateTime<Utc>,
    /// Percent, e.g. `7.0`.
    pub permanent_annual_return: f64,
}

pub fn project(portfolio: &Portfolio, config: &EngineConfig) -> ImpactProjection {
    project_at(portfolio, config, Utc::now())
}

/// Project `portfolio` at `config.average_beneficiary_cost` dollars per beneficiary.
pub fn project_at(
    portfolio: &Portfolio,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> ImpactProjection {
    project_amounts_at(&resolve(portfolio), config.average_beneficiary_cost, now)
}

/// Project from already-resolved amounts. A non-positive cost falls back to
/// [`AVERAGE_BENEFICIARY_COST`].
pub fn project_amounts_at(
    amounts: &ResolvedAllocation,
    average_beneficiary_cost: f64,
    now: DateTime<Utc>,
) -> ImpactProjection {
    let cost = if average_beneficiary_cost > 0.0 {
        average_beneficiary_cost
    } else {
        AVERAGE_BENEFICIARY_COST
    };
    let beneficiaries = |dollars: f64| -> u64 {
        let count = (dollars / cost).round();
        if count.is_finite() && count > 0.0 {
            count as u64
        } else {
            0
        }
    };

    let permanent_return = amounts.permanent_amount * PERMANENT_ANNUAL_RETURN;
    let revolving_return = amounts.revolving_amount * REVOLVING_ANNUAL_RETURN;

    let year1 = amounts.consumable_amount * YEAR_ONE_DEPLOYMENT + permanent_return + revolving_return;
    let year5_revolving = revolving_return * f64::from(REVOLVING_LOCK_YEARS);
    let year5 = amounts.consumable_amount + permanent_return * 5.0 + year5_revolving;
    let year10 = amounts.consumable_amount + permanent_return * 10.0 + year5_revolving;

    let year10_beneficiaries = beneficiaries(year10);
    let annual_after_10 = beneficiaries(permanent_return);

    ImpactProjection {
        year1_beneficiaries: beneficiaries(year1),
        year5_beneficiaries: beneficiaries(year5),
        year10_beneficiaries,
        lifetime_beneficiaries: year10_beneficiaries
            .saturating_add(annual_after_10.saturating_mul(LIFETIME_TAIL_YEARS)),
        annual_beneficiaries_after10_years: annual_after_10,
        consumable_deployment_months: CONSUMABLE_DEPLOYMENT_MONTHS,
        revolving_maturity_date: now
            .checked_add_months(Months::new(REVOLVING_LOCK_YEARS * 12))
            .unwrap_or(now),
        permanent_annual_return: PERMANENT_ANNUAL_RETURN * 100.0,
    }
}
