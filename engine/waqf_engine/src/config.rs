//! Tunable engine constants.
//!
//! The engine never reads the environment; hosts build an [`EngineConfig`]
//! (see `backend/lifecycle/src/config.rs`) and pass it in where needed.

use serde::{Deserialize, Serialize};

/// Smallest total a portfolio may be submitted with (currency units).
pub const MIN_PORTFOLIO_AMOUNT: f64 = 100.0;
/// Smallest single top-up accepted on an active waqf.
pub const MIN_CONTRIBUTION: f64 = 10.0;
/// Cost of supporting one beneficiary, used by impact projections.
pub const AVERAGE_BENEFICIARY_COST: f64 = 100.0;
/// Revolving lock period used when the donor did not pick one.
pub const DEFAULT_LOCK_PERIOD_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub min_portfolio_amount: f64,
    pub min_contribution: f64,
    pub average_beneficiary_cost: f64,
    pub default_lock_period_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_portfolio_amount: MIN_PORTFOLIO_AMOUNT,
            min_contribution: MIN_CONTRIBUTION,
            average_beneficiary_cost: AVERAGE_BENEFICIARY_COST,
            default_lock_period_months: DEFAULT_LOCK_PERIOD_MONTHS,
        }
    }
}
