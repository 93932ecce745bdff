//! # Allocation
//!
//! Turns a [`Portfolio`] into realized dollars per cause and per instrument.
//!
//! | Mode                   | Cause amount                                              |
//! |------------------------|-----------------------------------------------------------|
//! | simple / advanced      | `total × portfolioPercentage / 100` if set and positive, else `item.totalAmount` |
//! | balanced (with global) | `total × weight(item) / Σ weight`, else `item.totalAmount` when `Σ weight = 0` |
//!
//! `weight(item)` is the sum of the global percentages of exactly those
//! instruments the item's own allocation marks non-zero, so causes that can
//! hold more of the globally favoured instruments receive a larger share and
//! the realized mix tracks the donor's global target.
//!
//! Each cause amount is then split as `amount × allocation.instrument / 100`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{AllocationMode, Cause, Instrument, Portfolio, PortfolioAllocation, PortfolioItem};

/// Allowed drift of an allocation triple from 100%.
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

impl PortfolioAllocation {
    pub const ALL_PERMANENT: PortfolioAllocation = PortfolioAllocation::new(100.0, 0.0, 0.0);
    pub const DEFAULT_BALANCED: PortfolioAllocation = PortfolioAllocation::new(40.0, 30.0, 30.0);
    pub const EQUAL: PortfolioAllocation = PortfolioAllocation::new(33.33, 33.33, 33.34);

    pub const fn new(permanent: f64, consumable: f64, revolving: f64) -> Self {
        PortfolioAllocation {
            permanent,
            consumable,
            revolving,
        }
    }

    /// 100% in `instrument`.
    pub fn single(instrument: Instrument) -> Self {
        let mut allocation = PortfolioAllocation::default();
        allocation.set(instrument, 100.0);
        allocation
    }

    pub fn get(&self, instrument: Instrument) -> f64 {
        match instrument {
            Instrument::Permanent => self.permanent,
            Instrument::TemporaryConsumable => self.consumable,
            Instrument::TemporaryRevolving => self.revolving,
        }
    }

    pub fn set(&mut self, instrument: Instrument, value: f64) {
        match instrument {
            Instrument::Permanent => self.permanent = value,
            Instrument::TemporaryConsumable => self.consumable = value,
            Instrument::TemporaryRevolving => self.revolving = value,
        }
    }

    pub fn sum(&self) -> f64 {
        self.permanent + self.consumable + self.revolving
    }

    pub fn is_complete(&self) -> bool {
        (self.sum() - 100.0).abs() <= ALLOCATION_TOLERANCE
    }

    /// Instruments holding a strictly positive share.
    pub fn active_instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        Instrument::ALL
            .into_iter()
            .filter(move |instrument| self.get(*instrument) > 0.0)
    }

    /// Rescale to 100%. A complete triple is returned as is; an all-zero
    /// triple becomes [`PortfolioAllocation::EQUAL`].
    pub fn normalized(&self) -> Self {
        if self.is_complete() {
            return *self;
        }
        let total = self.sum();
        if total > 0.0 {
            return PortfolioAllocation::new(
                self.permanent / total * 100.0,
                self.consumable / total * 100.0,
                self.revolving / total * 100.0,
            );
        }
        PortfolioAllocation::EQUAL
    }

    /// Zero the instruments `cause` cannot hold, then renormalise. When
    /// nothing supported is left, split evenly over what the cause supports.
    pub fn restricted_to(&self, cause: &Cause) -> Self {
        let mut restricted = *self;
        for instrument in Instrument::ALL {
            if !cause.supports(instrument) {
                restricted.set(instrument, 0.0);
            }
        }
        if restricted.sum() <= 0.0 {
            return PortfolioAllocation::equal_for(cause);
        }
        restricted.normalized()
    }

    /// Equal split over the instruments `cause` supports.
    pub fn equal_for(cause: &Cause) -> Self {
        let supported: Vec<Instrument> = Instrument::ALL
            .into_iter()
            .filter(|instrument| cause.supports(*instrument))
            .collect();
        let share = 100.0 / supported.len() as f64;
        let mut allocation = PortfolioAllocation::default();
        for instrument in supported {
            allocation.set(instrument, share);
        }
        allocation
    }
}

/// Realized dollars for one cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseAmount {
    pub cause_id: String,
    pub amount: f64,
    pub permanent: f64,
    pub consumable: f64,
    pub revolving: f64,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAllocation {
    pub permanent_amount: f64,
    pub consumable_amount: f64,
    pub revolving_amount: f64,
    pub per_cause_amounts: Vec<CauseAmount>,
}

impl ResolvedAllocation {
    pub fn amount(&self, instrument: Instrument) -> f64 {
        match instrument {
            Instrument::Permanent => self.permanent_amount,
            Instrument::TemporaryConsumable => self.consumable_amount,
            Instrument::TemporaryRevolving => self.revolving_amount,
        }
    }

    pub fn total(&self) -> f64 {
        self.permanent_amount + self.consumable_amount + self.revolving_amount
    }

    pub fn cause_amount(&self, cause_id: &str) -> Option<f64> {
        self.per_cause_amounts
            .iter()
            .find(|c| c.cause_id == cause_id)
            .map(|c| c.amount)
    }
}

/// Compute realized dollars per cause and per instrument. Total: zero
/// inputs give zero outputs.
pub fn resolve(portfolio: &Portfolio) -> ResolvedAllocation {
    let mut resolved = ResolvedAllocation::default();

    for (item, amount) in portfolio.items.iter().zip(cause_amounts(portfolio)) {
        let share = |pct: f64| amount * pct / 100.0;
        let cause = CauseAmount {
            cause_id: item.cause.id.clone(),
            amount,
            permanent: share(item.allocation.permanent),
            consumable: share(item.allocation.consumable),
            revolving: share(item.allocation.revolving),
        };

        resolved.permanent_amount += cause.permanent;
        resolved.consumable_amount += cause.consumable;
        resolved.revolving_amount += cause.revolving;
        resolved.per_cause_amounts.push(cause);
    }

    resolved
}

/// Realized dollars per item, in item order.
pub fn cause_amounts(portfolio: &Portfolio) -> Vec<f64> {
    match (portfolio.allocation_mode, portfolio.global_allocation) {
        (AllocationMode::Balanced, Some(global)) => balanced_amounts(portfolio, &global),
        _ => portfolio
            .items
            .iter()
            .map(|item| direct_amount(item, portfolio.total_amount))
            .collect(),
    }
}

/// Sum of the global percentages for the instruments `allocation` uses.
pub fn cause_weight(allocation: &PortfolioAllocation, global: &PortfolioAllocation) -> f64 {
    allocation
        .active_instruments()
        .map(|instrument| global.get(instrument))
        .sum()
}

fn balanced_amounts(portfolio: &Portfolio, global: &PortfolioAllocation) -> Vec<f64> {
    let weights: Vec<f64> = portfolio
        .items
        .iter()
        .map(|item| cause_weight(&item.allocation, global))
        .collect();
    let total_weight: f64 = weights.iter().sum();

    if total_weight <= 0.0 {
        if !portfolio.items.is_empty() {
            warn!(
                "Balanced portfolio {} has zero total weight; using raw item amounts",
                portfolio.id
            );
        }
        return portfolio.items.iter().map(|item| item.total_amount).collect();
    }

    weights
        .iter()
        .map(|weight| portfolio.total_amount * weight / total_weight)
        .collect()
}

fn direct_amount(item: &PortfolioItem, total_amount: f64) -> f64 {
    match item.portfolio_percentage {
        Some(pct) if pct > 0.0 => total_amount * pct / 100.0,
        _ => item.total_amount,
    }
}
