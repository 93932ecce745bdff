//! # Portfolio → WaqfProfile
//!
//! Turns a validated [`Portfolio`] into the [`WaqfProfile`] handed to
//! persistence. Per-cause dollars and percentages come from the resolver, so
//! the result is the same whether or not the portfolio was finalized.
//!
//! ## Primary type
//!
//! Instrument dollars are summed across causes. More than one instrument
//! with a positive sum makes the waqf `Hybrid`; exactly one makes it that
//! instrument; none defaults to `Permanent`.
//!
//! ## Hybrid split
//!
//! Each cause's triple is rescaled to 100 and stored sparsely (zero shares
//! are omitted). An all-zero triple is stored as `{Permanent: 100}`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::allocation::resolve;
use crate::config::EngineConfig;
use crate::maturity::maturity_date;
use crate::types::{
    FinancialMetrics, HybridCauseAllocation, Instrument, Portfolio, PortfolioItem,
    PrincipalReturnMethod, RevolvingWaqfDetails, WaqfProfile, WaqfStatus, WaqfType,
};

pub const UNTITLED_WAQF_NAME: &str = "Waqf Portfolio - Untitled";

/// The single instrument with a positive amount, `Hybrid` when several
/// are positive, `Permanent` when none is.
pub fn primary_type(amounts: [(Instrument, f64); 3]) -> WaqfType {
    let mut active = amounts.iter().filter(|(_, amount)| *amount > 0.0);
    match (active.next(), active.next()) {
        (Some(_), Some(_)) => WaqfType::Hybrid,
        (Some((instrument, _)), None) => WaqfType::from(*instrument),
        (None, _) => WaqfType::Permanent,
    }
}

pub fn determine_primary_type(portfolio: &Portfolio) -> WaqfType {
    let resolved = resolve(portfolio);
    primary_type(Instrument::ALL.map(|instrument| (instrument, resolved.amount(instrument))))
}

/// Rescale one cause's triple to 100 and drop zero shares.
pub fn hybrid_split(item: &PortfolioItem) -> HybridCauseAllocation {
    let sum = item.allocation.sum();
    let mut allocations = BTreeMap::new();

    if sum > 0.0 {
        for instrument in item.allocation.active_instruments() {
            allocations.insert(instrument, item.allocation.get(instrument) / sum * 100.0);
        }
    } else {
        warn!(
            "Cause {} has no instrument split; storing it as fully permanent",
            item.cause.id
        );
        allocations.insert(Instrument::Permanent, 100.0);
    }

    HybridCauseAllocation {
        cause_id: item.cause.id.clone(),
        allocations,
    }
}

pub fn to_waqf_profile(portfolio: &Portfolio, user_id: &str, config: &EngineConfig) -> WaqfProfile {
    to_waqf_profile_at(portfolio, user_id, config, Utc::now())
}

pub fn to_waqf_profile_at(
    portfolio: &Portfolio,
    user_id: &str,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> WaqfProfile {
    let resolved = resolve(portfolio);
    let waqf_type = primary_type(Instrument::ALL.map(|i| (i, resolved.amount(i))));
    let is_hybrid = waqf_type == WaqfType::Hybrid;
    let total = portfolio.total_amount;

    let mut cause_allocation = BTreeMap::new();
    let mut cause_dollars = BTreeMap::new();
    for cause in &resolved.per_cause_amounts {
        let share = if total > 0.0 { cause.amount / total * 100.0 } else { 0.0 };
        cause_allocation.insert(cause.cause_id.clone(), share);
        cause_dollars.insert(cause.cause_id.clone(), cause.amount);
    }

    let wants_revolving = waqf_type == WaqfType::TemporaryRevolving
        || (is_hybrid && resolved.revolving_amount > 0.0);
    let revolving_details = wants_revolving.then(|| {
        let lock_period_months = portfolio
            .lock_period_months
            .unwrap_or(config.default_lock_period_months);
        RevolvingWaqfDetails {
            lock_period_months,
            maturity_date: Some(maturity_date(lock_period_months, now)),
            principal_return_method: PrincipalReturnMethod::LumpSum,
            early_withdrawal_allowed: true,
            contribution_tranches: Vec::new(),
        }
    });

    let name = if portfolio.name.trim().is_empty() {
        UNTITLED_WAQF_NAME.to_string()
    } else {
        portfolio.name.clone()
    };
    let description = if portfolio.description.trim().is_empty() {
        format!(
            "Multi-cause waqf endowment supporting {} charitable causes",
            portfolio.items.len()
        )
    } else {
        portfolio.description.clone()
    };

    debug!(
        "Mapping portfolio {} to a {} waqf over {} causes",
        portfolio.id,
        waqf_type.as_wire(),
        portfolio.items.len()
    );

    WaqfProfile {
        id: None,
        name,
        description,
        waqf_asset: total,
        waqf_type,
        is_hybrid,
        hybrid_allocations: is_hybrid
            .then(|| portfolio.items.iter().map(hybrid_split).collect()),
        selected_causes: portfolio.items.iter().map(|item| item.cause.id.clone()).collect(),
        cause_allocation,
        supported_causes: portfolio.items.iter().map(|item| item.cause.clone()).collect(),
        financial: FinancialMetrics {
            total_donations: total,
            current_balance: total,
            cause_allocations: cause_dollars,
            ..FinancialMetrics::default()
        },
        consumable_details: None,
        revolving_details,
        status: WaqfStatus::Active,
        created_by: user_id.to_string(),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

impl WaqfProfile {
    /// Re-derive the primary type from the stored hybrid split, weighting
    /// each cause by its dollars in `financial.cause_allocations`. Causes
    /// without recorded dollars count with weight 1.
    pub fn derived_type(&self) -> WaqfType {
        let Some(splits) = &self.hybrid_allocations else {
            return self.waqf_type;
        };

        let mut amounts = Instrument::ALL.map(|instrument| (instrument, 0.0));
        for split in splits {
            let weight = self
                .financial
                .cause_allocations
                .get(&split.cause_id)
                .copied()
                .filter(|dollars| *dollars > 0.0)
                .unwrap_or(1.0);
            for entry in amounts.iter_mut() {
                let share = split.allocations.get(&entry.0).copied().unwrap_or(0.0);
                entry.1 += weight * share / 100.0;
            }
        }
        primary_type(amounts)
    }
}
