//! Portfolio-level metrics derived from resolved amounts.

use serde::{Deserialize, Serialize};

use crate::allocation::{resolve, ResolvedAllocation};
use crate::types::Portfolio;

/// Share each instrument would hold in a perfectly even portfolio.
const IDEAL_SHARE: f64 = 33.33;
const MAX_DEVIATION: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    /// Never produced by [`risk_level`]; kept so stored template risk tags
    /// of `"high"` still read and write.
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_amount: f64,
    pub cause_count: usize,
    pub permanent_amount: f64,
    pub permanent_percentage: f64,
    pub consumable_amount: f64,
    pub consumable_percentage: f64,
    pub revolving_amount: f64,
    pub revolving_percentage: f64,
    /// 0-100; 100 is an even three-way split.
    pub diversification_score: u32,
    pub risk_level: RiskLevel,
    pub liquidity_level: LiquidityLevel,
}

pub fn stats(portfolio: &Portfolio) -> PortfolioStats {
    stats_from_resolved(portfolio, &resolve(portfolio))
}

/// Same as [`stats`] for callers that already resolved the portfolio.
pub fn stats_from_resolved(portfolio: &Portfolio, resolved: &ResolvedAllocation) -> PortfolioStats {
    let total = portfolio.total_amount;
    let pct = |amount: f64| if total > 0.0 { amount / total * 100.0 } else { 0.0 };

    let permanent = pct(resolved.permanent_amount);
    let consumable = pct(resolved.consumable_amount);
    let revolving = pct(resolved.revolving_amount);

    PortfolioStats {
        total_amount: total,
        cause_count: portfolio.items.len(),
        permanent_amount: resolved.permanent_amount,
        permanent_percentage: permanent,
        consumable_amount: resolved.consumable_amount,
        consumable_percentage: consumable,
        revolving_amount: resolved.revolving_amount,
        revolving_percentage: revolving,
        diversification_score: diversification_score(permanent, consumable, revolving),
        risk_level: risk_level(permanent, consumable, revolving),
        liquidity_level: liquidity_level(permanent, consumable, revolving),
    }
}

/// `100 - (Σ |share - 33.33| / 200) × 100`, rounded and clamped to 0-100.
///
/// A portfolio with money in at most one instrument has no diversification
/// and scores 0.
pub fn diversification_score(permanent: f64, consumable: f64, revolving: f64) -> u32 {
    let shares = [permanent, consumable, revolving];
    if shares.iter().filter(|share| **share > 0.0).count() <= 1 {
        return 0;
    }

    let deviation: f64 = shares.iter().map(|share| (share - IDEAL_SHARE).abs()).sum();
    let score = 100.0 - (deviation / MAX_DEVIATION) * 100.0;
    score.round().clamp(0.0, 100.0) as u32
}

/// Heavy permanent or heavy consumable is low risk; everything else,
/// revolving-heavy included, is medium.
pub fn risk_level(permanent: f64, consumable: f64, _revolving: f64) -> RiskLevel {
    if permanent >= 60.0 || consumable >= 60.0 {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}

pub fn liquidity_level(_permanent: f64, consumable: f64, revolving: f64) -> LiquidityLevel {
    let liquid = consumable + revolving;
    if liquid >= 70.0 {
        LiquidityLevel::High
    } else if liquid >= 40.0 {
        LiquidityLevel::Medium
    } else {
        LiquidityLevel::Low
    }
}
