#![allow(dead_code)]

use crate::allocation::{ResolvedAllocation, ALLOCATION_TOLERANCE};
use crate::completion::CompletionStatus;
use crate::contribution::ContributionResult;
use crate::stats::PortfolioStats;
use crate::types::{
    AllocationMode, FinancialMetrics, HybridCauseAllocation, Portfolio, PortfolioAllocation,
    WaqfProfile, WaqfType,
};

const EPSILON: f64 = 1e-6;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Simple-mode items are always fully permanent.
pub fn assert_simple_mode_contract(portfolio: &Portfolio) {
    if portfolio.allocation_mode != AllocationMode::Simple {
        return;
    }
    for item in &portfolio.items {
        assert_eq!(
            item.allocation,
            PortfolioAllocation::ALL_PERMANENT,
            "simple portfolio {} holds a non-permanent allocation for {}",
            portfolio.id,
            item.cause.id
        );
    }
}

/// Every item triple is non-negative and sums to 100.
pub fn assert_allocations_complete(portfolio: &Portfolio) {
    for item in &portfolio.items {
        let a = item.allocation;
        assert!(
            a.permanent >= 0.0 && a.consumable >= 0.0 && a.revolving >= 0.0,
            "negative share for {}: {a:?}",
            item.cause.id
        );
        assert!(
            (a.sum() - 100.0).abs() <= ALLOCATION_TOLERANCE,
            "allocation for {} sums to {}",
            item.cause.id,
            a.sum()
        );
    }
}

/// Instrument totals equal the sum of per-cause amounts.
pub fn assert_resolved_consistent(resolved: &ResolvedAllocation) {
    let per_cause: f64 = resolved.per_cause_amounts.iter().map(|c| c.amount).sum();
    assert!(
        (resolved.total() - per_cause).abs() < 1e-6,
        "instrument total {} != cause total {}",
        resolved.total(),
        per_cause
    );
}

pub fn assert_stats_in_range(stats: &PortfolioStats) {
    assert!(stats.diversification_score <= 100);
    for pct in [
        stats.permanent_percentage,
        stats.consumable_percentage,
        stats.revolving_percentage,
    ] {
        assert!(pct >= 0.0, "negative percentage {pct}");
    }
}

pub fn assert_balance_consistent(financial: &FinancialMetrics) {
    assert!(financial.current_balance >= 0.0, "negative balance");
    assert!(
        financial.is_consistent(),
        "balance {} != donations {} - distributed {} + returns {}",
        financial.current_balance,
        financial.total_donations,
        financial.total_distributed,
        financial.total_investment_return
    );
}

pub fn assert_progress_in_range(status: &CompletionStatus) {
    assert!(
        (0.0..=100.0).contains(&status.progress),
        "progress {} outside 0-100",
        status.progress
    );
    if status.is_completed {
        assert_eq!(status.progress, 100.0);
        assert!(status.reason.is_some(), "completed without a reason");
    }
}

/// An accepted top-up raises balance and donations by exactly `amount`.
pub fn assert_contribution_invariant(before: &WaqfProfile, result: &ContributionResult, amount: f64) {
    if !result.accepted {
        assert!(result.updated_financial.is_none());
        assert!(result.reason.is_some(), "rejection without a reason");
        return;
    }
    let update = result
        .updated_financial
        .expect("accepted contribution without a financial update");
    assert_close(update.current_balance, before.financial.current_balance + amount);
    assert_close(update.total_donations, before.financial.total_donations + amount);
}

/// Stored hybrid splits are sparse and sum to 100.
pub fn assert_hybrid_split_valid(split: &HybridCauseAllocation) {
    assert!(!split.allocations.is_empty(), "empty split for {}", split.cause_id);
    for (instrument, share) in &split.allocations {
        assert!(*share > 0.0, "zero share for {instrument:?} stored for {}", split.cause_id);
    }
    let sum: f64 = split.allocations.values().sum();
    assert!((sum - 100.0).abs() < 1e-6, "split for {} sums to {sum}", split.cause_id);
}

pub fn assert_profile_well_formed(waqf: &WaqfProfile) {
    assert_eq!(waqf.is_hybrid, waqf.waqf_type == WaqfType::Hybrid);
    assert_eq!(waqf.hybrid_allocations.is_some(), waqf.is_hybrid);
    if let Some(splits) = &waqf.hybrid_allocations {
        splits.iter().for_each(assert_hybrid_split_valid);
    }
    assert_balance_consistent(&waqf.financial);
}
