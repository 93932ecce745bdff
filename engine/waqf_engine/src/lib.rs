//! # Waqf Engine
//!
//! Portfolio allocation and lifecycle engine for waqf (Islamic endowment)
//! management. A donor builds a [`Portfolio`] across charitable causes and
//! three endowment instruments; on submission it becomes a persisted
//! [`WaqfProfile`] whose later top-ups, payouts and completion are decided
//! here as well.
//!
//! | Phase        | Operation(s)                                                      |
//! |--------------|-------------------------------------------------------------------|
//! | Drafting     | [`Portfolio::new`], `add_cause`, `set_global_allocation`, `apply_template`, ... |
//! | Allocation   | [`allocation::resolve`]                                           |
//! | Analysis     | [`stats::stats`], [`impact::project`]                             |
//! | Validation   | [`validation::validate`], [`validation::validate_for_submission`] |
//! | Submission   | [`mapper::to_waqf_profile`], [`Portfolio::finalize_allocation`]   |
//! | Top-ups      | [`contribution::can_accept`], [`contribution::check_contribution_at`] |
//! | Payouts      | [`distribution::apply_distribution`], [`distribution::distribution_summary`] |
//! | Completion   | [`completion::evaluate`], [`completion::settle_status`]           |
//! | Maturity     | [`maturity::revolving_balance`], [`maturity::matured_at`], [`maturity::matured_waqfs`] |
//! | Wire         | [`wire`] (drafts and persisted records)                           |
//!
//! ## Architecture
//!
//! Every operation is synchronous and free of I/O. Persistence, the cause
//! catalog and the clock belong to the host; time-dependent operations come
//! in pairs where the `*_at` form takes `now` explicitly. Business-rule
//! outcomes are returned as values ([`PortfolioValidation`],
//! [`ContributionResult`], [`CompletionStatus`]); [`EngineError`] is reserved
//! for malformed wire data and impossible state changes.

pub mod allocation;
pub mod completion;
pub mod config;
pub mod contribution;
pub mod distribution;
pub mod errors;
pub mod impact;
pub mod mapper;
pub mod maturity;
pub mod portfolio;
pub mod stats;
pub mod templates;
pub mod types;
pub mod validation;
pub mod wire;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_allocation;

pub use allocation::{resolve, ResolvedAllocation};
pub use completion::CompletionStatus;
pub use config::EngineConfig;
pub use contribution::ContributionResult;
pub use errors::{EngineError, Result};
pub use stats::{LiquidityLevel, PortfolioStats, RiskLevel};
pub use types::{
    AllocationMode, Cause, ConsumableWaqfDetails, FinancialMetrics, Instrument, Portfolio,
    PortfolioAllocation, PortfolioItem, SpendingSchedule, WaqfProfile, WaqfStatus, WaqfType,
};
pub use validation::PortfolioValidation;
pub use wire::PortfolioDraft;
