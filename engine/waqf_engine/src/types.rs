//! # Types
//!
//! Shared data structures used across all modules of the waqf engine.
//!
//! ## Design decisions
//!
//! ### Portfolio vs. WaqfProfile
//!
//! A donor's choices live in two shapes:
//!
//! - [`Portfolio`]: a transient draft aggregate built step by step in the
//!   wizard. It has its own identity (`id`) so hosts can pass or persist it
//!   as a resumable draft. Every operation in [`crate::portfolio`] returns a
//!   new value.
//! - [`WaqfProfile`]: the persisted endowment, created once by
//!   [`crate::mapper`] and afterwards only updated (financials, status).
//!
//! ### Closed instrument tags
//!
//! [`Instrument`] (the three endowment instruments) and [`WaqfType`] (the
//! instrument tag of a whole profile, which adds `Hybrid`) are closed enums.
//! Their wire spellings are mapped in exactly one place, [`crate::wire`].
//!
//! ### Status as a Finite-State Machine
//!
//! [`WaqfStatus`] allows only these transitions:
//!
//! ```text
//! Active ──► Completed
//!   │  ▲
//!   ▼  │
//! Paused ──► Terminated
//! Active ──► Terminated
//! ```
//!
//! `Completed` is driven by [`crate::completion`]; pausing and termination
//! are administrative and happen outside the engine.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, Result};

// ── Instruments ──────────────────────────────────────────────────────

/// One of the three endowment instruments a donor can fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Instrument {
    /// Principal preserved forever; only returns are distributed.
    Permanent,
    /// Principal and returns are spent down.
    TemporaryConsumable,
    /// Principal returned to the donor after a lock period.
    TemporaryRevolving,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [
        Instrument::Permanent,
        Instrument::TemporaryConsumable,
        Instrument::TemporaryRevolving,
    ];
}

/// Instrument tag of a persisted waqf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WaqfType {
    Permanent,
    TemporaryConsumable,
    TemporaryRevolving,
    /// Funds split, per cause, across more than one instrument.
    Hybrid,
}

impl From<Instrument> for WaqfType {
    fn from(instrument: Instrument) -> Self {
        match instrument {
            Instrument::Permanent => WaqfType::Permanent,
            Instrument::TemporaryConsumable => WaqfType::TemporaryConsumable,
            Instrument::TemporaryRevolving => WaqfType::TemporaryRevolving,
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────

/// A charitable cause from the external catalog. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    /// Effectiveness score (0-100).
    #[serde(default, alias = "impact_score", skip_serializing_if = "Option::is_none")]
    pub impact_score: Option<f64>,
    /// Instruments this cause can receive. Empty means "all".
    #[serde(
        default,
        rename = "supportedWaqfTypes",
        alias = "supportedInstrumentTypes",
        alias = "supported_waqf_types"
    )]
    pub supported_instruments: Vec<Instrument>,
}

impl Cause {
    pub fn supports(&self, instrument: Instrument) -> bool {
        self.supported_instruments.is_empty() || self.supported_instruments.contains(&instrument)
    }
}

// ── Portfolio ────────────────────────────────────────────────────────

/// Percentages (0-100) of a cause's money placed in each instrument.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    pub permanent: f64,
    #[serde(alias = "temporary_consumable", alias = "temporaryConsumable")]
    pub consumable: f64,
    #[serde(alias = "temporary_revolving", alias = "temporaryRevolving")]
    pub revolving: f64,
}

/// How the donor expresses the split of funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// Everything into one instrument, evenly across causes.
    #[default]
    Simple,
    /// One global instrument mix applied to every cause.
    Balanced,
    /// Per-cause share of the total and per-cause instrument mix.
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub cause: Cause,
    /// Dollars for this cause. Derived, and not authoritative in balanced mode.
    #[serde(alias = "total_amount")]
    pub total_amount: f64,
    pub allocation: PortfolioAllocation,
    /// Share of the portfolio total (0-100). Advanced mode only.
    #[serde(default, alias = "portfolio_percentage", skip_serializing_if = "Option::is_none")]
    pub portfolio_percentage: Option<f64>,
}

/// The donor's draft: chosen causes, amounts and instrument mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Draft identity, stable across wizard steps.
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub items: Vec<PortfolioItem>,
    /// Donor-entered total; authoritative.
    #[serde(alias = "total_amount")]
    pub total_amount: f64,
    #[serde(alias = "allocation_mode")]
    pub allocation_mode: AllocationMode,
    /// Instrument mix for balanced mode.
    #[serde(default, alias = "global_allocation", skip_serializing_if = "Option::is_none")]
    pub global_allocation: Option<PortfolioAllocation>,
    #[serde(default, alias = "lock_period_months", skip_serializing_if = "Option::is_none")]
    pub lock_period_months: Option<u32>,
    #[serde(default, alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

// ── Persisted waqf ───────────────────────────────────────────────────

/// Lifecycle status of a persisted waqf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaqfStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Terminated,
}

impl WaqfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Terminated => "terminated",
        }
    }

    /// `Completed` and `Terminated` admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Terminated)
    }

    pub fn can_transition_to(&self, to: WaqfStatus) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Paused)
                | (Self::Active, Self::Completed)
                | (Self::Active, Self::Terminated)
                | (Self::Paused, Self::Active)
                | (Self::Paused, Self::Terminated)
        )
    }

    /// Move to `to`, or fail with [`EngineError::InvalidStatusTransition`].
    /// Staying in the same status is always allowed.
    pub fn transition_to(self, to: WaqfStatus) -> Result<WaqfStatus> {
        if self == to || self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(EngineError::InvalidStatusTransition { from: self, to })
        }
    }
}

impl fmt::Display for WaqfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMetrics {
    #[serde(default, alias = "beneficiaries_supported")]
    pub beneficiaries_supported: u64,
    #[serde(default, alias = "projects_completed")]
    pub projects_completed: u32,
    #[serde(default, alias = "completion_rate", skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
    #[serde(
        default,
        alias = "last_distribution_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_distribution_date: Option<DateTime<Utc>>,
}

/// Money tracked on a persisted waqf.
///
/// Invariant: `current_balance = max(0, total_donations - total_distributed
/// + total_investment_return)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    #[serde(default, alias = "total_donations")]
    pub total_donations: f64,
    #[serde(default, alias = "total_distributed")]
    pub total_distributed: f64,
    #[serde(default, alias = "current_balance")]
    pub current_balance: f64,
    #[serde(default, alias = "investment_returns")]
    pub investment_returns: Vec<f64>,
    #[serde(default, alias = "total_investment_return")]
    pub total_investment_return: f64,
    #[serde(default, alias = "growth_rate")]
    pub growth_rate: f64,
    /// Dollars allocated per cause id.
    #[serde(default, alias = "cause_allocations")]
    pub cause_allocations: BTreeMap<String, f64>,
    #[serde(default, alias = "impact_metrics", skip_serializing_if = "Option::is_none")]
    pub impact_metrics: Option<ImpactMetrics>,
}

impl FinancialMetrics {
    pub fn expected_balance(&self) -> f64 {
        (self.total_donations - self.total_distributed + self.total_investment_return).max(0.0)
    }

    pub fn recompute_balance(&mut self) {
        self.current_balance = self.expected_balance();
    }

    pub fn is_consistent(&self) -> bool {
        (self.expected_balance() - self.current_balance).abs() <= 0.01
    }
}

/// How a consumable waqf spends its money down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpendingSchedule {
    Immediate,
    Phased,
    #[serde(alias = "milestone_based", alias = "MilestoneBased")]
    MilestoneBased,
    Ongoing,
    #[serde(other)]
    Unknown,
}

impl SpendingSchedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Phased => "phased",
            Self::MilestoneBased => "milestone-based",
            Self::Ongoing => "ongoing",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        alias = "target_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "target_amount")]
    pub target_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableWaqfDetails {
    #[serde(alias = "spending_schedule")]
    pub spending_schedule: SpendingSchedule,
    #[serde(
        default,
        alias = "start_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "end_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "target_amount", skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(default, alias = "target_beneficiaries", skip_serializing_if = "Option::is_none")]
    pub target_beneficiaries: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<Milestone>,
    #[serde(
        default,
        alias = "minimum_monthly_distribution",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_monthly_distribution: Option<f64>,
}

impl ConsumableWaqfDetails {
    pub fn new(spending_schedule: SpendingSchedule) -> Self {
        ConsumableWaqfDetails {
            spending_schedule,
            start_date: None,
            end_date: None,
            target_amount: None,
            target_beneficiaries: None,
            milestones: Vec::new(),
            minimum_monthly_distribution: None,
        }
    }

    /// A positive target amount, if one is set.
    pub fn target_amount(&self) -> Option<f64> {
        self.target_amount.filter(|t| *t > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalReturnMethod {
    #[default]
    LumpSum,
    Installments,
}

/// One revolving contribution, locked until its own maturity date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionTranche {
    pub id: String,
    pub amount: f64,
    #[serde(
        default,
        alias = "contribution_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub contribution_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "maturity_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub maturity_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "is_returned")]
    pub is_returned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevolvingWaqfDetails {
    #[serde(alias = "lock_period_months")]
    pub lock_period_months: u32,
    #[serde(
        default,
        alias = "maturity_date",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub maturity_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "principal_return_method")]
    pub principal_return_method: PrincipalReturnMethod,
    #[serde(default, alias = "early_withdrawal_allowed")]
    pub early_withdrawal_allowed: bool,
    #[serde(default, alias = "contribution_tranches")]
    pub contribution_tranches: Vec<ContributionTranche>,
}

/// Per-cause instrument split of a hybrid waqf. Sparse: instruments with a
/// zero share are absent from `allocations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridCauseAllocation {
    #[serde(alias = "cause_id")]
    pub cause_id: String,
    pub allocations: BTreeMap<Instrument, f64>,
}

/// A persisted endowment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaqfProfile {
    /// Assigned by the persistence collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Initial principal.
    #[serde(default, alias = "waqf_asset")]
    pub waqf_asset: f64,
    #[serde(alias = "waqf_type")]
    pub waqf_type: WaqfType,
    #[serde(default, alias = "is_hybrid")]
    pub is_hybrid: bool,
    #[serde(default, alias = "hybrid_allocations", skip_serializing_if = "Option::is_none")]
    pub hybrid_allocations: Option<Vec<HybridCauseAllocation>>,
    #[serde(default, alias = "selected_causes")]
    pub selected_causes: Vec<String>,
    /// Percentage of the total per cause id.
    #[serde(default, alias = "cause_allocation")]
    pub cause_allocation: BTreeMap<String, f64>,
    #[serde(default, alias = "supported_causes")]
    pub supported_causes: Vec<Cause>,
    #[serde(default)]
    pub financial: FinancialMetrics,
    #[serde(default, alias = "consumable_details", skip_serializing_if = "Option::is_none")]
    pub consumable_details: Option<ConsumableWaqfDetails>,
    #[serde(default, alias = "revolving_details", skip_serializing_if = "Option::is_none")]
    pub revolving_details: Option<RevolvingWaqfDetails>,
    #[serde(default)]
    pub status: WaqfStatus,
    #[serde(default, alias = "created_by")]
    pub created_by: String,
    #[serde(
        default,
        alias = "created_at",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "updated_at",
        with = "crate::wire::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}
