//! # Portfolio operations
//!
//! Every operation consumes a [`Portfolio`] and returns the updated value,
//! stamping `updated_at`. A host keeps exactly one current value per draft
//! and replaces it with each result.
//!
//! Default allocations are computed here, when a cause is added, and never
//! inferred later during derivation:
//!
//! | Mode     | Allocation for a new cause                                      |
//! |----------|-----------------------------------------------------------------|
//! | simple   | `{100, 0, 0}` (an explicit allocation is ignored)                |
//! | balanced | global allocation (default 40/30/30) restricted to the cause     |
//! | advanced | explicit allocation, else an equal split over supported instruments |

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::allocation::cause_amounts;
use crate::templates::PortfolioTemplate;
use crate::types::{AllocationMode, Cause, Portfolio, PortfolioAllocation, PortfolioItem};

pub const DEFAULT_PORTFOLIO_NAME: &str = "My Portfolio";

impl Portfolio {
    pub fn new(user_id: Option<String>) -> Self {
        Self::new_at(user_id, Utc::now())
    }

    pub fn new_at(user_id: Option<String>, now: DateTime<Utc>) -> Self {
        Portfolio {
            id: Uuid::new_v4(),
            name: DEFAULT_PORTFOLIO_NAME.to_string(),
            description: String::new(),
            items: Vec::new(),
            total_amount: 0.0,
            allocation_mode: AllocationMode::Simple,
            global_allocation: None,
            lock_period_months: None,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item(&self, cause_id: &str) -> Option<&PortfolioItem> {
        self.items.iter().find(|item| item.cause.id == cause_id)
    }

    pub fn contains(&self, cause_id: &str) -> bool {
        self.item(cause_id).is_some()
    }

    fn touched(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = now;
        self
    }

    fn with_item<F>(mut self, cause_id: &str, f: F) -> Self
    where
        F: FnOnce(&mut PortfolioItem),
    {
        match self.items.iter_mut().find(|item| item.cause.id == cause_id) {
            Some(item) => f(item),
            None => debug!("No cause {} in portfolio {}", cause_id, self.id),
        }
        self
    }

    /// The allocation a newly added `cause` receives under the current mode.
    pub fn default_allocation_for(
        &self,
        cause: &Cause,
        explicit: Option<PortfolioAllocation>,
    ) -> PortfolioAllocation {
        match self.allocation_mode {
            AllocationMode::Simple => PortfolioAllocation::ALL_PERMANENT,
            AllocationMode::Balanced => self
                .global_allocation
                .unwrap_or(PortfolioAllocation::DEFAULT_BALANCED)
                .restricted_to(cause),
            AllocationMode::Advanced => {
                explicit.unwrap_or_else(|| PortfolioAllocation::equal_for(cause))
            }
        }
    }

    pub fn add_cause(self, cause: Cause, allocation: Option<PortfolioAllocation>) -> Self {
        self.add_cause_at(cause, allocation, Utc::now())
    }

    /// Append `cause`. Adding a cause that is already present returns the
    /// portfolio unchanged.
    pub fn add_cause_at(
        mut self,
        cause: Cause,
        allocation: Option<PortfolioAllocation>,
        now: DateTime<Utc>,
    ) -> Self {
        if self.contains(&cause.id) {
            warn!("Cause {} ({}) is already in portfolio {}", cause.id, cause.name, self.id);
            return self;
        }

        let allocation = self.default_allocation_for(&cause, allocation);
        debug!("Adding cause {} to portfolio {}", cause.id, self.id);
        self.items.push(PortfolioItem {
            cause,
            total_amount: 0.0,
            allocation,
            portfolio_percentage: None,
        });
        self.touched(now)
    }

    pub fn remove_cause(self, cause_id: &str) -> Self {
        self.remove_cause_at(cause_id, Utc::now())
    }

    pub fn remove_cause_at(mut self, cause_id: &str, now: DateTime<Utc>) -> Self {
        self.items.retain(|item| item.cause.id != cause_id);
        self.touched(now)
    }

    pub fn update_cause_amount(self, cause_id: &str, amount: f64) -> Self {
        self.update_cause_amount_at(cause_id, amount, Utc::now())
    }

    /// Set one cause's dollars; the portfolio total becomes the sum of items.
    pub fn update_cause_amount_at(self, cause_id: &str, amount: f64, now: DateTime<Utc>) -> Self {
        let mut portfolio = self.with_item(cause_id, |item| item.total_amount = amount);
        portfolio.total_amount = portfolio.items.iter().map(|item| item.total_amount).sum();
        portfolio.touched(now)
    }

    pub fn update_cause_allocation(self, cause_id: &str, allocation: PortfolioAllocation) -> Self {
        self.update_cause_allocation_at(cause_id, allocation, Utc::now())
    }

    /// Set one cause's instrument mix. A simple portfolio becomes advanced,
    /// since simple mode only admits all-permanent items.
    pub fn update_cause_allocation_at(
        mut self,
        cause_id: &str,
        allocation: PortfolioAllocation,
        now: DateTime<Utc>,
    ) -> Self {
        if self.allocation_mode == AllocationMode::Simple
            && allocation != PortfolioAllocation::ALL_PERMANENT
            && self.contains(cause_id)
        {
            debug!("Portfolio {} switches to advanced mode", self.id);
            self.allocation_mode = AllocationMode::Advanced;
        }
        self.with_item(cause_id, |item| item.allocation = allocation)
            .touched(now)
    }

    pub fn set_portfolio_percentage(self, cause_id: &str, percentage: f64) -> Self {
        self.set_portfolio_percentage_at(cause_id, percentage, Utc::now())
    }

    pub fn set_portfolio_percentage_at(
        self,
        cause_id: &str,
        percentage: f64,
        now: DateTime<Utc>,
    ) -> Self {
        self.with_item(cause_id, |item| item.portfolio_percentage = Some(percentage))
            .touched(now)
    }

    pub fn set_global_allocation(self, allocation: PortfolioAllocation) -> Self {
        self.set_global_allocation_at(allocation, Utc::now())
    }

    /// Switch to balanced mode; each item takes `allocation` restricted to
    /// the instruments its cause supports.
    pub fn set_global_allocation_at(mut self, allocation: PortfolioAllocation, now: DateTime<Utc>) -> Self {
        for item in &mut self.items {
            item.allocation = allocation.restricted_to(&item.cause);
        }
        self.global_allocation = Some(allocation);
        self.allocation_mode = AllocationMode::Balanced;
        self.touched(now)
    }

    pub fn change_allocation_mode(self, mode: AllocationMode) -> Self {
        self.change_allocation_mode_at(mode, Utc::now())
    }

    pub fn change_allocation_mode_at(mut self, mode: AllocationMode, now: DateTime<Utc>) -> Self {
        match (mode, self.global_allocation) {
            (AllocationMode::Simple, _) => {
                for item in &mut self.items {
                    item.allocation = PortfolioAllocation::ALL_PERMANENT;
                }
            }
            (AllocationMode::Balanced, Some(global)) => {
                for item in &mut self.items {
                    item.allocation = global.restricted_to(&item.cause);
                }
            }
            _ => {}
        }
        self.allocation_mode = mode;
        self.touched(now)
    }

    pub fn set_total_amount(self, total_amount: f64) -> Self {
        self.set_total_amount_at(total_amount, Utc::now())
    }

    pub fn set_total_amount_at(mut self, total_amount: f64, now: DateTime<Utc>) -> Self {
        self.total_amount = total_amount;
        self.touched(now)
    }

    pub fn set_lock_period_months(self, months: u32) -> Self {
        self.set_lock_period_months_at(months, Utc::now())
    }

    pub fn set_lock_period_months_at(mut self, months: u32, now: DateTime<Utc>) -> Self {
        self.lock_period_months = Some(months);
        self.touched(now)
    }

    pub fn finalize_allocation(self) -> Self {
        self.finalize_allocation_at(Utc::now())
    }

    /// Write each cause's realized dollars into `item.total_amount`.
    pub fn finalize_allocation_at(mut self, now: DateTime<Utc>) -> Self {
        let amounts = cause_amounts(&self);
        for (item, amount) in self.items.iter_mut().zip(amounts) {
            item.total_amount = amount;
        }
        self.touched(now)
    }

    pub fn apply_template(self, template: &PortfolioTemplate) -> Self {
        self.apply_template_at(template, Utc::now())
    }

    /// Adopt a template's instrument mix. Simple templates that are not
    /// all-permanent are applied in advanced mode with the template mix
    /// restricted per cause.
    pub fn apply_template_at(self, template: &PortfolioTemplate, now: DateTime<Utc>) -> Self {
        let allocation = template.global_allocation;
        match template.allocation_mode {
            AllocationMode::Balanced => self.set_global_allocation_at(allocation, now),
            AllocationMode::Simple if allocation == PortfolioAllocation::ALL_PERMANENT => {
                self.change_allocation_mode_at(AllocationMode::Simple, now)
            }
            _ => {
                let mut portfolio = self;
                for item in &mut portfolio.items {
                    item.allocation = allocation.restricted_to(&item.cause);
                }
                portfolio.global_allocation = Some(allocation);
                portfolio.allocation_mode = AllocationMode::Advanced;
                portfolio.touched(now)
            }
        }
    }
}
