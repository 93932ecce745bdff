//! Structural and business-rule checks on a portfolio.
//!
//! Errors block submission; warnings are advisory only.

use serde::{Deserialize, Serialize};

use crate::allocation::ALLOCATION_TOLERANCE;
use crate::config::EngineConfig;
use crate::stats::stats;
use crate::types::{AllocationMode, Instrument, Portfolio};

pub const LOW_DIVERSIFICATION_THRESHOLD: u32 = 40;
/// Allowed drift of advanced-mode cause percentages from 100%.
pub const PERCENTAGE_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PortfolioValidation {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        PortfolioValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

pub fn validate(portfolio: &Portfolio) -> PortfolioValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if portfolio.items.is_empty() {
        errors.push("Portfolio must have at least one cause".to_string());
    }
    if portfolio.total_amount <= 0.0 {
        errors.push("Total portfolio amount must be greater than 0".to_string());
    }

    for item in &portfolio.items {
        let total = item.allocation.sum();
        if (total - 100.0).abs() > ALLOCATION_TOLERANCE {
            errors.push(format!(
                "Cause \"{}\" allocation must sum to 100% (currently {:.1}%)",
                item.cause.name, total
            ));
        }
        if item.total_amount < 0.0 {
            errors.push(format!("Cause \"{}\" amount cannot be negative", item.cause.name));
        }
    }

    let stats = stats(portfolio);
    if stats.diversification_score < LOW_DIVERSIFICATION_THRESHOLD {
        warnings.push(
            "Low diversification score. Consider spreading across multiple waqf types for better balance."
                .to_string(),
        );
    }
    if portfolio.items.len() == 1 {
        warnings.push(
            "Single cause portfolio. Consider adding more causes for greater impact diversity."
                .to_string(),
        );
    }
    if stats.consumable_percentage > 0.0
        && stats.permanent_percentage <= 0.0
        && stats.revolving_percentage <= 0.0
    {
        warnings.push(
            "100% consumable allocation means no long-term impact. Consider adding permanent or revolving waqf."
                .to_string(),
        );
    }

    PortfolioValidation::from_parts(errors, warnings)
}

/// [`validate`] plus the checks applied when the donor submits.
pub fn validate_for_submission(portfolio: &Portfolio, config: &EngineConfig) -> PortfolioValidation {
    let PortfolioValidation {
        mut errors,
        mut warnings,
        ..
    } = validate(portfolio);

    if portfolio.total_amount > 0.0 && portfolio.total_amount < config.min_portfolio_amount {
        errors.push(format!(
            "Total portfolio amount must be at least {}",
            config.min_portfolio_amount
        ));
    }

    match portfolio.allocation_mode {
        AllocationMode::Balanced => {
            if let Some(global) = portfolio.global_allocation {
                if !global.is_complete() {
                    errors.push(format!(
                        "Global allocation must sum to 100% (currently {:.1}%)",
                        global.sum()
                    ));
                }
            }
        }
        AllocationMode::Advanced => {
            let percentages: Vec<f64> = portfolio
                .items
                .iter()
                .filter_map(|item| item.portfolio_percentage)
                .collect();
            let total: f64 = percentages.iter().sum();
            if !percentages.is_empty() && (total - 100.0).abs() > PERCENTAGE_TOLERANCE {
                errors.push(format!(
                    "Cause percentages must sum to 100% (currently {:.1}%)",
                    total
                ));
            }
        }
        AllocationMode::Simple => {}
    }

    for item in &portfolio.items {
        for instrument in item.allocation.active_instruments() {
            if !item.cause.supports(instrument) {
                warnings.push(format!(
                    "Cause \"{}\" does not support {} waqf",
                    item.cause.name,
                    instrument_label(instrument)
                ));
            }
        }
    }

    PortfolioValidation::from_parts(errors, warnings)
}

fn instrument_label(instrument: Instrument) -> &'static str {
    match instrument {
        Instrument::Permanent => "permanent",
        Instrument::TemporaryConsumable => "consumable",
        Instrument::TemporaryRevolving => "revolving",
    }
}
