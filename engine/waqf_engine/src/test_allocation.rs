use chrono::{DateTime, TimeZone, Utc};

use crate::allocation::resolve;
use crate::config::EngineConfig;
use crate::impact::project_at;
use crate::invariants::{
    assert_allocations_complete, assert_close, assert_resolved_consistent,
    assert_simple_mode_contract, assert_stats_in_range,
};
use crate::stats::{stats, LiquidityLevel, RiskLevel};
use crate::templates::template_by_id;
use crate::types::{AllocationMode, Cause, Instrument, Portfolio, PortfolioAllocation};
use crate::validation::{validate, validate_for_submission};
use crate::wire::PortfolioDraft;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
}

fn cause(id: &str, name: &str, supported: &[Instrument]) -> Cause {
    Cause {
        id: id.to_string(),
        name: name.to_string(),
        icon: String::new(),
        category: "education".to_string(),
        impact_score: Some(80.0),
        supported_instruments: supported.to_vec(),
    }
}

fn any_cause(id: &str, name: &str) -> Cause {
    cause(id, name, &[])
}

fn setup() -> Portfolio {
    Portfolio::new_at(Some("donor-1".to_string()), now())
}

/// Two causes under a 40/30/30 global mix: A holds permanent and
/// consumable, B only revolving.
fn setup_balanced() -> Portfolio {
    setup()
        .set_global_allocation_at(PortfolioAllocation::new(40.0, 30.0, 30.0), now())
        .add_cause_at(
            cause("a", "Alpha", &[Instrument::Permanent, Instrument::TemporaryConsumable]),
            None,
            now(),
        )
        .add_cause_at(cause("b", "Beta", &[Instrument::TemporaryRevolving]), None, now())
        .update_cause_allocation_at("a", PortfolioAllocation::new(70.0, 30.0, 0.0), now())
        .update_cause_allocation_at("b", PortfolioAllocation::new(0.0, 0.0, 100.0), now())
        .set_total_amount_at(1000.0, now())
}

fn setup_single_cause(allocation: PortfolioAllocation, amount: f64) -> Portfolio {
    setup()
        .change_allocation_mode_at(AllocationMode::Advanced, now())
        .add_cause_at(any_cause("c", "Clean Water"), Some(allocation), now())
        .update_cause_amount_at("c", amount, now())
}

// ── Portfolio operations ─────────────────────────────────────────────

#[test]
fn test_new_portfolio_is_empty_and_simple() {
    let p = setup();
    assert_eq!(p.name, "My Portfolio");
    assert!(p.items.is_empty());
    assert_eq!(p.total_amount, 0.0);
    assert_eq!(p.allocation_mode, AllocationMode::Simple);
    assert_eq!(p.user_id.as_deref(), Some("donor-1"));
    assert_eq!(p.created_at, now());
}

#[test]
fn test_simple_mode_ignores_explicit_allocation() {
    let p = setup().add_cause_at(
        any_cause("c", "Clean Water"),
        Some(PortfolioAllocation::new(0.0, 100.0, 0.0)),
        now(),
    );
    assert_eq!(p.items[0].allocation, PortfolioAllocation::ALL_PERMANENT);
    assert_simple_mode_contract(&p);
}

#[test]
fn test_switching_to_simple_resets_allocations() {
    let p = setup_balanced().change_allocation_mode_at(AllocationMode::Simple, now());
    assert_simple_mode_contract(&p);
    assert!(p.items.iter().all(|i| i.allocation == PortfolioAllocation::ALL_PERMANENT));
}

#[test]
fn test_custom_allocation_moves_simple_portfolio_to_advanced() {
    let p = setup()
        .add_cause_at(any_cause("c", "Clean Water"), None, now())
        .update_cause_allocation_at("c", PortfolioAllocation::new(50.0, 50.0, 0.0), now());
    assert_eq!(p.allocation_mode, AllocationMode::Advanced);
    assert_eq!(p.items[0].allocation, PortfolioAllocation::new(50.0, 50.0, 0.0));
    assert_simple_mode_contract(&p);
}

#[test]
fn test_duplicate_cause_is_ignored() {
    let once = setup().add_cause_at(any_cause("c", "Clean Water"), None, now());
    let later = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    let twice = once
        .clone()
        .add_cause_at(any_cause("c", "Clean Water"), None, later);
    assert_eq!(twice, once);
}

#[test]
fn test_balanced_add_restricts_global_to_supported_instruments() {
    let p = setup()
        .set_global_allocation_at(PortfolioAllocation::DEFAULT_BALANCED, now())
        .add_cause_at(
            cause("a", "Alpha", &[Instrument::Permanent, Instrument::TemporaryRevolving]),
            None,
            now(),
        );
    let a = p.items[0].allocation;
    assert_eq!(a.consumable, 0.0);
    assert_close(a.permanent, 40.0 / 70.0 * 100.0);
    assert_close(a.revolving, 30.0 / 70.0 * 100.0);
    assert_allocations_complete(&p);
}

#[test]
fn test_balanced_add_without_global_uses_default_mix() {
    let p = setup()
        .change_allocation_mode_at(AllocationMode::Balanced, now())
        .add_cause_at(any_cause("c", "Clean Water"), None, now());
    assert_eq!(p.items[0].allocation, PortfolioAllocation::DEFAULT_BALANCED);
}

#[test]
fn test_advanced_add_defaults_to_equal_split_over_supported() {
    let p = setup()
        .change_allocation_mode_at(AllocationMode::Advanced, now())
        .add_cause_at(
            cause("a", "Alpha", &[Instrument::Permanent, Instrument::TemporaryConsumable]),
            None,
            now(),
        );
    assert_eq!(p.items[0].allocation, PortfolioAllocation::new(50.0, 50.0, 0.0));
}

#[test]
fn test_update_amount_recomputes_total_and_remove_drops_item() {
    let p = setup()
        .add_cause_at(any_cause("a", "Alpha"), None, now())
        .add_cause_at(any_cause("b", "Beta"), None, now())
        .update_cause_amount_at("a", 300.0, now())
        .update_cause_amount_at("b", 200.0, now());
    assert_eq!(p.total_amount, 500.0);

    let p = p.remove_cause_at("a", now());
    assert_eq!(p.items.len(), 1);
    assert!(!p.contains("a"));
}

#[test]
fn test_operations_stamp_updated_at() {
    let later = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let p = setup().set_lock_period_months_at(24, later);
    assert_eq!(p.updated_at, later);
    assert_eq!(p.created_at, now());
    assert_eq!(p.lock_period_months, Some(24));
}

#[test]
fn test_emergency_template_applies_consumable_in_advanced_mode() {
    let template = template_by_id("emergency-response").unwrap();
    let p = setup()
        .add_cause_at(any_cause("c", "Relief"), None, now())
        .add_cause_at(cause("m", "Mosque", &[Instrument::Permanent]), None, now())
        .apply_template_at(template, now());

    assert_eq!(p.allocation_mode, AllocationMode::Advanced);
    assert_eq!(p.item("c").unwrap().allocation, PortfolioAllocation::new(0.0, 100.0, 0.0));
    assert_eq!(p.item("m").unwrap().allocation, PortfolioAllocation::ALL_PERMANENT);
    assert_allocations_complete(&p);
}

#[test]
fn test_balanced_template_sets_global_allocation() {
    let template = template_by_id("water-for-life").unwrap();
    let p = setup()
        .add_cause_at(any_cause("c", "Wells"), None, now())
        .apply_template_at(template, now());
    assert_eq!(p.allocation_mode, AllocationMode::Balanced);
    assert_eq!(p.global_allocation, Some(PortfolioAllocation::new(45.0, 15.0, 40.0)));
    assert_eq!(p.items[0].allocation, PortfolioAllocation::new(45.0, 15.0, 40.0));
}

// ── Allocation resolver ──────────────────────────────────────────────

#[test]
fn test_balanced_weighting_scenario() {
    let p = setup_balanced();
    let resolved = resolve(&p);

    assert_eq!(resolved.cause_amount("a"), Some(700.0));
    assert_eq!(resolved.cause_amount("b"), Some(300.0));
    assert_close(resolved.permanent_amount, 490.0);
    assert_close(resolved.consumable_amount, 210.0);
    assert_close(resolved.revolving_amount, 300.0);
    assert_resolved_consistent(&resolved);
}

#[test]
fn test_balanced_zero_weight_falls_back_to_item_amounts() {
    let mut p = setup_balanced();
    for item in &mut p.items {
        item.allocation = PortfolioAllocation::default();
        item.total_amount = 125.0;
    }
    let resolved = resolve(&p);
    assert_eq!(resolved.cause_amount("a"), Some(125.0));
    assert_eq!(resolved.total(), 0.0);
}

#[test]
fn test_advanced_portfolio_percentage_overrides_item_amount() {
    let p = setup()
        .change_allocation_mode_at(AllocationMode::Advanced, now())
        .add_cause_at(any_cause("a", "Alpha"), Some(PortfolioAllocation::ALL_PERMANENT), now())
        .add_cause_at(any_cause("b", "Beta"), Some(PortfolioAllocation::ALL_PERMANENT), now())
        .update_cause_amount_at("a", 100.0, now())
        .update_cause_amount_at("b", 100.0, now())
        .set_total_amount_at(2000.0, now())
        .set_portfolio_percentage_at("a", 25.0, now());

    let resolved = resolve(&p);
    assert_eq!(resolved.cause_amount("a"), Some(500.0));
    assert_eq!(resolved.cause_amount("b"), Some(100.0));
}

#[test]
fn test_finalize_materialises_resolved_amounts() {
    let p = setup_balanced().finalize_allocation_at(now());
    assert_eq!(p.item("a").unwrap().total_amount, 700.0);
    assert_eq!(p.item("b").unwrap().total_amount, 300.0);
    assert_eq!(p.total_amount, 1000.0);
}

#[test]
fn test_empty_portfolio_resolves_to_zero() {
    let resolved = resolve(&setup());
    assert_eq!(resolved.total(), 0.0);
    assert!(resolved.per_cause_amounts.is_empty());
}

// ── Stats ────────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_single_cause_stats() {
    let p = setup_single_cause(PortfolioAllocation::new(50.0, 30.0, 20.0), 1000.0);
    let s = stats(&p);

    assert_eq!(s.total_amount, 1000.0);
    assert_eq!(s.cause_count, 1);
    assert_close(s.permanent_amount, 500.0);
    assert_close(s.consumable_amount, 300.0);
    assert_close(s.revolving_amount, 200.0);
    assert_eq!(s.diversification_score, 83);
    assert_eq!(s.risk_level, RiskLevel::Medium);
    assert_eq!(s.liquidity_level, LiquidityLevel::Medium);
    assert_stats_in_range(&s);
}

#[test]
fn test_all_permanent_portfolio_has_no_diversification() {
    let p = setup()
        .add_cause_at(any_cause("c", "Clean Water"), None, now())
        .update_cause_amount_at("c", 5000.0, now());
    let s = stats(&p);
    assert_eq!(s.diversification_score, 0);
    assert_eq!(s.risk_level, RiskLevel::Low);
    assert_eq!(s.liquidity_level, LiquidityLevel::Low);
}

#[test]
fn test_zero_total_gives_zero_percentages() {
    let s = stats(&setup().add_cause_at(any_cause("c", "Clean Water"), None, now()));
    assert_eq!(s.permanent_percentage, 0.0);
    assert_eq!(s.diversification_score, 0);
}

// ── Validation ───────────────────────────────────────────────────────

#[test]
fn test_validator_names_each_unbalanced_cause() {
    let p = setup()
        .change_allocation_mode_at(AllocationMode::Advanced, now())
        .add_cause_at(any_cause("a", "Alpha"), Some(PortfolioAllocation::new(50.0, 40.0, 0.0)), now())
        .add_cause_at(any_cause("b", "Beta"), Some(PortfolioAllocation::new(60.0, 30.0, 20.0)), now())
        .set_total_amount_at(1000.0, now());

    let v = validate(&p);
    assert!(!v.is_valid);
    assert_eq!(v.errors.len(), 2);
    assert!(v.errors[0].contains("\"Alpha\"") && v.errors[0].contains("90.0%"));
    assert!(v.errors[1].contains("\"Beta\"") && v.errors[1].contains("110.0%"));
}

#[test]
fn test_validator_rejects_empty_portfolio() {
    let v = validate(&setup());
    assert!(!v.is_valid);
    assert_eq!(
        v.errors,
        vec![
            "Portfolio must have at least one cause".to_string(),
            "Total portfolio amount must be greater than 0".to_string(),
        ]
    );
}

#[test]
fn test_validator_rejects_negative_cause_amount() {
    let mut p = setup_single_cause(PortfolioAllocation::new(50.0, 30.0, 20.0), 1000.0);
    p.items[0].total_amount = -5.0;
    let v = validate(&p);
    assert_eq!(v.errors, vec!["Cause \"Clean Water\" amount cannot be negative".to_string()]);
}

#[test]
fn test_all_consumable_portfolio_is_valid_with_warnings() {
    let p = setup_single_cause(PortfolioAllocation::new(0.0, 100.0, 0.0), 1000.0);
    let v = validate(&p);
    assert!(v.is_valid);
    assert_eq!(v.warnings.len(), 3);
    assert!(v.warnings[0].starts_with("Low diversification score"));
    assert!(v.warnings[1].starts_with("Single cause portfolio"));
    assert!(v.warnings[2].contains("no long-term impact"));
}

#[test]
fn test_diversified_multi_cause_portfolio_has_no_warnings() {
    let v = validate(&setup_balanced());
    assert!(v.is_valid, "{:?}", v.errors);
    assert!(v.warnings.is_empty(), "{:?}", v.warnings);
}

#[test]
fn test_submission_enforces_minimum_amount() {
    let p = setup_single_cause(PortfolioAllocation::new(50.0, 30.0, 20.0), 50.0);
    let v = validate_for_submission(&p, &EngineConfig::default());
    assert!(!v.is_valid);
    assert_eq!(v.errors, vec!["Total portfolio amount must be at least 100".to_string()]);
}

#[test]
fn test_submission_checks_global_allocation_and_percentages() {
    let balanced = setup_balanced().set_global_allocation_at(PortfolioAllocation::new(40.0, 30.0, 20.0), now());
    let v = validate_for_submission(&balanced, &EngineConfig::default());
    assert!(v.errors.iter().any(|e| e.starts_with("Global allocation must sum to 100%")));

    let advanced = setup()
        .change_allocation_mode_at(AllocationMode::Advanced, now())
        .add_cause_at(any_cause("a", "Alpha"), Some(PortfolioAllocation::ALL_PERMANENT), now())
        .add_cause_at(any_cause("b", "Beta"), Some(PortfolioAllocation::ALL_PERMANENT), now())
        .set_total_amount_at(1000.0, now())
        .set_portfolio_percentage_at("a", 50.0, now())
        .set_portfolio_percentage_at("b", 30.0, now());
    let v = validate_for_submission(&advanced, &EngineConfig::default());
    assert_eq!(v.errors, vec!["Cause percentages must sum to 100% (currently 80.0%)".to_string()]);
}

#[test]
fn test_submission_warns_about_unsupported_instruments() {
    let p = setup()
        .change_allocation_mode_at(AllocationMode::Advanced, now())
        .add_cause_at(
            cause("m", "Mosque", &[Instrument::Permanent]),
            Some(PortfolioAllocation::new(50.0, 50.0, 0.0)),
            now(),
        )
        .update_cause_amount_at("m", 500.0, now());
    let v = validate_for_submission(&p, &EngineConfig::default());
    assert!(v.is_valid);
    assert!(v
        .warnings
        .contains(&"Cause \"Mosque\" does not support consumable waqf".to_string()));
}

// ── Drafts ───────────────────────────────────────────────────────────

#[test]
fn test_draft_round_trip_preserves_portfolio() {
    let p = setup_balanced().set_lock_period_months_at(18, now());
    let json = p.to_draft_json().unwrap();
    assert_eq!(Portfolio::from_draft_json(&json).unwrap(), p);

    let draft = PortfolioDraft::new(p.clone(), "donor-1", now());
    assert_eq!(draft.id, p.id);
    let back: PortfolioDraft = serde_json::from_str(&serde_json::to_string(&draft).unwrap()).unwrap();
    assert_eq!(back, draft);
}

// ── Impact ───────────────────────────────────────────────────────────

#[test]
fn test_impact_uses_configured_beneficiary_cost() {
    let p = setup_single_cause(PortfolioAllocation::ALL_PERMANENT, 100_000.0);

    let default = project_at(&p, &EngineConfig::default(), now());
    assert_eq!(default.year1_beneficiaries, 70);
    assert_eq!(default.annual_beneficiaries_after10_years, 70);

    let cheaper = EngineConfig {
        average_beneficiary_cost: 50.0,
        ..EngineConfig::default()
    };
    let p2 = project_at(&p, &cheaper, now());
    assert_eq!(p2.year1_beneficiaries, 140);
    assert_eq!(p2.year10_beneficiaries, 1400);
}
