//! Preset portfolios a donor can start from.

use serde::Serialize;

use crate::stats::{LiquidityLevel, RiskLevel};
use crate::types::{AllocationMode, PortfolioAllocation};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub allocation_mode: AllocationMode,
    pub global_allocation: PortfolioAllocation,
    pub risk_level: RiskLevel,
    /// Advertised score shown on the template card.
    pub diversification_score: u32,
    pub liquidity_level: LiquidityLevel,
    pub tags: &'static [&'static str],
}

impl PortfolioTemplate {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

pub static PORTFOLIO_TEMPLATES: [PortfolioTemplate; 10] = [
    PortfolioTemplate {
        id: "balanced-impact",
        name: "Balanced Impact Portfolio",
        description: "A diversified approach combining long-term stability, immediate impact, and flexible capital.",
        icon: "⚖️",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(40.0, 30.0, 30.0),
        risk_level: RiskLevel::Medium,
        diversification_score: 85,
        liquidity_level: LiquidityLevel::Medium,
        tags: &["diversified", "balanced", "recommended", "beginner-friendly"],
    },
    PortfolioTemplate {
        id: "emergency-response",
        name: "Emergency Response Portfolio",
        description: "Rapid deployment for urgent humanitarian needs through a fully consumable waqf.",
        icon: "🚨",
        allocation_mode: AllocationMode::Simple,
        global_allocation: PortfolioAllocation::new(0.0, 100.0, 0.0),
        risk_level: RiskLevel::Low,
        diversification_score: 40,
        liquidity_level: LiquidityLevel::High,
        tags: &["urgent", "immediate-impact", "humanitarian", "crisis-response"],
    },
    PortfolioTemplate {
        id: "legacy-endowment",
        name: "Legacy Endowment Portfolio",
        description: "A lasting charitable legacy: mostly permanent waqf with a small revolving reserve.",
        icon: "🏛️",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(80.0, 0.0, 20.0),
        risk_level: RiskLevel::Low,
        diversification_score: 60,
        liquidity_level: LiquidityLevel::Low,
        tags: &["long-term", "legacy", "perpetual", "estate-planning"],
    },
    PortfolioTemplate {
        id: "flexible-growth",
        name: "Flexible Growth Portfolio",
        description: "Heavy revolving allocation supports causes without permanently parting with capital.",
        icon: "🌱",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(30.0, 20.0, 50.0),
        risk_level: RiskLevel::Medium,
        diversification_score: 75,
        liquidity_level: LiquidityLevel::High,
        tags: &["flexible", "capital-preservation", "growth", "strategic"],
    },
    PortfolioTemplate {
        id: "education-focused",
        name: "Education Champion Portfolio",
        description: "Long-term scholarship programs with immediate student aid.",
        icon: "🎓",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(60.0, 25.0, 15.0),
        risk_level: RiskLevel::Low,
        diversification_score: 50,
        liquidity_level: LiquidityLevel::Low,
        tags: &["education", "scholarships", "youth", "knowledge"],
    },
    PortfolioTemplate {
        id: "healthcare-hero",
        name: "Healthcare Hero Portfolio",
        description: "Permanent endowment for hospitals and consumable funds for emergency medical aid.",
        icon: "🏥",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(50.0, 40.0, 10.0),
        risk_level: RiskLevel::Medium,
        diversification_score: 55,
        liquidity_level: LiquidityLevel::Medium,
        tags: &["healthcare", "medical", "hospitals", "emergency-care"],
    },
    PortfolioTemplate {
        id: "ramadan-special",
        name: "Ramadan Blessing Portfolio",
        description: "Seasonal giving with a higher consumable share for Iftar programs and Eid support.",
        icon: "🌙",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(20.0, 60.0, 20.0),
        risk_level: RiskLevel::Low,
        diversification_score: 65,
        liquidity_level: LiquidityLevel::High,
        tags: &["ramadan", "seasonal", "zakat", "iftar", "eid"],
    },
    PortfolioTemplate {
        id: "orphan-care",
        name: "Orphan Care Portfolio",
        description: "Long-term education endowment for orphans plus funding for immediate needs.",
        icon: "👶",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(55.0, 35.0, 10.0),
        risk_level: RiskLevel::Low,
        diversification_score: 60,
        liquidity_level: LiquidityLevel::Low,
        tags: &["orphans", "children", "vulnerable", "long-term-care"],
    },
    PortfolioTemplate {
        id: "water-for-life",
        name: "Water for Life Portfolio",
        description: "Permanent waqf for well maintenance and revolving capital for new infrastructure.",
        icon: "💧",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(45.0, 15.0, 40.0),
        risk_level: RiskLevel::Low,
        diversification_score: 70,
        liquidity_level: LiquidityLevel::Medium,
        tags: &["water", "infrastructure", "sustainable", "community"],
    },
    PortfolioTemplate {
        id: "entrepreneur-builder",
        name: "Entrepreneur Builder Portfolio",
        description: "Microfinance and business training through a sustainable revolving lending pool.",
        icon: "💼",
        allocation_mode: AllocationMode::Balanced,
        global_allocation: PortfolioAllocation::new(25.0, 15.0, 60.0),
        risk_level: RiskLevel::Medium,
        diversification_score: 70,
        liquidity_level: LiquidityLevel::High,
        tags: &["microfinance", "entrepreneurship", "economic-empowerment", "sustainable"],
    },
];

pub fn template_by_id(id: &str) -> Option<&'static PortfolioTemplate> {
    PORTFOLIO_TEMPLATES.iter().find(|t| t.id == id)
}

pub fn templates_by_tag(tag: &str) -> Vec<&'static PortfolioTemplate> {
    PORTFOLIO_TEMPLATES.iter().filter(|t| t.has_tag(tag)).collect()
}

/// Templates suggested to first-time donors.
pub fn recommended_templates() -> Vec<&'static PortfolioTemplate> {
    PORTFOLIO_TEMPLATES
        .iter()
        .filter(|t| t.has_tag("recommended") || t.has_tag("beginner-friendly"))
        .collect()
}

pub fn templates_by_risk(level: RiskLevel) -> Vec<&'static PortfolioTemplate> {
    PORTFOLIO_TEMPLATES.iter().filter(|t| t.risk_level == level).collect()
}

pub fn templates_by_liquidity(level: LiquidityLevel) -> Vec<&'static PortfolioTemplate> {
    PORTFOLIO_TEMPLATES
        .iter()
        .filter(|t| t.liquidity_level == level)
        .collect()
}
