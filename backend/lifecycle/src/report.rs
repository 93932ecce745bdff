//! Sweep report written after every pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAction {
    /// An active consumable waqf that evaluates as completed.
    Completed,
    /// An active consumable waqf whose next monthly payout has fallen due.
    DistributionDue,
    /// An active revolving waqf past its maturity date.
    Matured,
}

impl SweepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::DistributionDue => "distribution_due",
            Self::Matured => "matured",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waqf_id: Option<String>,
    pub name: String,
    pub action: SweepAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepCounts {
    pub completed: usize,
    pub distribution_due: usize,
    pub matured: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub generated_at: DateTime<Utc>,
    pub counts: SweepCounts,
    pub records: Vec<SweepRecord>,
}

impl SweepReport {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        SweepReport {
            generated_at,
            counts: SweepCounts::default(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, record: SweepRecord) {
        match record.action {
            SweepAction::Completed => self.counts.completed += 1,
            SweepAction::DistributionDue => self.counts.distribution_due += 1,
            SweepAction::Matured => self.counts.matured += 1,
        }
        self.records.push(record);
    }

    pub fn unchanged(&mut self) {
        self.counts.unchanged += 1;
    }

    pub fn actions(&self) -> usize {
        self.records.len()
    }
}
