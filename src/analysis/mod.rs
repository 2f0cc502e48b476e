//! Analyzers over a loaded typing log
//!
//! Each analyzer is a pure function of the [`Dataset`]: it reads the records,
//! checks which optional columns exist, and returns one [`AnalysisSection`].
//! Analyzers never depend on one another, so their order only matters for
//! presentation.

mod basic;
mod problem_keys;
mod timing;
mod sequences;
mod hourly;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use basic::{BasicStats, BasicStatsAnalyzer, ElapsedSummary, IntervalSummary};
pub use problem_keys::{ComboRank, ProblemKeyAnalyzer, ProblemKeys};
pub use timing::{RolloverCorrelation, TimingComparison, TimingPatternAnalyzer, TimingPatterns};
pub use sequences::{rank_key_pairs, KeyPairStats, KeySequenceAnalyzer};
pub use hourly::{hourly_stats, HourStats, TimeOfDayAnalyzer};

use crate::events::Dataset;
use serde::Serialize;

/// Common trait for all analyzers
pub trait Analyzer {
    /// Section title
    fn name(&self) -> &'static str;

    /// Run over the dataset
    fn analyze(&self, dataset: &Dataset) -> AnalysisSection;
}

/// A single reported figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub label: String,
    pub value: String,
    pub status: ResultStatus,
}

impl Finding {
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Ok)
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Warning)
    }

    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Info)
    }

    /// Header line introducing a ranked list or sub-table.
    pub fn heading(label: impl Into<String>) -> Self {
        Self::new(label, "", ResultStatus::Heading)
    }

    /// `Warning` when `rate_pct` reaches `threshold`, `Info` otherwise.
    pub fn rate(
        label: impl Into<String>,
        value: impl Into<String>,
        rate_pct: f64,
        threshold: f64,
    ) -> Self {
        let status = if rate_pct >= threshold {
            ResultStatus::Warning
        } else {
            ResultStatus::Info
        };
        Self::new(label, value, status)
    }
}

/// Status of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Warning,
    Info,
    Heading,
}

/// Whether an analyzer had the columns it needed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Availability {
    Applicable,
    NotApplicable(String),
}

/// Output of one analyzer
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSection {
    pub title: String,
    pub availability: Availability,
    pub findings: Vec<Finding>,
}

impl AnalysisSection {
    pub fn applicable(title: impl Into<String>, findings: Vec<Finding>) -> Self {
        Self {
            title: title.into(),
            availability: Availability::Applicable,
            findings,
        }
    }

    pub fn not_applicable(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            availability: Availability::NotApplicable(reason.into()),
            findings: Vec::new(),
        }
    }

    pub fn is_applicable(&self) -> bool {
        self.availability == Availability::Applicable
    }

    /// First finding with the given label.
    pub fn find(&self, label: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.label == label)
    }

    /// Number of warnings in this section.
    pub fn warnings(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.status == ResultStatus::Warning)
            .count()
    }
}

/// Formats a percentage the way every section prints it.
pub(crate) fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Formats milliseconds the way every section prints them.
pub(crate) fn fmt_ms(value: f64) -> String {
    format!("{:.2}ms", value)
}

/// Placeholder for a figure whose subset is empty.
pub(crate) const NO_DATA: &str = "no data";
