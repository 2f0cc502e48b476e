//! Fixed-order analysis run over one dataset

use crate::analysis::{
    AnalysisSection, Analyzer, BasicStatsAnalyzer, KeySequenceAnalyzer, ProblemKeyAnalyzer,
    TimeOfDayAnalyzer, TimingPatternAnalyzer,
};
use crate::config::AnalysisConfig;
use crate::events::Dataset;
use crate::plots::{PlotGenerator, PlotSummary};
use log::warn;
use serde::Serialize;

/// Result of the chart stage. A rendering failure is a warning, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum PlotOutcome {
    Generated(PlotSummary),
    Warning(String),
    Disabled,
}

impl PlotOutcome {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }
}

/// Analyzers in report order.
pub fn analyzers(config: &AnalysisConfig) -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(BasicStatsAnalyzer::new(config)),
        Box::new(ProblemKeyAnalyzer::new(config)),
        Box::new(TimingPatternAnalyzer::new(config)),
        Box::new(KeySequenceAnalyzer::new(config)),
        Box::new(TimeOfDayAnalyzer::new(config)),
    ]
}

/// Run every analyzer once over `dataset`.
pub fn run_analyses(dataset: &Dataset, config: &AnalysisConfig) -> Vec<AnalysisSection> {
    analyzers(config)
        .iter()
        .map(|analyzer| analyzer.analyze(dataset))
        .collect()
}

/// Draw the charts, downgrading any failure to a warning.
pub fn run_plots(generator: &PlotGenerator, dataset: &Dataset) -> PlotOutcome {
    match generator.generate(dataset) {
        Ok(summary) => PlotOutcome::Generated(summary),
        Err(e) => {
            warn!("Chart generation failed: {}", e);
            PlotOutcome::Warning(e.to_string())
        }
    }
}
