//! Timing of mistakes versus correct keys, and rollover versus mistakes

use super::{fmt_ms, fmt_pct, AnalysisSection, Analyzer, Finding, NO_DATA};
use crate::config::AnalysisConfig;
use crate::events::{Dataset, Field};
use crate::utils::{self, Tally};

/// Mean `ElapsedMs` of flagged and unflagged events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingComparison {
    pub mistake_count: usize,
    pub correct_count: usize,
    pub mistake_mean: Option<f64>,
    pub correct_mean: Option<f64>,
}

impl TimingComparison {
    /// Mistake mean minus correct mean, when both subsets have samples.
    pub fn difference(&self) -> Option<f64> {
        Some(self.mistake_mean? - self.correct_mean?)
    }

    pub fn direction(&self) -> Option<&'static str> {
        self.difference().map(|diff| {
            if diff < 0.0 {
                "mistakes are faster"
            } else if diff > 0.0 {
                "mistakes are slower"
            } else {
                "no difference"
            }
        })
    }
}

/// Mistake rate conditioned on the rollover flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolloverCorrelation {
    pub with_rollover: Tally,
    pub without_rollover: Tally,
}

/// Output of [`TimingPatternAnalyzer`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingPatterns {
    pub elapsed: TimingComparison,
    /// `None` when the log has no `RolloverDetected` column
    pub rollover: Option<RolloverCorrelation>,
}

impl TimingPatterns {
    /// `None` when the log has no `MarkedAsMistake` column.
    pub fn summarize(dataset: &Dataset) -> Option<Self> {
        if !dataset.has(Field::MarkedAsMistake) {
            return None;
        }

        let mut mistakes = Vec::new();
        let mut correct = Vec::new();
        let mut mistake_count = 0;
        let mut correct_count = 0;
        for event in dataset.events() {
            let bucket = match event.marked_as_mistake {
                Some(true) => {
                    mistake_count += 1;
                    &mut mistakes
                }
                Some(false) => {
                    correct_count += 1;
                    &mut correct
                }
                None => continue,
            };
            if let Some(ms) = event.elapsed_ms {
                bucket.push(ms);
            }
        }

        let rollover = dataset.has(Field::RolloverDetected).then(|| {
            let mut correlation = RolloverCorrelation::default();
            for event in dataset.events() {
                match event.rollover_detected {
                    Some(true) => correlation.with_rollover.add(event.marked_as_mistake),
                    Some(false) => correlation.without_rollover.add(event.marked_as_mistake),
                    None => {}
                }
            }
            correlation
        });

        Some(Self {
            elapsed: TimingComparison {
                mistake_count,
                correct_count,
                mistake_mean: utils::mean(&mistakes),
                correct_mean: utils::mean(&correct),
            },
            rollover,
        })
    }
}

/// Compares timing between mistakes and correct keys
pub struct TimingPatternAnalyzer {
    warning_pct: f64,
}

impl TimingPatternAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            warning_pct: config.mistake_rate_warning_pct,
        }
    }
}

impl Default for TimingPatternAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn ms_or_no_data(value: Option<f64>) -> String {
    value.map(fmt_ms).unwrap_or_else(|| NO_DATA.to_string())
}

impl Analyzer for TimingPatternAnalyzer {
    fn name(&self) -> &'static str {
        "Timing Patterns"
    }

    fn analyze(&self, dataset: &Dataset) -> AnalysisSection {
        let Some(patterns) = TimingPatterns::summarize(dataset) else {
            return AnalysisSection::not_applicable(
                self.name(),
                "no MarkedAsMistake column, mistakes cannot be compared",
            );
        };

        let elapsed = &patterns.elapsed;
        let mut findings = vec![
            Finding::heading("ElapsedMs comparison"),
            Finding::info(
                "Mistake mean",
                format!("{} (n={})", ms_or_no_data(elapsed.mistake_mean), elapsed.mistake_count),
            ),
            Finding::info(
                "Correct mean",
                format!("{} (n={})", ms_or_no_data(elapsed.correct_mean), elapsed.correct_count),
            ),
        ];
        match (elapsed.difference(), elapsed.direction()) {
            (Some(diff), Some(direction)) => findings.push(Finding::info(
                "Difference",
                format!("{:+.2}ms ({})", diff, direction),
            )),
            _ => findings.push(Finding::info("Difference", NO_DATA)),
        }

        if let Some(rollover) = &patterns.rollover {
            findings.push(Finding::heading("Rollover and mistakes"));
            for (label, tally) in [
                ("Mistake rate with rollover", &rollover.with_rollover),
                ("Mistake rate without rollover", &rollover.without_rollover),
            ] {
                match tally.rate_pct() {
                    Some(rate) => findings.push(Finding::rate(
                        label,
                        format!("{} ({} / {})", fmt_pct(rate), tally.hits, tally.total),
                        rate,
                        self.warning_pct,
                    )),
                    None => findings.push(Finding::info(label, NO_DATA)),
                }
            }
        }

        AnalysisSection::applicable(self.name(), findings)
    }
}
