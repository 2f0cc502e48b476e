//! Per-hour volume, mistake rate and timing

use super::{fmt_ms, fmt_pct, AnalysisSection, Analyzer, Finding};
use crate::config::AnalysisConfig;
use crate::events::{Dataset, Field};
use crate::utils::Tally;
use std::collections::BTreeMap;

/// Figures for one observed hour of day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourStats {
    pub hour: u32,
    pub count: usize,
    pub mistakes: Tally,
    elapsed_sum: f64,
    elapsed_samples: usize,
}

impl HourStats {
    /// `None` when no event in this hour carries a mistake label.
    pub fn mistake_rate_pct(&self) -> Option<f64> {
        self.mistakes.rate_pct()
    }

    pub fn mean_elapsed_ms(&self) -> Option<f64> {
        (self.elapsed_samples > 0).then(|| self.elapsed_sum / self.elapsed_samples as f64)
    }
}

/// Buckets events by the hour of their timestamp, in hour order.
///
/// Only hours that occur in the data are returned.
pub fn hourly_stats(dataset: &Dataset) -> Vec<HourStats> {
    let mut hours: BTreeMap<u32, HourStats> = BTreeMap::new();
    for event in dataset.events() {
        let Some(hour) = event.hour() else {
            continue;
        };
        let stats = hours.entry(hour).or_insert_with(|| HourStats {
            hour,
            ..Default::default()
        });
        stats.count += 1;
        stats.mistakes.add(event.marked_as_mistake);
        if let Some(ms) = event.elapsed_ms {
            stats.elapsed_sum += ms;
            stats.elapsed_samples += 1;
        }
    }
    hours.into_values().collect()
}

/// Time-of-day breakdown
pub struct TimeOfDayAnalyzer {
    warning_pct: f64,
}

impl TimeOfDayAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            warning_pct: config.mistake_rate_warning_pct,
        }
    }
}

impl Default for TimeOfDayAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Analyzer for TimeOfDayAnalyzer {
    fn name(&self) -> &'static str {
        "Time of Day"
    }

    fn analyze(&self, dataset: &Dataset) -> AnalysisSection {
        if !dataset.has(Field::Timestamp) {
            return AnalysisSection::not_applicable(self.name(), "no Timestamp column");
        }

        let labelled = dataset.has(Field::MarkedAsMistake);
        let mut findings = vec![Finding::heading("Hour | events | mistake rate | mean ElapsedMs")];
        for stats in hourly_stats(dataset) {
            let rate = stats.mistake_rate_pct();
            let rate_text = match rate {
                Some(r) => fmt_pct(r),
                None if labelled => "no data".to_string(),
                None => "n/a".to_string(),
            };
            let elapsed_text = stats
                .mean_elapsed_ms()
                .map(fmt_ms)
                .unwrap_or_else(|| "n/a".to_string());
            let label = format!("{:02}h", stats.hour);
            let value = format!("{:8} | {:>7} | {:>9}", stats.count, rate_text, elapsed_text);
            findings.push(match rate {
                Some(r) => Finding::rate(label, value, r, self.warning_pct),
                None => Finding::info(label, value),
            });
        }

        AnalysisSection::applicable(self.name(), findings)
    }
}
