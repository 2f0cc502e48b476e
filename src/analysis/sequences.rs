//! Previous-key → current-key mistake patterns

use super::{fmt_pct, AnalysisSection, Analyzer, Finding};
use crate::config::AnalysisConfig;
use crate::events::{Dataset, Field};
use crate::utils;
use std::collections::HashMap;

/// Pairs seen fewer times than this are never ranked, whatever the config says.
pub const MIN_PAIR_SAMPLES: usize = 5;

/// Counts for one ordered key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairStats {
    pub pair: String,
    /// Labelled occurrences of the pair
    pub count: usize,
    pub mistakes: usize,
}

impl KeyPairStats {
    pub fn rate_pct(&self) -> f64 {
        utils::percent(self.mistakes, self.count).unwrap_or(0.0)
    }
}

/// Groups labelled events by key pair, drops pairs seen fewer than
/// `min_samples` times (at least [`MIN_PAIR_SAMPLES`]) and sorts the rest by
/// mistake rate.
///
/// Returns `None` when the log lacks `PreviousKey` or `MarkedAsMistake`. A
/// `PreviousKey` column holding only nulls still counts: every pair then
/// starts from `(start)`.
pub fn rank_key_pairs(dataset: &Dataset, min_samples: usize) -> Option<Vec<KeyPairStats>> {
    if !dataset.has_column(Field::PreviousKey) || !dataset.has(Field::MarkedAsMistake) {
        return None;
    }
    let min_samples = min_samples.max(MIN_PAIR_SAMPLES);

    let mut groups: HashMap<String, KeyPairStats> = HashMap::new();
    for event in dataset.events() {
        let (Some(pair), Some(mistake)) = (event.key_pair(), event.marked_as_mistake) else {
            continue;
        };
        let stats = groups.entry(pair.clone()).or_insert_with(|| KeyPairStats {
            pair,
            count: 0,
            mistakes: 0,
        });
        stats.count += 1;
        if mistake {
            stats.mistakes += 1;
        }
    }

    let mut ranked: Vec<KeyPairStats> = groups
        .into_values()
        .filter(|s| s.count >= min_samples)
        .collect();
    // Compare mistakes * other.count instead of float rates so equal rates tie exactly
    ranked.sort_by(|a, b| {
        (b.mistakes * a.count)
            .cmp(&(a.mistakes * b.count))
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.pair.cmp(&b.pair))
    });
    Some(ranked)
}

/// Finds key sequences that tend to produce mistakes
pub struct KeySequenceAnalyzer {
    top_n: usize,
    min_samples: usize,
    warning_pct: f64,
}

impl KeySequenceAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            top_n: config.top_n,
            min_samples: config.min_pair_samples.max(MIN_PAIR_SAMPLES),
            warning_pct: config.mistake_rate_warning_pct,
        }
    }
}

impl Default for KeySequenceAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Analyzer for KeySequenceAnalyzer {
    fn name(&self) -> &'static str {
        "Key Sequences"
    }

    fn analyze(&self, dataset: &Dataset) -> AnalysisSection {
        let Some(ranked) = rank_key_pairs(dataset, self.min_samples) else {
            return AnalysisSection::not_applicable(
                self.name(),
                "needs both PreviousKey and MarkedAsMistake columns",
            );
        };

        let mut findings = vec![Finding::heading(format!(
            "Key sequences with the highest mistake rate (top {}, n >= {})",
            self.top_n, self.min_samples
        ))];
        if ranked.is_empty() {
            findings.push(Finding::info(
                "Pairs",
                format!("none with at least {} samples", self.min_samples),
            ));
        }
        for (i, stats) in ranked.iter().take(self.top_n).enumerate() {
            let rate = stats.rate_pct();
            findings.push(Finding::rate(
                format!("{:2}. {}", i + 1, stats.pair),
                format!("{} ({}/{})", fmt_pct(rate), stats.mistakes, stats.count),
                rate,
                self.warning_pct,
            ));
        }

        AnalysisSection::applicable(self.name(), findings)
    }
}
