//! Key-combination frequency and per-combination mistake rates

use super::{fmt_pct, AnalysisSection, Analyzer, Finding};
use crate::config::AnalysisConfig;
use crate::events::{Dataset, Field};
use crate::utils;
use std::collections::HashMap;

/// One key combination with its dataset-wide counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRank {
    pub combo: String,
    /// Occurrences across the whole dataset
    pub total: usize,
    pub mistakes: usize,
}

impl ComboRank {
    /// Mistakes over every occurrence of the combo, not only the flagged ones.
    pub fn rate_pct(&self) -> Option<f64> {
        utils::percent(self.mistakes, self.total)
    }
}

/// Rankings produced by [`ProblemKeyAnalyzer`]
#[derive(Debug, Clone, Default)]
pub struct ProblemKeys {
    /// Most frequent combos
    pub top_combos: Vec<ComboRank>,
    /// Combos with the most mistakes; `None` when nothing was flagged
    pub top_mistakes: Option<Vec<ComboRank>>,
}

impl ProblemKeys {
    pub fn summarize(dataset: &Dataset, top_n: usize) -> Self {
        let mut counts: HashMap<String, ComboRank> = HashMap::new();
        for event in dataset.events() {
            let Some(combo) = event.key_combo() else {
                continue;
            };
            let entry = counts.entry(combo.clone()).or_insert_with(|| ComboRank {
                combo,
                total: 0,
                mistakes: 0,
            });
            entry.total += 1;
            if event.marked_as_mistake == Some(true) {
                entry.mistakes += 1;
            }
        }

        let mut by_count: Vec<ComboRank> = counts.into_values().collect();
        by_count.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.combo.cmp(&b.combo)));

        let any_mistake = dataset.has(Field::MarkedAsMistake)
            && dataset
                .events()
                .iter()
                .any(|e| e.marked_as_mistake == Some(true));

        let top_mistakes = any_mistake.then(|| {
            let mut by_mistakes: Vec<ComboRank> = by_count
                .iter()
                .filter(|c| c.mistakes > 0)
                .cloned()
                .collect();
            by_mistakes.sort_by(|a, b| {
                b.mistakes
                    .cmp(&a.mistakes)
                    .then_with(|| a.combo.cmp(&b.combo))
            });
            by_mistakes.truncate(top_n);
            by_mistakes
        });

        by_count.truncate(top_n);
        Self {
            top_combos: by_count,
            top_mistakes,
        }
    }
}

/// Ranks key combinations by use and by mistakes
pub struct ProblemKeyAnalyzer {
    top_n: usize,
    warning_pct: f64,
}

impl ProblemKeyAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            top_n: config.top_n,
            warning_pct: config.mistake_rate_warning_pct,
        }
    }
}

impl Default for ProblemKeyAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Analyzer for ProblemKeyAnalyzer {
    fn name(&self) -> &'static str {
        "Problem Keys"
    }

    fn analyze(&self, dataset: &Dataset) -> AnalysisSection {
        let summary = ProblemKeys::summarize(dataset, self.top_n);
        if summary.top_combos.is_empty() {
            return AnalysisSection::not_applicable(
                self.name(),
                "no events carry both ActivationKeyName and SourceKeyName",
            );
        }

        let mut findings = vec![Finding::heading(format!(
            "Most used key combinations (top {})",
            self.top_n
        ))];
        for (i, rank) in summary.top_combos.iter().enumerate() {
            findings.push(Finding::info(
                format!("{:2}. {}", i + 1, rank.combo),
                format!("{}x", rank.total),
            ));
        }

        if let Some(mistakes) = &summary.top_mistakes {
            findings.push(Finding::heading(format!(
                "Key combinations with the most mistakes (top {})",
                self.top_n
            )));
            for (i, rank) in mistakes.iter().enumerate() {
                let rate = rank.rate_pct().unwrap_or(0.0);
                findings.push(Finding::rate(
                    format!("{:2}. {}", i + 1, rank.combo),
                    format!("{}x / {}x = {}", rank.mistakes, rank.total, fmt_pct(rate)),
                    rate,
                    self.warning_pct,
                ));
            }
        }

        AnalysisSection::applicable(self.name(), findings)
    }
}
