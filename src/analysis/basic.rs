//! Summary counts, rates and timing distributions

use super::{fmt_ms, fmt_pct, AnalysisSection, Analyzer, Finding};
use crate::config::AnalysisConfig;
use crate::events::{Dataset, Field, TypingEvent};
use crate::utils::{self, MinMaxExt, Tally};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// Distribution of `ElapsedMs`
#[derive(Debug, Clone, PartialEq)]
pub struct ElapsedSummary {
    pub mean: f64,
    pub median: f64,
    /// Needs two or more samples
    pub std_dev: Option<f64>,
}

/// Distribution of `TimeSinceLastKey`
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Dataset-wide figures. `None` means the source column is absent.
#[derive(Debug, Clone, Default)]
pub struct BasicStats {
    pub total_events: usize,
    pub first_session_id: Option<String>,
    pub session_count: Option<usize>,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub mistakes: Option<Tally>,
    pub rollovers: Option<Tally>,
    pub training: Option<Tally>,
    pub elapsed: Option<ElapsedSummary>,
    pub interval: Option<IntervalSummary>,
    /// Count per `EventType`, most common first
    pub event_types: Vec<(String, usize)>,
}

impl BasicStats {
    pub fn summarize(dataset: &Dataset) -> Self {
        let events = dataset.events();
        let tally_of = |field: Field, get: fn(&TypingEvent) -> Option<bool>| {
            dataset
                .has(field)
                .then(|| events.iter().map(get).collect::<Tally>())
        };

        let sessions: BTreeSet<&str> = events
            .iter()
            .filter_map(|e| e.session_id.as_deref())
            .collect();

        let elapsed: Vec<f64> = events.iter().filter_map(|e| e.elapsed_ms).collect();
        let elapsed = utils::mean(&elapsed).and_then(|mean| {
            Some(ElapsedSummary {
                mean,
                median: utils::median(&elapsed)?,
                std_dev: utils::std_dev(&elapsed),
            })
        });

        let intervals: Vec<f64> = events.iter().filter_map(|e| e.time_since_last_key).collect();
        let interval = utils::mean(&intervals).map(|mean| {
            let mut min: Option<f64> = None;
            let mut max: Option<f64> = None;
            for &v in &intervals {
                min.update_min(v);
                max.update_max(v);
            }
            IntervalSummary {
                mean,
                min: min.unwrap_or(mean),
                max: max.unwrap_or(mean),
            }
        });

        let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for kind in events.iter().filter_map(|e| e.event_type.as_deref()) {
            *type_counts.entry(kind).or_default() += 1;
        }
        let mut event_types: Vec<(String, usize)> = type_counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        event_types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_events: events.len(),
            first_session_id: events.iter().find_map(|e| e.session_id.clone()),
            session_count: (!sessions.is_empty()).then_some(sessions.len()),
            first_timestamp: events.iter().filter_map(|e| e.timestamp).min(),
            last_timestamp: events.iter().filter_map(|e| e.timestamp).max(),
            mistakes: tally_of(Field::MarkedAsMistake, |e| e.marked_as_mistake),
            rollovers: tally_of(Field::RolloverDetected, |e| e.rollover_detected),
            training: tally_of(Field::TrainingMode, |e| e.training_mode),
            elapsed,
            interval,
            event_types,
        }
    }
}

/// Dataset-wide counts, rates and timing distributions
pub struct BasicStatsAnalyzer {
    warning_pct: f64,
}

impl BasicStatsAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            warning_pct: config.mistake_rate_warning_pct,
        }
    }
}

impl Default for BasicStatsAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn fmt_tally(tally: &Tally) -> Option<(f64, String)> {
    let rate = tally.rate_pct()?;
    Some((rate, format!("{} ({} / {})", fmt_pct(rate), tally.hits, tally.total)))
}

impl Analyzer for BasicStatsAnalyzer {
    fn name(&self) -> &'static str {
        "Basic Statistics"
    }

    fn analyze(&self, dataset: &Dataset) -> AnalysisSection {
        let stats = BasicStats::summarize(dataset);
        let mut findings = vec![Finding::info("Total events", stats.total_events.to_string())];

        if let Some(id) = &stats.first_session_id {
            findings.push(Finding::info("Session", id.clone()));
        }
        if let Some(n) = stats.session_count.filter(|&n| n > 1) {
            findings.push(Finding::info("Sessions", n.to_string()));
        }
        if let (Some(first), Some(last)) = (stats.first_timestamp, stats.last_timestamp) {
            findings.push(Finding::info(
                "Period",
                format!(
                    "{} ~ {}",
                    first.format("%Y-%m-%d %H:%M:%S"),
                    last.format("%Y-%m-%d %H:%M:%S")
                ),
            ));
        }

        match stats.mistakes.as_ref().and_then(fmt_tally) {
            Some((rate, value)) => {
                findings.push(Finding::rate("Mistake rate", value, rate, self.warning_pct))
            }
            None => findings.push(Finding::info(
                "Mistake rate",
                "not applicable (no MarkedAsMistake column)",
            )),
        }
        if let Some((_, value)) = stats.rollovers.as_ref().and_then(fmt_tally) {
            findings.push(Finding::info("Rollover rate", value));
        }
        if let Some((_, value)) = stats.training.as_ref().and_then(fmt_tally) {
            findings.push(Finding::info("Training mode", value));
        }

        if let Some(elapsed) = &stats.elapsed {
            findings.push(Finding::heading("Timing"));
            findings.push(Finding::info("Mean ElapsedMs", fmt_ms(elapsed.mean)));
            findings.push(Finding::info("Median ElapsedMs", fmt_ms(elapsed.median)));
            if let Some(sd) = elapsed.std_dev {
                findings.push(Finding::info("ElapsedMs std dev", fmt_ms(sd)));
            }
        }

        if let Some(interval) = &stats.interval {
            findings.push(Finding::heading("Typing speed"));
            findings.push(Finding::info("Mean key interval", fmt_ms(interval.mean)));
            findings.push(Finding::info("Min key interval", fmt_ms(interval.min)));
            findings.push(Finding::info("Max key interval", fmt_ms(interval.max)));
        }

        if !stats.event_types.is_empty() {
            findings.push(Finding::heading("Event types"));
            let typed: usize = stats.event_types.iter().map(|(_, n)| n).sum();
            for (kind, count) in &stats.event_types {
                let share = utils::percent(*count, typed).unwrap_or(0.0);
                findings.push(Finding::info(
                    kind.clone(),
                    format!("{} ({})", count, fmt_pct(share)),
                ));
            }
        }

        AnalysisSection::applicable(self.name(), findings)
    }
}
