//! PNG charts of the elapsed-time distribution and hourly mistake rate
//!
//! Charts are a by-product of a run. [`PlotGenerator::generate`] reports
//! failures as a [`PlotError`] for the caller to downgrade to a warning.
//!
//! Chart text needs a font. [`PlotStyle::init`] registers one with plotters
//! once at startup; without a usable font the charts are drawn with no
//! captions, axis labels or legends.

use crate::analysis::hourly_stats;
use crate::config::PlotConfig;
use crate::events::{Dataset, Field};
use log::{debug, info};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ELAPSED_PLOT: &str = "elapsed_distribution.png";
pub const HOURLY_PLOT: &str = "hourly_mistakes.png";

const FONT_FAMILY: &str = "sans-serif";
const CORRECT_COLOR: RGBColor = RGBColor(31, 119, 180);
const MISTAKE_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Chart rendering failures
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Failed to create plot directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to render {file}: {message}")]
    Render { file: String, message: String },
}

/// Process-wide chart styling, built once and handed to [`PlotGenerator`].
#[derive(Debug, Clone)]
pub struct PlotStyle {
    font: Option<PathBuf>,
    width: u32,
    height: u32,
    bins: usize,
}

impl PlotStyle {
    /// Load the configured font (or the first readable candidate) and
    /// register it as the sans-serif family.
    pub fn init(config: &PlotConfig) -> Self {
        let candidates = config
            .font_path
            .iter()
            .chain(config.font_candidates.iter());

        let mut font = None;
        for path in candidates {
            let Ok(bytes) = fs::read(path) else {
                continue;
            };
            // Leaked once per process: register_font needs 'static bytes
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                info!("Chart font: {}", path.display());
                font = Some(path.clone());
                break;
            }
            debug!("Not a usable font: {}", path.display());
        }
        if font.is_none() {
            info!("No chart font found, plots will have no text");
        }

        Self {
            font,
            ..Self::plain(config)
        }
    }

    /// Style with no text, for environments without fonts.
    pub fn plain(config: &PlotConfig) -> Self {
        Self {
            font: None,
            width: config.width,
            height: config.height,
            bins: config.histogram_bins.max(1),
        }
    }

    pub fn has_text(&self) -> bool {
        self.font.is_some()
    }
}

/// A chart that was not drawn, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPlot {
    pub file: String,
    pub reason: String,
}

/// What [`PlotGenerator::generate`] produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlotSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedPlot>,
}

/// Count of values per equal-width bin over `range`.
///
/// The last bin is closed so the maximum lands in it; values outside the
/// range are ignored.
pub fn histogram(values: &[f64], bins: usize, range: (f64, f64)) -> Vec<usize> {
    let mut counts = vec![0; bins];
    let (lo, hi) = range;
    if bins == 0 || hi <= lo {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Min and max of `values`, widened by 0.5 either side when they coincide.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().reduce(f64::min)?;
    let hi = values.iter().copied().reduce(f64::max)?;
    if hi > lo {
        Some((lo, hi))
    } else {
        Some((lo - 0.5, hi + 0.5))
    }
}

/// Renders the charts for one dataset
pub struct PlotGenerator {
    style: PlotStyle,
    output_dir: PathBuf,
}

impl PlotGenerator {
    pub fn new(style: PlotStyle, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            style,
            output_dir: output_dir.into(),
        }
    }

    /// Draw every chart the dataset supports.
    pub fn generate(&self, dataset: &Dataset) -> Result<PlotSummary, PlotError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PlotError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut summary = PlotSummary::default();

        if dataset.has(Field::ElapsedMs) {
            let path = self.output_dir.join(ELAPSED_PLOT);
            self.draw_elapsed(dataset, &path)?;
            summary.written.push(path);
        } else {
            summary.skipped.push(SkippedPlot {
                file: ELAPSED_PLOT.to_string(),
                reason: "no ElapsedMs column".to_string(),
            });
        }

        if !dataset.has(Field::MarkedAsMistake) {
            summary.skipped.push(SkippedPlot {
                file: HOURLY_PLOT.to_string(),
                reason: "no MarkedAsMistake column".to_string(),
            });
        } else if !dataset.has(Field::Timestamp) {
            summary.skipped.push(SkippedPlot {
                file: HOURLY_PLOT.to_string(),
                reason: "no Timestamp column".to_string(),
            });
        } else {
            let path = self.output_dir.join(HOURLY_PLOT);
            self.draw_hourly(dataset, &path)?;
            summary.written.push(path);
        }

        Ok(summary)
    }

    fn draw_elapsed(&self, dataset: &Dataset, path: &Path) -> Result<(), PlotError> {
        let fail = |message: String| PlotError::Render {
            file: ELAPSED_PLOT.to_string(),
            message,
        };
        let events = dataset.events();

        // (label, color, samples); one unlabelled series when mistakes are not recorded
        let series: Vec<(&str, RGBColor, Vec<f64>)> = if dataset.has(Field::MarkedAsMistake) {
            let pick = |flag: bool| -> Vec<f64> {
                events
                    .iter()
                    .filter(|e| e.marked_as_mistake == Some(flag))
                    .filter_map(|e| e.elapsed_ms)
                    .collect()
            };
            vec![
                ("Correct", CORRECT_COLOR, pick(false)),
                ("Mistake", MISTAKE_COLOR, pick(true)),
            ]
        } else {
            let all = events.iter().filter_map(|e| e.elapsed_ms).collect();
            vec![("All", CORRECT_COLOR, all)]
        };

        let all_values: Vec<f64> = series.iter().flat_map(|(_, _, v)| v.iter().copied()).collect();
        let Some((lo, hi)) = value_range(&all_values) else {
            return Err(fail("no ElapsedMs samples".to_string()));
        };
        let bins = self.style.bins;
        let bin_width = (hi - lo) / bins as f64;
        let counts: Vec<Vec<usize>> = series
            .iter()
            .map(|(_, _, values)| histogram(values, bins, (lo, hi)))
            .collect();
        let y_max = counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

        let root = BitMapBackend::new(path, (self.style.width, self.style.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| fail(e.to_string()))?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if self.style.has_text() {
            builder
                .caption("ElapsedMs distribution", (FONT_FAMILY, 28))
                .x_label_area_size(50)
                .y_label_area_size(60);
        }
        let mut chart = builder
            .build_cartesian_2d(lo..hi, 0f64..y_max)
            .map_err(|e| fail(e.to_string()))?;

        if self.style.has_text() {
            chart
                .configure_mesh()
                .x_desc("ElapsedMs (time since activation key)")
                .y_desc("Frequency")
                .draw()
                .map_err(|e| fail(e.to_string()))?;
        }

        for ((label, color, _), bin_counts) in series.iter().zip(&counts) {
            let color = *color;
            let bars = bin_counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(move |(i, &count)| {
                    let x0 = lo + i as f64 * bin_width;
                    Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], color.mix(0.7).filled())
                });
            let anno = chart.draw_series(bars).map_err(|e| fail(e.to_string()))?;
            if self.style.has_text() {
                anno.label(*label).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
            }
        }

        if self.style.has_text() && series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8).filled())
                .border_style(BLACK.stroke_width(1))
                .draw()
                .map_err(|e| fail(e.to_string()))?;
        }

        root.present().map_err(|e| fail(e.to_string()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn draw_hourly(&self, dataset: &Dataset, path: &Path) -> Result<(), PlotError> {
        let fail = |message: String| PlotError::Render {
            file: HOURLY_PLOT.to_string(),
            message,
        };
        let hours = hourly_stats(dataset);
        let n = hours.len().max(1);
        let max_rate = hours
            .iter()
            .filter_map(|h| h.mistake_rate_pct())
            .fold(0.0f64, f64::max);
        let y_max = max_rate.max(1.0) * 1.1;

        let root = BitMapBackend::new(path, (self.style.width, self.style.height / 2 + 150))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| fail(e.to_string()))?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if self.style.has_text() {
            builder
                .caption("Mistake rate by hour", (FONT_FAMILY, 28))
                .x_label_area_size(40)
                .y_label_area_size(60);
        }
        let mut chart = builder
            .build_cartesian_2d((0usize..n).into_segmented(), 0f64..y_max)
            .map_err(|e| fail(e.to_string()))?;

        if self.style.has_text() {
            let hour_label = |v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => hours
                    .get(*i)
                    .map(|h| format!("{:02}", h.hour))
                    .unwrap_or_default(),
                _ => String::new(),
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&hour_label)
                .x_desc("Hour")
                .y_desc("Mistake rate (%)")
                .draw()
                .map_err(|e| fail(e.to_string()))?;
        }

        let bars = hours.iter().enumerate().filter_map(|(i, h)| {
            let rate = h.mistake_rate_pct()?;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), rate)],
                CORRECT_COLOR.filled(),
            );
            bar.set_margin(0, 0, 5, 5);
            Some(bar)
        });
        chart.draw_series(bars).map_err(|e| fail(e.to_string()))?;

        root.present().map_err(|e| fail(e.to_string()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
