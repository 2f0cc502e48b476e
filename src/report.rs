//! Console rendering and JSON export of an analysis run

use crate::analysis::{AnalysisSection, Availability, ResultStatus};
use crate::events::Dataset;
use crate::pipeline::PlotOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 60;

/// Complete analysis report
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// One entry per analyzer, in run order
    pub sections: Vec<AnalysisSection>,
    /// Chart stage result
    pub plots: PlotOutcome,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Log files analysed
    pub sources: Vec<PathBuf>,
    /// Records loaded
    pub total_events: usize,
    /// Lines discarded as malformed
    pub skipped_lines: usize,
    /// Warnings raised across all sections
    pub issues_detected: usize,
}

impl AnalysisReport {
    /// Create a new report
    pub fn new(dataset: &Dataset, sections: Vec<AnalysisSection>, plots: PlotOutcome) -> Self {
        let now: DateTime<Utc> = Utc::now();
        let issues = sections.iter().map(AnalysisSection::warnings).sum();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                sources: dataset.sources().to_vec(),
                total_events: dataset.len(),
                skipped_lines: dataset.skipped_lines(),
                issues_detected: issues,
            },
            sections,
            plots,
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Header block used between sections.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}\n")
}

/// Text rendering of one section for the console.
pub fn render_section(section: &AnalysisSection) -> String {
    let mut out = banner(&section.title);

    if let Availability::NotApplicable(reason) = &section.availability {
        let _ = writeln!(out, "Not applicable: {}", reason);
        return out;
    }

    let width = section
        .findings
        .iter()
        .filter(|f| f.status != ResultStatus::Heading)
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);

    for finding in &section.findings {
        match finding.status {
            ResultStatus::Heading => {
                let _ = writeln!(out, "\n{}:", finding.label);
            }
            status => {
                let marker = if status == ResultStatus::Warning { " (!)" } else { "" };
                let pad = width.saturating_sub(finding.label.chars().count());
                let _ = writeln!(
                    out,
                    "  {}{} : {}{}",
                    finding.label,
                    " ".repeat(pad),
                    finding.value,
                    marker
                );
            }
        }
    }
    out
}

/// Text rendering of the plot stage.
pub fn render_plots(outcome: &PlotOutcome) -> String {
    let mut out = String::new();
    match outcome {
        PlotOutcome::Generated(summary) => {
            for path in &summary.written {
                let _ = writeln!(out, "Chart saved: {}", path.display());
            }
            for skipped in &summary.skipped {
                let _ = writeln!(out, "Chart skipped: {} ({})", skipped.file, skipped.reason);
            }
        }
        PlotOutcome::Warning(message) => {
            let _ = writeln!(out, "Warning: chart generation failed: {}", message);
        }
        PlotOutcome::Disabled => {}
    }
    out
}

/// Full console report.
pub fn render_console(report: &AnalysisReport) -> String {
    let mut out = String::new();
    for section in &report.sections {
        out.push_str(&render_section(section));
        out.push('\n');
    }
    let plots = render_plots(&report.plots);
    if !plots.is_empty() {
        out.push_str(&plots);
        out.push('\n');
    }
    out.push_str(&banner("Analysis complete"));
    out
}
