//! Analysis report and export functionality

use crate::analytics::{Analysis, AnalysisResult, ResultStatus};
use crate::keyboard::Geometry;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: AnalysisSummary,
    /// Per-key strike counts
    pub key_counts: IndexMap<String, f64>,
    /// Per-finger load, in percent
    pub finger_load: IndexMap<String, f64>,
    /// Same-finger digrams with their frequency
    pub same_finger: IndexMap<String, f64>,
    /// Same-key digrams with their frequency
    pub same_key: IndexMap<String, f64>,
    /// Characters the layout cannot type
    pub unsupported_chars: Vec<String>,
    /// Result lines
    pub results: Vec<ResultEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Layout source
    pub layout: String,
    /// Corpus source
    pub corpus: String,
    /// Geometry used for finger assignment
    pub geometry: Geometry,
}

/// Summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub left_hand: f64,
    pub right_hand: f64,
    pub same_finger_usage: f64,
    pub same_key_usage: f64,
    /// Corpus frequency the layout cannot type
    pub unsupported_frequency: f64,
    pub unsupported_digrams: usize,
    /// Number of warnings
    pub issues_detected: u32,
}

/// Single result entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEntry {
    pub label: String,
    pub value: String,
    pub status: String,
}

impl From<&AnalysisResult> for ResultEntry {
    fn from(result: &AnalysisResult) -> Self {
        let status = match result.status {
            ResultStatus::Ok => "ok",
            ResultStatus::Warning => "warning",
            ResultStatus::Info => "info",
        };
        Self {
            label: result.label.clone(),
            value: result.value.clone(),
            status: status.to_string(),
        }
    }
}

impl AnalysisReport {
    /// Create a report for an analysis
    pub fn new(analysis: &Analysis, layout: &str, corpus: &str, geometry: Geometry) -> Self {
        let now: DateTime<Utc> = Utc::now();
        let results = analysis.results();
        let issues = results
            .iter()
            .filter(|r| r.status == ResultStatus::Warning)
            .count() as u32;

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                layout: layout.to_string(),
                corpus: corpus.to_string(),
                geometry,
            },
            summary: AnalysisSummary {
                left_hand: analysis.left_hand,
                right_hand: analysis.right_hand,
                same_finger_usage: analysis.sfu_total,
                same_key_usage: analysis.sku_total,
                unsupported_frequency: analysis.unsupported_total,
                unsupported_digrams: analysis.unsupported_digrams.len(),
                issues_detected: issues,
            },
            key_counts: analysis.key_counts.clone(),
            finger_load: analysis.finger_load.clone(),
            same_finger: analysis.same_finger.clone(),
            same_key: analysis.same_key.clone(),
            unsupported_chars: analysis.unsupported_chars.clone(),
            results: results.iter().map(ResultEntry::from).collect(),
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        log::info!("wrote report to {}", path.display());
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
