use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use models::{ComprehensiveResults, PeriodTotals, ResultsSummary, ServiceResult, SubscriptionResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub report_type: String,
    pub generated_at: String,
    pub currency: String,
}

impl ReportMetadata {
    pub fn now(report_type: &str, currency: &str) -> Self {
        Self {
            report_type: report_type.to_string(),
            generated_at: Local::now().to_rfc3339(),
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutiveSummary<'a> {
    pub metadata: ReportMetadata,
    pub totals: &'a PeriodTotals,
    pub summary: &'a ResultsSummary,
    pub subscriptions: &'a [SubscriptionResult],
    pub additional_services: &'a [ServiceResult],
}

pub fn executive_summary<'a>(results: &'a ComprehensiveResults, currency: &str) -> ExecutiveSummary<'a> {
    ExecutiveSummary {
        metadata: ReportMetadata::now("Executive Summary", currency),
        totals: &results.totals,
        summary: &results.summary,
        subscriptions: &results.subscriptions,
        additional_services: &results.additional_services,
    }
}

/// Any report wrapped with metadata, for JSON output.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub metadata: ReportMetadata,
    pub report: &'a T,
}

pub fn envelope<'a, T: Serialize>(report_type: &str, currency: &str, report: &'a T) -> Envelope<'a, T> {
    Envelope {
        metadata: ReportMetadata::now(report_type, currency),
        report,
    }
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(value: &T, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(out_path, json).with_context(|| format!("Writing {}", out_path.display()))?;
    Ok(())
}
