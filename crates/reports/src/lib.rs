//! CSV and JSON writers for calculator and forecast results.

pub mod csv_export;
pub mod summary;

pub use crate::csv_export::{
    BreakdownRecord, breakdown_records, create_output, write_breakdown, write_forecast_table,
    write_monthly_projection, write_records,
};
pub use crate::summary::{ExecutiveSummary, ReportMetadata, envelope, executive_summary, write_json};
