//! # Settings Loader
//!
//! Loads the planner settings file and holds the editable planning state.
//!
//! The settings file is JSON and every section is optional; a missing
//! section falls back to the built-in defaults (the 24DIGI price lists,
//! default customer counts and the four standard scenarios).
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/planner_settings.json")?;
//!
//! // Load optional settings (returns None if no path is given)
//! let path = Some(PathBuf::from("planner_settings.json"));
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod import;
pub mod session;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use forecasting::{DEFAULT_FORECAST_PERIODS, MAX_HORIZON_MONTHS};
use forecasting::sensitivity::SensitivityConfig;
use models::{CustomerInput, PricingCatalog, ScenarioCatalog};
use serde::{Deserialize, Serialize};

pub use crate::import::{ImportError, parse_pricing};
pub use crate::session::Session;

pub const DEFAULT_SETTINGS_FILE: &str = "planner_settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub pricing: PricingCatalog,
    pub inputs: CustomerInput,
    pub scenarios: ScenarioCatalog,
    pub forecast_periods: Vec<u32>,
    pub sensitivity: SensitivityConfig,
    /// Display label only; amounts are never converted.
    pub currency: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            pricing: PricingCatalog::default(),
            inputs: CustomerInput::default(),
            scenarios: ScenarioCatalog::default(),
            forecast_periods: DEFAULT_FORECAST_PERIODS.to_vec(),
            sensitivity: SensitivityConfig::default(),
            currency: "AED".to_string(),
        }
    }
}

impl PlannerSettings {
    pub fn into_session(self) -> Session {
        Session::new(self.pricing, self.inputs, self.scenarios)
    }

    /// Copies the session's pricing, inputs and scenarios back for saving.
    pub fn store_session(&mut self, session: &Session) {
        self.pricing = session.pricing().clone();
        self.inputs = session.inputs().clone();
        self.scenarios = session.scenarios().clone();
    }

    /// Checks what deserialization alone cannot: prices must be finite and
    /// >= 0 and horizons must stay within `MAX_HORIZON_MONTHS`.
    pub fn validate(&self) -> Result<()> {
        self.pricing.validate()?;
        for &months in &self.forecast_periods {
            ensure!(
                months <= MAX_HORIZON_MONTHS,
                "forecast period of {months} months exceeds the {MAX_HORIZON_MONTHS}-month limit"
            );
        }
        Ok(())
    }
}

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<PlannerSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: PlannerSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Validating settings in {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        scenarios = settings.scenarios.len(),
        "loaded settings"
    );
    Ok(settings)
}

/// Loads settings from the default location (`planner_settings.json` in the current directory)
pub fn load_default_settings() -> Result<PlannerSettings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<PlannerSettings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Settings from `path` when given, else from the default file when it
/// exists, else the built-in defaults. An unreadable or malformed file is an
/// error, not a fallback.
pub fn load_settings_or_default(path: Option<&PathBuf>) -> Result<PlannerSettings> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(settings);
    }
    if default_settings_exist() {
        return load_default_settings();
    }
    Ok(PlannerSettings::default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}

/// Writes settings as pretty JSON, creating parent directories as needed.
pub fn save_settings<P: AsRef<Path>>(settings: &PlannerSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("Writing settings file: {}", path.display()))?;
    Ok(())
}
