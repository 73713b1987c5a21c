use std::path::{Path, PathBuf};

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractoError, Result};
use crate::importer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Largest gap between |balance delta| and the amount still read as a sign.
    pub sign_tolerance: Decimal,
    pub reconcile_tolerance: Decimal,
    /// Vertical distance that groups positioned words into one line.
    pub band_tolerance: f64,
    pub default_bank: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sign_tolerance: dec!(0.05),
            reconcile_tolerance: dec!(0.01),
            band_tolerance: crate::lines::DEFAULT_BAND_TOLERANCE,
            default_bank: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.sign_tolerance <= Decimal::ZERO {
            return Err(ExtractoError::Settings("sign_tolerance must be positive".into()));
        }
        if self.reconcile_tolerance <= Decimal::ZERO {
            return Err(ExtractoError::Settings("reconcile_tolerance must be positive".into()));
        }
        if !(self.band_tolerance > 0.0) {
            return Err(ExtractoError::Settings("band_tolerance must be positive".into()));
        }
        if let Some(key) = &self.default_bank {
            importer::get_by_key(key).ok_or_else(|| ExtractoError::UnknownBank(key.clone()))?;
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("extracto")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring unreadable {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    settings.validate()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ExtractoError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
