use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::sensing::{HeartRateConfig, RespiratoryConfig};

/// Per-device tuning for both estimators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Calibration {
    pub respiratory: RespiratoryConfig,
    pub heart_rate: HeartRateConfig,
}

/// Names of the bundled inputs used by the measure buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetNames {
    pub accel_x: String,
    pub accel_y: String,
    pub accel_z: String,
    pub heart_rate_video: String,
}

impl Default for AssetNames {
    fn default() -> Self {
        Self {
            accel_x: "CSVBreatheX.csv".into(),
            accel_y: "CSVBreatheY.csv".into(),
            accel_z: "CSVBreatheZ.csv".into(),
            heart_rate_video: "HeartRate.mp4".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UserSettings {
    calibration: Calibration,
    assets: AssetNames,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings at {}: {err}; using defaults",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn calibration(&self) -> Calibration {
        self.read().calibration.clone()
    }

    pub fn assets(&self) -> AssetNames {
        self.read().assets.clone()
    }

    pub fn update_calibration(&self, calibration: Calibration) -> Result<()> {
        let mut guard = self.write();
        guard.calibration = calibration;
        self.persist(&guard)
    }

    pub fn update_assets(&self, assets: AssetNames) -> Result<()> {
        let mut guard = self.write();
        guard.assets = assets;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings in {}", self.path.display()))?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
