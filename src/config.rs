use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

use crate::detect::DEFAULT_CONTAINMENT_MARGIN;
use crate::ingest::DEFAULT_MIN_CONFIDENCE;

pub const CONFIG_ENV: &str = "PPE_CONFIG";
const MARGIN_ENV: &str = "PPE_CONTAINMENT_MARGIN";
const MIN_CONFIDENCE_ENV: &str = "PPE_MIN_CONFIDENCE";
const CAMERAS_ENV: &str = "PPE_CAMERAS";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    association: Option<AssociationConfigFile>,
    ingest: Option<IngestConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AssociationConfigFile {
    containment_margin: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct IngestConfigFile {
    min_confidence: Option<f64>,
    cameras: Option<Vec<String>>,
}

/// Host-side settings. The engine receives these as plain values; it never
/// loads them itself.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub containment_margin: f64,
    pub min_confidence: f64,
    /// Cameras to process. Empty means all.
    pub cameras: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            containment_margin: DEFAULT_CONTAINMENT_MARGIN,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            cameras: Vec::new(),
        }
    }
}

impl EngineSettings {
    /// Load from the TOML file named by `PPE_CONFIG` (if set), then apply
    /// environment overrides and validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_ENV).ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Same as [`EngineSettings::load`] with an explicit file path.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => SettingsFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SettingsFile) -> Self {
        let defaults = Self::default();
        let containment_margin = file
            .association
            .and_then(|a| a.containment_margin)
            .unwrap_or(defaults.containment_margin);
        let min_confidence = file
            .ingest
            .as_ref()
            .and_then(|i| i.min_confidence)
            .unwrap_or(defaults.min_confidence);
        let cameras = file
            .ingest
            .and_then(|i| i.cameras)
            .unwrap_or(defaults.cameras);
        Self {
            containment_margin,
            min_confidence,
            cameras,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(margin) = std::env::var(MARGIN_ENV) {
            self.containment_margin = margin
                .trim()
                .parse()
                .map_err(|_| anyhow!("{} must be a number", MARGIN_ENV))?;
        }
        if let Ok(conf) = std::env::var(MIN_CONFIDENCE_ENV) {
            self.min_confidence = conf
                .trim()
                .parse()
                .map_err(|_| anyhow!("{} must be a number", MIN_CONFIDENCE_ENV))?;
        }
        if let Ok(cameras) = std::env::var(CAMERAS_ENV) {
            let parsed = split_csv(&cameras);
            if !parsed.is_empty() {
                self.cameras = parsed;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.containment_margin) {
            return Err(anyhow!(
                "containment_margin must be in [0, 1), got {}",
                self.containment_margin
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(anyhow!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            ));
        }
        for camera in &self.cameras {
            validate_camera_id(camera)?;
        }
        Ok(())
    }

    /// True when frames from `camera_id` should be processed.
    pub fn allows_camera(&self, camera_id: &str) -> bool {
        self.cameras.is_empty() || self.cameras.iter().any(|c| c == camera_id)
    }
}

pub fn validate_camera_id(camera_id: &str) -> Result<()> {
    static CAMERA_ID_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = CAMERA_ID_RE
        .get_or_init(|| regex::Regex::new(r"^[A-Za-z0-9_.:-]{1,64}$").expect("valid regex"));
    if re.is_match(camera_id) {
        Ok(())
    } else {
        Err(anyhow!("invalid camera id '{}'", camera_id))
    }
}

fn read_config_file(path: &Path) -> Result<SettingsFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
