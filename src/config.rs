// src/config.rs
//! Configuration management, stored as JSON in the user's config directory

use crate::{
    error::{Result, TrackerError},
    geo::REGION_PADDING_DEG,
    location::LocationOptions,
    metrics::CalorieProfile,
    tracker::{SplitCheck, TrackerSettings},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutConfig {
    pub source_type: String, // "gpsd", "serial", "replay"
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub gpsd_host: Option<String>,
    pub gpsd_port: Option<u16>,
    pub replay_file: Option<PathBuf>,
    pub location: LocationOptions,
    pub calories: CalorieProfile,
    pub split_distance_m: f64,
    pub split_check: SplitCheck,
    pub region_padding_deg: f64,
    /// Remembered answer to the location permission prompt
    pub location_consent: Option<bool>,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            source_type: "gpsd".to_string(),
            serial_port: None,
            serial_baudrate: Some(9600),
            gpsd_host: Some("localhost".to_string()),
            gpsd_port: Some(2947),
            replay_file: None,
            location: LocationOptions::default(),
            calories: CalorieProfile::default(),
            split_distance_m: 100.0,
            split_check: SplitCheck::AfterSample,
            region_padding_deg: REGION_PADDING_DEG,
            location_consent: None,
        }
    }
}

impl WorkoutConfig {
    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::Other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TrackerError::Other(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TrackerError::Other(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Other(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| TrackerError::Other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Persist a location consent answer into the default config file
    pub fn store_consent(consent: Option<bool>) -> Result<()> {
        Self::store_consent_at(&Self::get_config_path()?, consent)
    }

    /// Rewrite only `location_consent` in the file at `path`. A file that
    /// fails to load is an error and stays untouched.
    pub fn store_consent_at(path: &Path, consent: Option<bool>) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.location_consent = consent;
        stored.save_to(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| TrackerError::Other("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("workout-tracker").join("config.json"))
    }

    /// Reject values the tracker cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.split_distance_m.is_finite() && self.split_distance_m > 0.0) {
            return Err(TrackerError::Other(format!(
                "split_distance_m must be positive, got {}",
                self.split_distance_m
            )));
        }
        if !(self.region_padding_deg.is_finite() && self.region_padding_deg >= 0.0) {
            return Err(TrackerError::Other(format!(
                "region_padding_deg must not be negative, got {}",
                self.region_padding_deg
            )));
        }
        if self.calories.resting_heart_rate.is_nan() || self.calories.resting_heart_rate <= 0.0 {
            return Err(TrackerError::Other("calories.resting_heart_rate must be positive".to_string()));
        }
        Ok(())
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            split_distance_m: self.split_distance_m,
            split_check: self.split_check,
        }
    }

    /// Update configuration with a new source type
    pub fn update_source(&mut self, source_type: &str) {
        self.source_type = source_type.to_string();
    }

    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.source_type = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    pub fn update_gpsd(&mut self, host: String, port: u16) {
        self.source_type = "gpsd".to_string();
        self.gpsd_host = Some(host);
        self.gpsd_port = Some(port);
    }

    pub fn update_replay(&mut self, path: PathBuf) {
        self.source_type = "replay".to_string();
        self.replay_file = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("workout-tracker-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_default_config() {
        let config = WorkoutConfig::default();
        assert_eq!(config.source_type, "gpsd");
        assert_eq!(config.split_distance_m, 100.0);
        assert_eq!(config.region_padding_deg, 0.01);
        assert_eq!(config.calories.mass_kg, 80.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_update_serial() {
        let mut config = WorkoutConfig::default();
        config.update_serial("/dev/ttyUSB0".to_string(), 115200);
        assert_eq!(config.source_type, "serial");
        assert_eq!(config.serial_port, Some("/dev/ttyUSB0".to_string()));
        assert_eq!(config.serial_baudrate, Some(115200));
    }

    #[test]
    fn test_update_replay() {
        let mut config = WorkoutConfig::default();
        config.update_replay(PathBuf::from("run.json"));
        assert_eq!(config.source_type, "replay");
        assert_eq!(config.replay_file, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = WorkoutConfig::load_from(Path::new("/nonexistent/workout/config.json")).unwrap();
        assert_eq!(config, WorkoutConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save");
        let mut config = WorkoutConfig::default();
        config.calories.age = 41.0;
        config.split_check = SplitCheck::BeforeSample;
        config.location_consent = Some(true);

        config.save_to(&path).unwrap();
        let loaded = WorkoutConfig::load_from(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"source_type":"serial","calories":{"mass_kg":62.5}}"#).unwrap();

        let loaded = WorkoutConfig::load_from(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

        assert_eq!(loaded.source_type, "serial");
        assert_eq!(loaded.calories.mass_kg, 62.5);
        assert_eq!(loaded.calories.age, 23.0);
        assert_eq!(loaded.split_distance_m, 100.0);
    }

    #[test]
    fn test_invalid_split_distance() {
        let config = WorkoutConfig {
            split_distance_m: 0.0,
            ..WorkoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_consent_keeps_other_settings() {
        let path = temp_path("consent");
        let mut config = WorkoutConfig::default();
        config.update_serial("/dev/ttyACM0".to_string(), 38400);
        config.calories.mass_kg = 58.0;
        config.save_to(&path).unwrap();

        WorkoutConfig::store_consent_at(&path, Some(true)).unwrap();
        let loaded = WorkoutConfig::load_from(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

        assert_eq!(loaded.location_consent, Some(true));
        assert_eq!(loaded.serial_port, Some("/dev/ttyACM0".to_string()));
        assert_eq!(loaded.calories.mass_kg, 58.0);
    }

    #[test]
    fn test_store_consent_leaves_broken_file_alone() {
        let path = temp_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let broken = r#"{"source_type":"serial","split_distance_m":"#;
        std::fs::write(&path, broken).unwrap();

        let result = WorkoutConfig::store_consent_at(&path, Some(true));
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

        assert!(result.is_err());
        assert_eq!(contents, broken);
    }

    #[test]
    fn test_store_consent_leaves_invalid_file_alone() {
        let path = temp_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let invalid = r#"{"source_type":"serial","split_distance_m":-5.0}"#;
        std::fs::write(&path, invalid).unwrap();

        let result = WorkoutConfig::store_consent_at(&path, Some(false));
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

        assert!(result.is_err());
        assert_eq!(contents, invalid);
    }
}
