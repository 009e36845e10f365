use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::motion::source::MAX_SIMULATED_RATE_HZ;
use crate::motion::{
    MotionSource, ReplaySource, SensorLocation, SimulatedConfig, SimulatedSource,
};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "HEADMOTION_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "headmotion.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Simulated {
        #[serde(default = "default_rate_hz")]
        rate_hz: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    Replay {
        path: PathBuf,
        #[serde(default = "default_speed")]
        speed: f64,
    },
}

fn default_rate_hz() -> f64 {
    // Headphone motion arrives at roughly 25 Hz.
    25.0
}

fn default_speed() -> f64 {
    1.0
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulated {
            rate_hz: default_rate_hz(),
            seed: None,
        }
    }
}

impl SourceConfig {
    pub fn build(&self) -> Box<dyn MotionSource> {
        match self {
            SourceConfig::Simulated { rate_hz, seed } => {
                Box::new(SimulatedSource::new(SimulatedConfig {
                    rate_hz: *rate_hz,
                    seed: *seed,
                    location: SensorLocation::Left,
                }))
            }
            SourceConfig::Replay { path, speed } => Box::new(ReplaySource::new(path, *speed)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Samples kept per channel.
    pub capacity: usize,
    pub refresh_interval_ms: u64,
    pub source: SourceConfig,
    /// Where captures and exported charts are written.
    pub output_dir: PathBuf,
    pub swipe_threshold: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            refresh_interval_ms: 200,
            source: SourceConfig::default(),
            output_dir: PathBuf::from("."),
            swipe_threshold: crate::motion::selector::DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `$HEADMOTION_CONFIG`, then `./headmotion.json`, then built-in defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.capacity > 0, "capacity must be greater than zero");
        ensure!(
            self.refresh_interval_ms > 0,
            "refresh_interval_ms must be greater than zero"
        );
        ensure!(self.swipe_threshold >= 0.0, "swipe_threshold must not be negative");
        match &self.source {
            SourceConfig::Simulated { rate_hz, .. } => ensure!(
                rate_hz.is_finite() && *rate_hz > 0.0 && *rate_hz <= MAX_SIMULATED_RATE_HZ,
                "rate_hz must be in (0, {MAX_SIMULATED_RATE_HZ}], got {rate_hz}"
            ),
            SourceConfig::Replay { speed, .. } => ensure!(
                speed.is_finite() && *speed > 0.0,
                "replay speed must be a positive number, got {speed}"
            ),
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
