//! Configuration file for the meter tile
//!
//! Plain `key=value` lines, `#` comments. Unknown keys are ignored so older
//! binaries can read newer files.

use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crossbeam_channel::{bounded, Receiver, TrySendError};
use hio_meter::{
    MeterConfig, MeterError, PollTask, DEFAULT_DECAY_INTERVAL, DEFAULT_FPS, DEFAULT_PEAK_DECAY_DB,
    DEFAULT_SPRING_FACTOR,
};
use hio_tui::{ThemeError, ThemeKind};
use thiserror::Error;

/// How often the config file is checked for edits
pub const WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    Meter(#[from] MeterError),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub theme: ThemeKind,
    /// Zone volume (0.0-1.0)
    pub volume: f32,
    pub spring_factor: f32,
    pub peak_decay_db: f32,
    pub fps: u32,
    pub decay_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeKind::default(),
            volume: 0.5,
            spring_factor: DEFAULT_SPRING_FACTOR,
            peak_decay_db: DEFAULT_PEAK_DECAY_DB,
            fps: DEFAULT_FPS,
            decay_interval_ms: DEFAULT_DECAY_INTERVAL.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load config from the default location.
    ///
    /// Writes a default file when none exists. Falls back to defaults if the
    /// file can't be read or parsed.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            let config = Self::default();
            match config.save_to(&path) {
                Ok(()) => tracing::info!(path = %path.display(), "default configuration created"),
                Err(err) => tracing::warn!(path = %path.display(), %err, "could not write default configuration"),
            }
            return config;
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration loaded");
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "bad configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hio")
            .join("config.txt")
    }

    /// Meter tuning derived from this config
    pub fn meter_config(&self) -> MeterConfig {
        MeterConfig::default()
            .with_spring_factor(self.spring_factor)
            .with_peak_decay(self.peak_decay_db)
            .with_fps(self.fps)
            .with_decay_interval(Duration::from_millis(self.decay_interval_ms))
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "theme" => config.theme = value.parse()?,
                "volume" => {
                    let volume: f32 = parse_value(key, value)?;
                    if !volume.is_finite() {
                        return Err(ConfigError::InvalidValue {
                            key: key.into(),
                            value: value.into(),
                        });
                    }
                    config.volume = volume.clamp(0.0, 1.0);
                }
                "spring_factor" => config.spring_factor = parse_value(key, value)?,
                "peak_decay_db" => config.peak_decay_db = parse_value(key, value)?,
                "fps" => config.fps = parse_value(key, value)?,
                "decay_interval_ms" => config.decay_interval_ms = parse_value(key, value)?,
                _ => {} // Ignore unknown keys
            }
        }

        if config.fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fps".into(),
                value: "0".into(),
            });
        }
        config.meter_config().validate()?;
        Ok(config)
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        [
            "# Home-IO meter configuration".to_string(),
            "# theme: green | amber | cyberpunk".to_string(),
            format!("theme={}", self.theme.name()),
            format!("volume={}", self.volume),
            format!("spring_factor={}", self.spring_factor),
            format!("peak_decay_db={}", self.peak_decay_db),
            format!("fps={}", self.fps),
            format!("decay_interval_ms={}", self.decay_interval_ms),
        ]
        .join("\n")
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Poll `path` for edits and send every successfully parsed new version.
///
/// The returned task owns the polling thread; drop it to stop watching.
pub fn watch(path: PathBuf, interval: Duration) -> Result<(PollTask, Receiver<Config>), MeterError> {
    let (tx, rx) = bounded(4);
    let mut last_seen = modified_at(&path);

    let task = PollTask::spawn("config", interval, move || {
        let modified = modified_at(&path);
        if modified.is_none() || modified == last_seen {
            return ControlFlow::Continue(());
        }
        last_seen = modified;

        match Config::load_from(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration reloaded");
                match tx.try_send(config) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => tracing::debug!("config update dropped, receiver busy"),
                    // Receiver gone means the app is shutting down
                    Err(TrySendError::Disconnected(_)) => return ControlFlow::Break(()),
                }
            }
            Err(err) => tracing::warn!(path = %path.display(), %err, "ignoring bad configuration edit"),
        }
        ControlFlow::Continue(())
    })?;

    Ok((task, rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_with_comments_and_unknown_keys() {
        let content = "# Comment\ntheme=amber\nvolume=0.25\nshow_clock=yes\n# trailing";
        let config = Config::parse(content).unwrap();
        assert_eq!(config.theme, ThemeKind::Amber);
        assert_eq!(config.volume, 0.25);
        assert_eq!(config.spring_factor, DEFAULT_SPRING_FACTOR);
    }

    #[test]
    fn test_volume_is_clamped() {
        let config = Config::parse("volume=7").unwrap();
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_bad_number_reported() {
        let err = Config::parse("fps=sixty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "fps"));
    }

    #[test]
    fn test_bad_theme_reported() {
        assert!(matches!(
            Config::parse("theme=plaid"),
            Err(ConfigError::Theme(ThemeError::Unknown(_)))
        ));
    }

    #[test]
    fn test_out_of_range_meter_tuning_rejected() {
        assert!(matches!(
            Config::parse("spring_factor=1.5"),
            Err(ConfigError::Meter(MeterError::InvalidSpringFactor(_)))
        ));
        assert!(matches!(
            Config::parse("decay_interval_ms=0"),
            Err(ConfigError::Meter(MeterError::ZeroInterval(_)))
        ));
        assert!(Config::parse("fps=0").is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config {
            theme: ThemeKind::Cyberpunk,
            volume: 0.8,
            spring_factor: 0.2,
            peak_decay_db: 1.5,
            fps: 30,
            decay_interval_ms: 500,
        };
        let parsed = Config::parse(&config.serialize()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_meter_config_mapping() {
        let config = Config {
            fps: 50,
            decay_interval_ms: 250,
            ..Config::default()
        };
        let meter = config.meter_config();
        assert_eq!(meter.frame_interval, Duration::from_millis(20));
        assert_eq!(meter.decay_interval, Duration::from_millis(250));
        assert_eq!(meter.spring_factor, DEFAULT_SPRING_FACTOR);
    }

    #[test]
    fn test_nan_volume_rejected() {
        assert!(Config::parse("volume=NaN").is_err());
    }

    #[test]
    fn test_watch_picks_up_new_file() {
        let dir = std::env::temp_dir().join(format!("hio-watch-test-{}", std::process::id()));
        let path = dir.join("config.txt");
        let _ = fs::remove_dir_all(&dir);

        let (_task, rx) = watch(path.clone(), Duration::from_millis(5)).unwrap();
        let config = Config {
            theme: ThemeKind::Cyberpunk,
            volume: 0.1,
            ..Config::default()
        };
        // Write aside and rename so the watcher never sees a half-written file
        let staged = dir.join("config.txt.new");
        config.save_to(&staged).unwrap();
        fs::rename(&staged, &path).unwrap();

        let seen = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(seen, config);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("hio-config-test-{}", std::process::id()));
        let path = dir.join("config.txt");
        let config = Config {
            theme: ThemeKind::Amber,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        let _ = fs::remove_dir_all(&dir);
    }
}
