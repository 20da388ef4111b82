//! Configuration for the demo front-end.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use blk66_core::DicCounter;
use blk66_core::sample::{MAX_FRAME_LEN, MIN_FRAME_LEN};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// DIC settings.
    pub dic: DicConfig,
    /// Random frame stream settings.
    pub simulation: SimulationConfig,
    /// Walkthrough playback.
    pub animation: AnimationConfig,
    /// Output settings.
    pub display: DisplayConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// DIC settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DicConfig {
    /// Nominal IPG in bytes supplied by the MAC.
    pub nominal_gap: u32,
}

/// Random frame stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to generate.
    pub frames: usize,
    /// Shortest frame length in bytes.
    pub min_length: u64,
    /// Longest frame length in bytes.
    pub max_length: u64,
    /// RNG seed; 0 picks a fresh one per run.
    pub seed: u64,
}

/// Walkthrough playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Milliseconds between automatic steps at speed 1.0.
    pub interval_ms: u64,
    /// Initial speed multiplier.
    pub speed: f64,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colour block bytes by role.
    pub color: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for DicConfig {
    fn default() -> Self {
        Self {
            nominal_gap: blk66_core::DEFAULT_NOMINAL_GAP,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 16,
            min_length: MIN_FRAME_LEN,
            max_length: MAX_FRAME_LEN,
            seed: 0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            speed: 1.0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

/// Why [`DemoConfig::load`] fell back to defaults.
///
/// `load` runs before the tracing subscriber exists, so the caller logs
/// this once logging is up.
#[derive(Debug)]
pub enum ConfigFallback {
    /// The file could not be read.
    Missing(std::io::Error),
    /// The file was read but is not valid TOML for [`DemoConfig`].
    Invalid(toml::de::Error),
}

impl ConfigFallback {
    /// Emit the fallback notice for `path`.
    pub fn log(&self, path: &Path) {
        match self {
            ConfigFallback::Missing(e) => {
                tracing::info!("no config at {} ({e}); using defaults", path.display())
            }
            ConfigFallback::Invalid(e) => {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display())
            }
        }
    }
}

impl DemoConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> (Self, Option<ConfigFallback>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(ConfigFallback::Invalid(e))),
            },
            Err(e) => (Self::default(), Some(ConfigFallback::Missing(e))),
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Default configuration as pretty TOML.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// Fresh DIC register using the configured nominal gap.
    pub fn dic_counter(&self) -> DicCounter {
        DicCounter::new(self.dic.nominal_gap)
    }

    /// Playback interval at speed 1.0, never below one millisecond.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.animation.interval_ms.max(1))
    }

    /// Seed to use for this run: the configured one, or `None` for entropy.
    pub fn seed(&self) -> Option<u64> {
        (self.simulation.seed != 0).then_some(self.simulation.seed)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = DemoConfig::default_toml().unwrap();
        assert!(text.contains("nominal_gap"));
        assert!(text.contains("interval_ms"));
    }

    #[test]
    fn roundtrip_config() {
        let text = toml::to_string_pretty(&DemoConfig::default()).unwrap();
        let parsed = DemoConfig::parse(&text).unwrap();
        assert_eq!(parsed.dic.nominal_gap, 12);
        assert_eq!(parsed.simulation.max_length, 1518);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let parsed = DemoConfig::parse("[dic]\nnominal_gap = 5\n").unwrap();
        assert_eq!(parsed.dic.nominal_gap, 5);
        assert_eq!(parsed.simulation.frames, 16);
        assert!(parsed.display.color);
    }

    fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("blk66-{name}-{}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn invalid_file_falls_back() {
        let path = temp_config("bad", "dic = [not valid");
        let (cfg, fallback) = DemoConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.dic.nominal_gap, 12);
        assert!(matches!(fallback, Some(ConfigFallback::Invalid(_))));
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("blk66-does-not-exist/blk66.toml");
        let (cfg, fallback) = DemoConfig::load(&path);
        assert_eq!(cfg.simulation.frames, 16);
        assert!(matches!(fallback, Some(ConfigFallback::Missing(_))));
    }

    #[test]
    fn valid_file_loads_without_fallback() {
        let path = temp_config("good", "[dic]\nnominal_gap = 8\n");
        let (cfg, fallback) = DemoConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.dic.nominal_gap, 8);
        assert!(fallback.is_none());
    }

    #[test]
    fn default_toml_parses_back() {
        let text = DemoConfig::default_toml().unwrap();
        let parsed = DemoConfig::parse(&text).unwrap();
        assert_eq!(parsed.animation.interval_ms, 1000);
        assert_eq!(parsed.animation.speed, 1.0);
    }

    #[test]
    fn seed_zero_means_entropy() {
        let mut cfg = DemoConfig::default();
        assert_eq!(cfg.seed(), None);
        cfg.simulation.seed = 9;
        assert_eq!(cfg.seed(), Some(9));
    }

    #[test]
    fn interval_never_zero() {
        let mut cfg = DemoConfig::default();
        cfg.animation.interval_ms = 0;
        assert_eq!(cfg.interval(), Duration::from_millis(1));
    }
}
