//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.safevoice/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::navigator::DEFAULT_REVERT_DELAY;
use crate::core::places::{Place, PlaceDirectory, Position};
use crate::device::Tone;
use crate::device::narrator::DEFAULT_NARRATION_TIMEOUT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SafeVoiceConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub narration: NarrationConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub revert_delay_ms: Option<u64>,
    pub menu_file: Option<String>,
    pub dial_code: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AudioConfig {
    pub enabled: Option<bool>,
    pub frequency_hz: Option<u32>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NarrationConfig {
    pub enabled: Option<bool>,
    pub command: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Replaces the built-in help-location directory when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub places: Vec<Place>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DIAL_CODE: &str = "*384*SOS#";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub revert_delay: Duration,
    /// Custom menu file; `None` runs the built-in menu.
    pub menu_file: Option<PathBuf>,
    pub dial_code: String,
    pub tone_enabled: bool,
    pub tone: Tone,
    pub narration_enabled: bool,
    /// External TTS command line; `None` narrates to the log only.
    pub narration_command: Option<String>,
    /// How long a TTS process may run before it is killed.
    pub narration_timeout: Duration,
    /// Fixed caller position; `None` falls back to the default position.
    pub position: Option<Position>,
    pub places: PlaceDirectory,
}

/// Values taken from CLI flags (None / false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub menu_file: Option<PathBuf>,
    pub revert_delay_ms: Option<u64>,
    pub mute: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.safevoice`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".safevoice"))
}

/// Returns the path to `~/.safevoice/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.safevoice/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SafeVoiceConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SafeVoiceConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SafeVoiceConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SafeVoiceConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<SafeVoiceConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SafeVoiceConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# SafeVoice Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# revert_delay_ms = 3000             # How long action responses stay on screen
# menu_file = "menu.toml"            # Custom menu, relative to ~/.safevoice/
# dial_code = "*384*SOS#"

# [audio]
# enabled = true                     # Key-press tone (terminal bell)
# frequency_hz = 400
# duration_ms = 100

# [narration]
# enabled = true
# command = "espeak -s 140"          # Text-to-speech program; omit to log only
# timeout_secs = 15                  # Kill the program after this long

# [location]
# latitude = -33.9249                # Fixed caller position
# longitude = 18.4241
#
# [[location.places]]                # Replaces the built-in help locations
# name = "Cape Town Central Police Station"
# kind = "police"                    # police, hospital, safe_house, counseling, legal_aid
# position = { latitude = -33.9212, longitude = 18.4193 }
# phone = "+27214007000"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SafeVoiceConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

pub(crate) fn resolve_with_env(
    config: &SafeVoiceConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Revert delay: CLI → env → config → default
    let revert_delay = cli
        .revert_delay_ms
        .or_else(|| env("SAFEVOICE_REVERT_DELAY_MS").and_then(|v| v.parse().ok()))
        .or(config.general.revert_delay_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_REVERT_DELAY);

    // Menu file: CLI (as given) → env / config (relative to ~/.safevoice/)
    let menu_file = cli.menu_file.clone().or_else(|| {
        env("SAFEVOICE_MENU_FILE")
            .or_else(|| config.general.menu_file.clone())
            .map(|file| relative_to_config_dir(&file))
    });

    // Narration command: env → config
    let narration_command = env("SAFEVOICE_NARRATION_COMMAND")
        .or_else(|| config.narration.command.clone())
        .filter(|cmd| !cmd.trim().is_empty());

    let defaults = Tone::default();
    let tone = Tone {
        frequency_hz: config.audio.frequency_hz.unwrap_or(defaults.frequency_hz),
        duration_ms: config.audio.duration_ms.unwrap_or(defaults.duration_ms),
    };

    let position = match (config.location.latitude, config.location.longitude) {
        (Some(latitude), Some(longitude)) => Some(Position::new(latitude, longitude)),
        (None, None) => None,
        _ => {
            warn!("Ignoring [location]: both latitude and longitude are required");
            None
        }
    };

    let places = if config.location.places.is_empty() {
        PlaceDirectory::builtin()
    } else {
        info!("Using {} configured help locations", config.location.places.len());
        PlaceDirectory::new(config.location.places.clone())
    };

    ResolvedConfig {
        revert_delay,
        menu_file,
        dial_code: config
            .general
            .dial_code
            .clone()
            .unwrap_or_else(|| DEFAULT_DIAL_CODE.to_string()),
        tone_enabled: !cli.mute && config.audio.enabled.unwrap_or(true),
        tone,
        narration_enabled: !cli.mute && config.narration.enabled.unwrap_or(true),
        narration_command,
        narration_timeout: config
            .narration
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_NARRATION_TIMEOUT),
        position,
        places,
    }
}

/// Paths in the config file are relative to `~/.safevoice/` unless absolute.
fn relative_to_config_dir(file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    match config_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::places::PlaceKind;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = SafeVoiceConfig::default();
        assert!(config.general.menu_file.is_none());
        assert!(config.narration.command.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&SafeVoiceConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.revert_delay, Duration::from_millis(3000));
        assert!(resolved.menu_file.is_none());
        assert_eq!(resolved.dial_code, DEFAULT_DIAL_CODE);
        assert!(resolved.tone_enabled);
        assert!(resolved.narration_enabled);
        assert_eq!(resolved.tone, Tone::default());
        assert!(resolved.narration_command.is_none());
        assert_eq!(resolved.narration_timeout, DEFAULT_NARRATION_TIMEOUT);
        assert!(resolved.position.is_none());
        assert!(resolved.places.nearest(&Position::new(-33.9249, 18.4241), PlaceKind::Police).is_some());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = SafeVoiceConfig {
            general: GeneralConfig {
                revert_delay_ms: Some(1500),
                menu_file: Some("/etc/safevoice/menu.toml".to_string()),
                dial_code: Some("*120*7233#".to_string()),
            },
            audio: AudioConfig {
                enabled: Some(false),
                frequency_hz: Some(880),
                duration_ms: Some(50),
            },
            narration: NarrationConfig {
                enabled: Some(true),
                command: Some("espeak".to_string()),
                timeout_secs: Some(5),
            },
            location: LocationConfig {
                latitude: Some(-26.2041),
                longitude: Some(28.0473),
                places: Vec::new(),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.revert_delay, Duration::from_millis(1500));
        assert_eq!(
            resolved.menu_file.as_deref(),
            Some(Path::new("/etc/safevoice/menu.toml"))
        );
        assert_eq!(resolved.dial_code, "*120*7233#");
        assert!(!resolved.tone_enabled);
        assert_eq!(resolved.tone.frequency_hz, 880);
        assert_eq!(resolved.narration_command.as_deref(), Some("espeak"));
        assert_eq!(resolved.narration_timeout, Duration::from_secs(5));
        assert_eq!(resolved.position, Some(Position::new(-26.2041, 28.0473)));
    }

    #[test]
    fn test_env_overrides_config() {
        let config = SafeVoiceConfig {
            general: GeneralConfig {
                revert_delay_ms: Some(1500),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "SAFEVOICE_REVERT_DELAY_MS" => Some("250".to_string()),
            "SAFEVOICE_NARRATION_COMMAND" => Some("say".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.revert_delay, Duration::from_millis(250));
        assert_eq!(resolved.narration_command.as_deref(), Some("say"));
    }

    #[test]
    fn test_unparseable_env_delay_falls_through() {
        let env = |key: &str| (key == "SAFEVOICE_REVERT_DELAY_MS").then(|| "soon".to_string());
        let resolved = resolve_with_env(&SafeVoiceConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.revert_delay, DEFAULT_REVERT_DELAY);
    }

    #[test]
    fn test_cli_wins() {
        let config = SafeVoiceConfig {
            general: GeneralConfig {
                revert_delay_ms: Some(1500),
                menu_file: Some("menu.toml".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            menu_file: Some(PathBuf::from("custom.toml")),
            revert_delay_ms: Some(10),
            mute: true,
        };
        let env = |_: &str| Some("999".to_string());
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.revert_delay, Duration::from_millis(10));
        assert_eq!(resolved.menu_file.as_deref(), Some(Path::new("custom.toml")));
        assert!(!resolved.tone_enabled);
        assert!(!resolved.narration_enabled);
    }

    #[test]
    fn test_half_a_position_is_ignored() {
        let config = SafeVoiceConfig {
            location: LocationConfig {
                latitude: Some(-33.9),
                longitude: None,
                places: Vec::new(),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(resolved.position.is_none());
    }

    #[test]
    fn test_blank_narration_command_is_none() {
        let config = SafeVoiceConfig {
            narration: NarrationConfig {
                enabled: None,
                command: Some("  ".to_string()),
                timeout_secs: None,
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(resolved.narration_command.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
revert_delay_ms = 2000

[narration]
command = "espeak -s 140"
"#;
        let config: SafeVoiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.revert_delay_ms, Some(2000));
        assert!(config.general.menu_file.is_none());
        assert_eq!(config.narration.command.as_deref(), Some("espeak -s 140"));
        assert!(config.audio.enabled.is_none());
    }

    #[test]
    fn test_configured_places_replace_builtin_directory() {
        let toml_str = r#"
[[location.places]]
name = "Durban Central Police"
kind = "police"
position = { latitude = -29.8587, longitude = 31.0218 }
phone = "+27313254000"
"#;
        let config: SafeVoiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.location.places.len(), 1);
        assert_eq!(config.location.places[0].kind, PlaceKind::Police);

        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        let from = Position::new(-33.9249, 18.4241);
        let police = resolved.places.nearest(&from, PlaceKind::Police).unwrap();
        assert_eq!(police.place.name, "Durban Central Police");
        assert!(resolved.places.nearest(&from, PlaceKind::Hospital).is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "safevoice-config-{}.toml",
            uuid::Uuid::new_v4()
        ));
        fs::write(&path, "[general\nrevert_delay_ms = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = fs::remove_file(&path);
    }
}
