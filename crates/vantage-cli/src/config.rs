//! Configuration – reads/writes `~/.vantage/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vantage_runtime::{LogFormat, SceneConfig, TelemetrySettings};

/// Persisted settings stored in `~/.vantage/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Console log layout.
    #[serde(default)]
    pub log_format: LogFormat,

    /// OTLP/HTTP collector base URL. Tracing is console-only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otlp_endpoint: Option<String>,

    /// Fallback grid and per-frame feature options.
    #[serde(default)]
    pub scene: SceneConfig,
}

impl Config {
    pub fn telemetry(&self) -> TelemetrySettings {
        TelemetrySettings {
            log_format: self.log_format,
            otlp_endpoint: self.otlp_endpoint.clone(),
        }
        .with_env_endpoint()
    }
}

/// Return the path to `~/.vantage/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".vantage").join("config.toml")
}

/// Load the config from a specific path. Returns `None` if the file does
/// not exist.
pub fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
    Ok(Some(cfg))
}

/// Load `path` (defaults when absent) and apply environment overrides.
pub fn resolve(path: &Path) -> Result<Config, String> {
    let mut cfg = load_from(path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Apply `VANTAGE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `VANTAGE_PRIMARY_FOV_DEG` | `scene.primary.fov_degrees` |
/// | `VANTAGE_LOG_FORMAT` | `log_format` |
/// | `VANTAGE_OTLP_ENDPOINT` | `otlp_endpoint` |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

/// Same as [`apply_env_overrides`] with an injectable variable lookup.
/// Unparsable values are ignored.
pub(crate) fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("VANTAGE_PRIMARY_FOV_DEG")
        && let Ok(fov) = v.trim().parse::<f64>()
        && fov.is_finite()
    {
        cfg.scene.primary.fov_degrees = Some(fov);
    }
    if let Some(v) = lookup("VANTAGE_LOG_FORMAT")
        && let Ok(format) = v.parse::<LogFormat>()
    {
        cfg.log_format = format;
    }
    if let Some(v) = lookup("VANTAGE_OTLP_ENDPOINT")
        && !v.is_empty()
    {
        cfg.otlp_endpoint = Some(v);
    }
}

/// Save the config to a specific path, creating parent directories.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw = toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, Config::default());
        assert_eq!(loaded.scene.fallback_grid.len(), 16);
        assert!(loaded.scene.secondary.compute_side);
    }

    #[test]
    fn config_path_points_to_vantage_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".vantage"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
log_format = "json"

[scene.primary]
fov_degrees = 75.0

[scene.fallback_grid]
cup = [0.1, 0.0, 0.2]
"#,
        )
        .expect("write");

        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.scene.primary.fov_degrees, Some(75.0));
        assert_eq!(cfg.scene.fallback_grid.len(), 1);
        assert_eq!(cfg.scene.secondary.reachable_default, Some(true));
        assert!(cfg.otlp_endpoint.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_format = [").expect("write");
        let err = load_from(&path).unwrap_err();
        assert!(err.contains("Failed to parse config"));
    }

    #[test]
    fn overrides_change_fov_format_and_endpoint() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            vars(&[
                ("VANTAGE_PRIMARY_FOV_DEG", "60"),
                ("VANTAGE_LOG_FORMAT", "json"),
                ("VANTAGE_OTLP_ENDPOINT", "http://collector:4318"),
            ]),
        );
        assert_eq!(cfg.scene.primary.fov_degrees, Some(60.0));
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.otlp_endpoint.as_deref(), Some("http://collector:4318"));
        assert_eq!(cfg.telemetry().otlp_endpoint.as_deref(), Some("http://collector:4318"));
    }

    #[test]
    fn overrides_ignore_invalid_values() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            vars(&[
                ("VANTAGE_PRIMARY_FOV_DEG", "wide"),
                ("VANTAGE_LOG_FORMAT", "xml"),
                ("VANTAGE_OTLP_ENDPOINT", ""),
            ]),
        );
        assert_eq!(cfg, Config::default());

        apply_overrides(&mut cfg, vars(&[("VANTAGE_PRIMARY_FOV_DEG", "NaN")]));
        assert!(cfg.scene.primary.fov_degrees.is_none());
    }
}
