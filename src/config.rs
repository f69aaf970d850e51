use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::cat::wardrobe::{Accessory, Customization, Hat, UnknownVariant};

/// Looked up in the working directory when `PIXELCAT_CONFIG` is unset.
const DEFAULT_PATH: &str = "pixelcat.toml";
const PATH_VAR: &str = "PIXELCAT_CONFIG";
const HAT_VAR: &str = "PIXELCAT_HAT";
const ACCESSORY_VAR: &str = "PIXELCAT_ACCESSORY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {field} in {path}: {reason}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: &'static str,
    },
    #[error("{var}: {source}")]
    UnknownVariant {
        var: &'static str,
        #[source]
        source: UnknownVariant,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Screen pixels per floor unit.
    pub zoom: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pixel Cat".to_string(),
            width: 480,
            height: 360,
            zoom: 1.0,
        }
    }
}

impl WindowConfig {
    /// A non-positive zoom inverts the stage and the cat can no longer be hit.
    fn check(&self) -> Result<(), (&'static str, &'static str)> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(("window.zoom", "must be a finite number above zero"));
        }
        if self.width == 0 {
            return Err(("window.width", "must be at least 1"));
        }
        if self.height == 0 {
            return Err(("window.height", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatConfig {
    pub hat: Hat,
    pub accessory: Accessory,
    /// Shown in the bubble on mount.
    pub greeting: Option<String>,
}

impl CatConfig {
    pub fn outfit(&self) -> Customization {
        Customization {
            hat: self.hat,
            accessory: self.accessory,
        }
    }
}

/// Everything read from `pixelcat.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub window: WindowConfig,
    pub cat: CatConfig,
}

impl CardConfig {
    /// Load from `PIXELCAT_CONFIG` or `./pixelcat.toml`, then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::from_file_or_default(Path::new(DEFAULT_PATH))?,
        };
        config.apply_overrides(env::var(HAT_VAR).ok(), env::var(ACCESSORY_VAR).ok())?;
        Ok(config)
    }

    /// Read a file that must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.window.check().map_err(|(field, reason)| ConfigError::Invalid {
            path: path.to_path_buf(),
            field,
            reason,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Read a file if present, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Apply `PIXELCAT_HAT` / `PIXELCAT_ACCESSORY` style overrides.
    pub fn apply_overrides(
        &mut self,
        hat: Option<String>,
        accessory: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(name) = hat {
            self.cat.hat = name.parse().map_err(|source| ConfigError::UnknownVariant {
                var: HAT_VAR,
                source,
            })?;
        }
        if let Some(name) = accessory {
            self.cat.accessory = name.parse().map_err(|source| ConfigError::UnknownVariant {
                var: ACCESSORY_VAR,
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(text.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [window]
            zoom = 2.0

            [cat]
            hat = "reindeer"
            greeting = "Merry Christmas!"
            "#,
        );
        let config = CardConfig::from_file(file.path()).expect("valid config");
        assert_eq!(config.window.zoom, 2.0);
        assert_eq!(config.window.width, WindowConfig::default().width);
        assert_eq!(config.cat.hat, Hat::Reindeer);
        assert_eq!(config.cat.accessory, Accessory::ScarfGreen);
        assert_eq!(config.cat.greeting.as_deref(), Some("Merry Christmas!"));
    }

    #[test]
    fn missing_default_file_is_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = CardConfig::from_file_or_default(&dir.path().join("pixelcat.toml"))
            .expect("defaults");
        assert_eq!(config, CardConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = CardConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[cat]\nhat = \"top-hat\"\n");
        let err = CardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    fn rejected_field(text: &str) -> &'static str {
        let file = write_config(text);
        match CardConfig::from_file(file.path()) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid-field error, got {other:?}"),
        }
    }

    #[test]
    fn zoom_must_be_positive_and_finite() {
        assert_eq!(rejected_field("[window]\nzoom = 0.0\n"), "window.zoom");
        assert_eq!(rejected_field("[window]\nzoom = -1.0\n"), "window.zoom");
        assert_eq!(rejected_field("[window]\nzoom = nan\n"), "window.zoom");
        assert_eq!(rejected_field("[window]\nzoom = inf\n"), "window.zoom");
    }

    #[test]
    fn window_size_must_be_nonzero() {
        assert_eq!(rejected_field("[window]\nwidth = 0\n"), "window.width");
        assert_eq!(rejected_field("[window]\nheight = 0\n"), "window.height");
    }

    #[test]
    fn default_window_passes_checks() {
        assert!(WindowConfig::default().check().is_ok());
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = CardConfig::default();
        config
            .apply_overrides(Some("none".into()), Some("BELL".into()))
            .expect("known names");
        assert_eq!(
            config.cat.outfit(),
            Customization {
                hat: Hat::None,
                accessory: Accessory::Bell
            }
        );
    }

    #[test]
    fn unknown_override_names_the_variable() {
        let mut config = CardConfig::default();
        let err = config
            .apply_overrides(None, Some("cape".into()))
            .unwrap_err();
        match err {
            ConfigError::UnknownVariant { var, source } => {
                assert_eq!(var, ACCESSORY_VAR);
                assert_eq!(source, UnknownVariant("cape".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(config.cat.accessory, Accessory::ScarfGreen);
    }
}
