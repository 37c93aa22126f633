//! Scene configuration loaded from JSON.

use crate::eraser::EraserSettings;
use crate::tools::{HighlighterSettings, PenSettings, SelectorSettings, TextSettings};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "INKMARK_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "inkmark.json";
/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "inkmark_shapes";

/// Root configuration of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub viewport: ViewportConfig,
    pub selector: SelectorSettings,
    pub eraser: EraserSettings,
    pub pen: PenSettings,
    pub highlighter: HighlighterSettings,
    pub text: TextSettings,
    /// Maximum undo depth; unbounded when absent.
    pub history_limit: Option<usize>,
    /// Key the scene is persisted under.
    pub storage_key: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            selector: SelectorSettings::default(),
            eraser: EraserSettings::default(),
            pen: PenSettings::default(),
            highlighter: HighlighterSettings::default(),
            text: TextSettings::default(),
            history_limit: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Zoom bounds and grid unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Grid spacing at scale 1, in scene units.
    pub base_step: f64,
    /// Scale multiplier per wheel notch.
    pub zoom_factor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 2.0,
            base_step: 40.0,
            zoom_factor: 1.1,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.min_scale, self.max_scale, self.base_step)
    }
}

impl SceneConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Find a config: the file named by `INKMARK_CONFIG`, else `./inkmark.json`.
    /// Returns defaults when neither exists.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
            .map_err(|source| ConfigError::Context {
                message: "Failed to read the current directory".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject settings the viewport and tools cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.viewport;
        if v.min_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport.min_scale must be positive, got {}",
                v.min_scale
            )));
        }
        if v.min_scale > v.max_scale {
            return Err(ConfigError::Invalid(format!(
                "viewport.min_scale ({}) exceeds viewport.max_scale ({})",
                v.min_scale, v.max_scale
            )));
        }
        if v.base_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport.base_step must be positive, got {}",
                v.base_step
            )));
        }
        if v.zoom_factor <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport.zoom_factor must be greater than 1, got {}",
                v.zoom_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        /// `None` when parsing an in-memory string.
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eraser::EraseMode;
    use crate::shapes::{HorizontalAlign, SerializableColor, ShapeKind, StrokeKind};
    use std::io::Write;

    #[test]
    fn defaults_match_the_canvas() {
        let cfg = SceneConfig::default();
        assert!((cfg.viewport.min_scale - 0.1).abs() < f64::EPSILON);
        assert!((cfg.viewport.max_scale - 2.0).abs() < f64::EPSILON);
        assert!((cfg.viewport.base_step - 40.0).abs() < f64::EPSILON);
        assert!((cfg.eraser.size_px - 20.0).abs() < f64::EPSILON);
        assert_eq!(cfg.eraser.mode, EraseMode::Fragment);
        assert_eq!(cfg.pen.color, SerializableColor::black());
        assert_eq!(cfg.highlighter.color, SerializableColor::yellow());
        assert!(cfg.history_limit.is_none());
        assert_eq!(cfg.storage_key, "inkmark_shapes");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = SceneConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = SceneConfig::from_json(
            r##"{
                "viewport": { "max_scale": 4.0 },
                "pen": { "color": "#ff0000", "kind": "brush" },
                "eraser": { "mode": "whole", "kinds": ["pen"] },
                "text": { "align": "center" },
                "history_limit": 100
            }"##,
        )
        .unwrap();
        assert!((cfg.viewport.max_scale - 4.0).abs() < f64::EPSILON);
        assert!((cfg.viewport.min_scale - 0.1).abs() < f64::EPSILON);
        assert_eq!(cfg.pen.color, SerializableColor::new(255, 0, 0, 255));
        assert_eq!(cfg.pen.kind, StrokeKind::Brush);
        assert!((cfg.pen.size - 4.0).abs() < f64::EPSILON);
        assert_eq!(cfg.eraser.mode, EraseMode::Whole);
        assert!(cfg.eraser.kinds.contains(ShapeKind::Pen));
        assert!(!cfg.eraser.kinds.contains(ShapeKind::Brush));
        assert_eq!(cfg.text.align, HorizontalAlign::Center);
        assert_eq!(cfg.history_limit, Some(100));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for json in [
            r#"{"viewport":{"min_scale":0}}"#,
            r#"{"viewport":{"min_scale":3,"max_scale":2}}"#,
            r#"{"viewport":{"base_step":-1}}"#,
            r#"{"viewport":{"zoom_factor":1.0}}"#,
        ] {
            assert!(
                matches!(SceneConfig::from_json(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(
            SceneConfig::from_json(r#"{"pen":{"color":"blue"}}"#),
            Err(ConfigError::Parse { path: None, .. })
        ));
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r##"{{ "selector": {{ "hit_tolerance_px": 8 }}, "storage_key": "board" }}"##
        )
        .expect("write config");

        let cfg = SceneConfig::from_file(file.path()).expect("load config");
        assert!((cfg.selector.hit_tolerance_px - 8.0).abs() < f64::EPSILON);
        assert_eq!(cfg.storage_key, "board");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
