//! Settings for graph building, layout and rendering
//!
//! A flat set of named options, loaded from YAML. Every field has a default
//! so a partial file (or no file at all) is valid.

use crate::grammar::{Direction, Syntax};
use crate::layout::LayoutParams;
use crate::model::LabelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Edge color per direction (any CSS color string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionColors {
    pub outgoing: String,
    pub incoming: String,
    pub bidirectional: String,
    pub undirected: String,
}

impl Default for DirectionColors {
    fn default() -> Self {
        Self {
            outgoing: "#4c8bf5".to_string(),
            incoming: "#f5a623".to_string(),
            bidirectional: "#7ed321".to_string(),
            undirected: "#9b9b9b".to_string(),
        }
    }
}

impl DirectionColors {
    pub fn for_direction(&self, direction: Direction) -> &str {
        match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
            Direction::Bidirectional => &self.bidirectional,
            Direction::Undirected => &self.undirected,
        }
    }
}

/// User-facing settings.
///
/// Passed by value into each build; changing settings means building again,
/// layout state is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw arrowheads on directed edges
    pub show_arrows: bool,
    /// Draw edge labels
    pub show_labels: bool,
    /// Only show edges whose label contains this text (case-insensitive)
    pub label_filter: String,
    pub colors: DirectionColors,
    /// Rest length of edges in the layout
    pub link_distance: f64,
    /// Node repulsion in the layout
    pub repulsion_strength: f64,
    /// Declaration forms recognized by the parser
    pub syntax: Syntax,
    /// Quiet period before a modified document is reindexed
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let layout = LayoutParams::default();
        Self {
            show_arrows: true,
            show_labels: true,
            label_filter: String::new(),
            colors: DirectionColors::default(),
            link_distance: layout.link_distance,
            repulsion_strength: layout.repulsion_strength,
            syntax: Syntax::default(),
            debounce_ms: 300,
        }
    }
}

impl Settings {
    /// Default settings file: `<config dir>/relgraph/settings.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("relgraph").join("settings.yaml"))
    }

    /// Parse settings from YAML text and validate them
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let settings: Settings = serde_yaml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml(&text)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.exists() => Self::load(default),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values the layout cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.link_distance.is_finite() && self.link_distance > 0.0) {
            warn!(value = self.link_distance, "rejected link_distance");
            return Err(ConfigError::Invalid {
                field: "link_distance",
                reason: format!("must be a positive number, got {}", self.link_distance),
            });
        }
        if !(self.repulsion_strength.is_finite() && self.repulsion_strength >= 0.0) {
            warn!(value = self.repulsion_strength, "rejected repulsion_strength");
            return Err(ConfigError::Invalid {
                field: "repulsion_strength",
                reason: format!("must be zero or positive, got {}", self.repulsion_strength),
            });
        }
        Ok(())
    }

    pub fn label_filter(&self) -> LabelFilter {
        LabelFilter::new(&self.label_filter)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Layout parameters with the user-tunable fields applied
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            link_distance: self.link_distance,
            repulsion_strength: self.repulsion_strength,
            ..LayoutParams::default()
        }
    }
}
