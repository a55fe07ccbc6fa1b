//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `$XDG_CONFIG_HOME/loantree/loantree.toml`, or the file given with `--config`
//! 3. Environment variables: `LOANTREE_*` prefix, `__` between sections
//!    (e.g. `LOANTREE_LAYOUT__DIRECTION=LR`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Direction, IdGenerator, LayeredLayout, RandomIdGenerator, SequentialIdGenerator};

/// How fresh node ids are produced.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    /// Short random hex ids
    #[default]
    Random,
    /// `<prefix>1`, `<prefix>2`, ...
    Sequential,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdSettings {
    pub style: IdStyle,
    /// Length of random ids
    pub length: usize,
    /// Prefix of sequential ids
    pub prefix: String,
}

impl Default for IdSettings {
    fn default() -> Self {
        Self {
            style: IdStyle::Random,
            length: 8,
            prefix: "n".into(),
        }
    }
}

impl IdSettings {
    pub fn generator(&self) -> Box<dyn IdGenerator> {
        match self.style {
            IdStyle::Random => Box::new(RandomIdGenerator::new(self.length)),
            IdStyle::Sequential => Box::new(SequentialIdGenerator::new(self.prefix.clone())),
        }
    }
}

/// Layered layout parameters (pixels).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub direction: Direction,
    pub node_width: f64,
    pub node_height: f64,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let layout = LayeredLayout::default();
        Self {
            direction: Direction::TopBottom,
            node_width: layout.node_width,
            node_height: layout.node_height,
            node_sep: layout.node_sep,
            rank_sep: layout.rank_sep,
            margin_x: layout.margin_x,
            margin_y: layout.margin_y,
        }
    }
}

impl LayoutSettings {
    pub fn to_layout(&self) -> LayeredLayout {
        LayeredLayout {
            node_width: self.node_width,
            node_height: self.node_height,
            node_sep: self.node_sep,
            rank_sep: self.rank_sep,
            margin_x: self.margin_x,
            margin_y: self.margin_y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportSettings {
    /// Two-space indented JSON instead of a single line
    pub pretty: bool,
    /// Add each node's layout position to the export
    pub include_positions: bool,
    /// Default file name is `<file_prefix>-YYYY-MM-DD.json`
    pub file_prefix: String,
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            include_positions: false,
            file_prefix: "loan-tree".into(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Unified configuration for loantree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Node type schema (TOML); the built-in Account/Loan/Collateral schema when unset
    pub schema: Option<PathBuf>,
    pub ids: IdSettings,
    pub layout: LayoutSettings,
    pub export: ExportSettings,
}

/// Get the XDG config directory for loantree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "loantree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("loantree.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; returns the input unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.schema = self
            .schema
            .take()
            .map(|p| PathBuf::from(expand_env_vars(&p.to_string_lossy())));
        let expanded = expand_env_vars(&self.export.output_dir.to_string_lossy());
        self.export.output_dir = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist. When None the global
    ///   XDG file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    builder = builder.add_source(File::from(global_path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("LOANTREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# loantree configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/loantree/loantree.toml (or --config <path>)
#   Env:  LOANTREE_* environment variables, e.g. LOANTREE_LAYOUT__DIRECTION=LR

# Node type schema replacing the built-in Account/Loan/Collateral types
# schema = "~/.config/loantree/types.toml"

[ids]
# "random" (short hex ids) or "sequential" (n1, n2, ...)
# style = "random"
# length = 8
# prefix = "n"

[layout]
# TB, BT, LR or RL
# direction = "TB"
# node_width = 150.0
# node_height = 80.0
# node_sep = 100.0
# rank_sep = 100.0
# margin_x = 50.0
# margin_y = 50.0

[export]
# pretty = true
# include_positions = false
# file_prefix = "loan-tree"
# output_dir = "."
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
