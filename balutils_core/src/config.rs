use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_SHAPE_PATH;
use crate::error::{CatalogError, Result};

/// Everything needed to build a joined shape + detection catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinOptions {
    pub shape_source: PathBuf,
    pub detection_source: PathBuf,
    #[serde(default)]
    pub shape_columns: Option<Vec<String>>,
    #[serde(default)]
    pub detection_columns: Option<Vec<String>>,
    #[serde(default = "default_shape_path")]
    pub shape_path: String,
    /// One of `default`, `mof_only`, `sof_only`; checked when the catalog is built
    #[serde(default = "default_match_type")]
    pub match_type: String,
    /// Keep the two pre-join tables alongside the joined one
    #[serde(default)]
    pub save_all: bool,
}

fn default_shape_path() -> String {
    DEFAULT_SHAPE_PATH.to_string()
}

fn default_match_type() -> String {
    "default".to_string()
}

impl JoinOptions {
    pub fn new(shape_source: impl Into<PathBuf>, detection_source: impl Into<PathBuf>) -> Self {
        Self {
            shape_source: shape_source.into(),
            detection_source: detection_source.into(),
            shape_columns: None,
            detection_columns: None,
            shape_path: default_shape_path(),
            match_type: default_match_type(),
            save_all: false,
        }
    }

    pub fn with_shape_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shape_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_detection_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detection_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_shape_path(mut self, shape_path: impl Into<String>) -> Self {
        self.shape_path = shape_path.into();
        self
    }

    pub fn with_match_type(mut self, match_type: impl Into<String>) -> Self {
        self.match_type = match_type.into();
        self
    }

    pub fn with_save_all(mut self, save_all: bool) -> Self {
        self.save_all = save_all;
        self
    }

    /// Loads options from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::Config(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(CatalogError::Config(format!(
                "config file '{}' is empty",
                path.display()
            )));
        }
        serde_json::from_str(&content)
            .map_err(|e| CatalogError::Config(format!("malformed config JSON: {e}")))
    }
}
