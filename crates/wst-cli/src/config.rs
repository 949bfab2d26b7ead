use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wst_atoms::{AggregatePolicy, DEFAULT_SEPARATOR};
use wst_merge::MergeOptions;
use wst_query::ScalarRetention;
use wst_types::DEFAULT_MAX_DEPTH;

pub const CONFIG_FILE_NAME: &str = "wst.toml";

/// Settings read from `wst.toml`. Command-line flags take precedence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WstConfig {
    pub separator: String,
    pub max_depth: usize,
    pub policy: AggregatePolicy,
    pub scalar_retention: ScalarRetention,
    pub merge: MergeDefaults,
}

impl Default for WstConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            policy: AggregatePolicy::default(),
            scalar_retention: ScalarRetention::default(),
            merge: MergeDefaults::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeDefaults {
    pub update_conflicts: bool,
    pub lists_add: bool,
    pub list_replace: bool,
}

impl Default for MergeDefaults {
    fn default() -> Self {
        let options = MergeOptions::default();
        Self {
            update_conflicts: options.update_conflicts,
            lists_add: options.lists_add,
            list_replace: options.list_replace,
        }
    }
}

impl WstConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `explicit` if given, else `wst.toml` in `dir` if it exists, else
    /// the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            Self::load(&local)
        } else {
            Ok(Self::default())
        }
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            update_conflicts: self.merge.update_conflicts,
            lists_add: self.merge.lists_add,
            list_replace: self.merge.list_replace,
            max_depth: self.max_depth,
        }
    }
}
