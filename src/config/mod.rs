pub mod estimator;
pub mod matcher;
pub mod model;
pub mod precision;
pub mod workload;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use estimator::EstimatorDefaults;
pub use matcher::MatcherConfig;
pub use model::{group_by_hardware_tier, ModelPreset, ModelTiers, MoeConfig, AVAILABLE_MODELS};
pub use precision::{Precision, PrecisionParseError};
pub use workload::{WorkloadError, WorkloadSpec};

/// Top-level settings for sizing runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub estimator: EstimatorDefaults,
    pub matcher: MatcherConfig,
}

impl Config {
    /// Read a JSON config file; missing sections take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn to_dict(&self) -> Result<HashMap<String, serde_json::Value>> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }

    pub fn from_dict(data: HashMap<String, serde_json::Value>) -> Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(serde_json::from_str(&json)?)
    }
}
