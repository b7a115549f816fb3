use crate::hardware::cost::HOURS_PER_MONTH;
use crate::hardware::matcher::DEFAULT_MAX_DEVICES;
use serde::{Deserialize, Serialize};

/// Hardware recommendation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Single- and multi-device results kept before grouping
    pub top_n: usize,
    /// Entries kept per market segment
    pub per_category: usize,
    /// Multi-device entries appended to the combined list
    pub multi_in_all: usize,
    pub max_devices: u32,
    pub hours_per_month: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            per_category: 3,
            multi_in_all: 2,
            max_devices: DEFAULT_MAX_DEVICES,
            hours_per_month: HOURS_PER_MONTH,
        }
    }
}
