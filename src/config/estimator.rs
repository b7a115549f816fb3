use crate::config::precision::Precision;
use crate::config::workload::{
    WorkloadSpec, DEFAULT_TARGET_TPS, DEFAULT_TTFT_BUDGET_MS, DEFAULT_UTIL_BANDWIDTH,
    DEFAULT_UTIL_COMPUTE,
};
use serde::{Deserialize, Serialize};

/// Defaults applied to workloads built from the command line or presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorDefaults {
    pub weight_precision: Precision,
    pub kv_precision: Precision,
    pub util_compute: f64,
    pub util_bandwidth: f64,
    pub target_tps: f64,
    pub ttft_budget_ms: f64,
}

impl Default for EstimatorDefaults {
    fn default() -> Self {
        Self {
            weight_precision: Precision::Bf16,
            kv_precision: Precision::Bf16,
            util_compute: DEFAULT_UTIL_COMPUTE,
            util_bandwidth: DEFAULT_UTIL_BANDWIDTH,
            target_tps: DEFAULT_TARGET_TPS,
            ttft_budget_ms: DEFAULT_TTFT_BUDGET_MS,
        }
    }
}

impl EstimatorDefaults {
    /// Workload for `params_b` with these defaults filled in
    pub fn workload(&self, params_b: f64) -> WorkloadSpec {
        WorkloadSpec {
            params_b,
            weight_precision: self.weight_precision,
            kv_precision: self.kv_precision,
            util_compute: self.util_compute,
            util_bandwidth: self.util_bandwidth,
            target_tps: self.target_tps,
            ttft_budget_ms: self.ttft_budget_ms,
            ..Default::default()
        }
    }
}
