use crate::config::precision::Precision;
use crate::hardware::profiles::AcceleratorSpec;
use crate::model::shape::ShapeHints;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_UTIL_COMPUTE: f64 = 0.4;
pub const DEFAULT_UTIL_BANDWIDTH: f64 = 0.6;
pub const DEFAULT_TTFT_BUDGET_MS: f64 = 1000.0;
pub const DEFAULT_TARGET_TPS: f64 = 1.0;

#[derive(Error, Debug, PartialEq)]
pub enum WorkloadError {
    #[error("params_b must be a positive finite number, got {0}")]
    InvalidParams(f64),

    #[error("active_params_b must be in (0, params_b = {params_b}], got {active}")]
    InvalidActiveParams { active: f64, params_b: f64 },

    #[error("batch_size must be at least 1")]
    ZeroBatch,

    #[error("{name} utilization must be in (0, 1], got {value}")]
    InvalidUtilization { name: &'static str, value: f64 },

    #[error("target_tps must be a non-negative finite number, got {0}")]
    InvalidTargetTps(f64),

    #[error("ttft_budget_ms must be a non-negative finite number, got {0}")]
    InvalidTtftBudget(f64),
}

/// Description of an inference workload to size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadSpec {
    /// Total parameters in billions
    pub params_b: f64,
    /// Parameters activated per token (MoE); defaults to `params_b`
    pub active_params_b: Option<f64>,
    pub weight_precision: Precision,
    pub kv_precision: Precision,
    pub layers: Option<u32>,
    pub hidden_size: Option<u32>,
    pub heads: Option<u32>,
    pub prompt_tokens: u64,
    pub new_tokens: u64,
    pub batch_size: u32,
    /// Output tokens/second wanted per stream
    pub target_tps: f64,
    pub ttft_budget_ms: f64,
    pub util_compute: f64,
    pub util_bandwidth: f64,
    pub peak_tflops: Option<f64>,
    pub peak_tops: Option<f64>,
    pub mem_bandwidth_gbps: Option<f64>,
    pub total_vram_available_gb: Option<f64>,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            params_b: 0.0,
            active_params_b: None,
            weight_precision: Precision::Bf16,
            kv_precision: Precision::Bf16,
            layers: None,
            hidden_size: None,
            heads: None,
            prompt_tokens: 0,
            new_tokens: 0,
            batch_size: 1,
            target_tps: DEFAULT_TARGET_TPS,
            ttft_budget_ms: DEFAULT_TTFT_BUDGET_MS,
            util_compute: DEFAULT_UTIL_COMPUTE,
            util_bandwidth: DEFAULT_UTIL_BANDWIDTH,
            peak_tflops: None,
            peak_tops: None,
            mem_bandwidth_gbps: None,
            total_vram_available_gb: None,
        }
    }
}

/// Treat missing, non-finite and non-positive hardware figures as unknown
pub(crate) fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl WorkloadSpec {
    pub fn new(params_b: f64) -> Self {
        Self {
            params_b,
            ..Default::default()
        }
    }

    pub fn with_active_params(mut self, active_params_b: f64) -> Self {
        self.active_params_b = Some(active_params_b);
        self
    }

    pub fn with_precision(mut self, weights: Precision, kv: Precision) -> Self {
        self.weight_precision = weights;
        self.kv_precision = kv;
        self
    }

    pub fn with_shape(mut self, layers: u32, hidden_size: u32, heads: u32) -> Self {
        self.layers = Some(layers);
        self.hidden_size = Some(hidden_size);
        self.heads = Some(heads);
        self
    }

    pub fn with_tokens(mut self, prompt_tokens: u64, new_tokens: u64) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.new_tokens = new_tokens;
        self
    }

    pub fn with_batch(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_target_tps(mut self, target_tps: f64) -> Self {
        self.target_tps = target_tps;
        self
    }

    /// Fill hardware peaks from a catalog entry, scaled by device count
    pub fn with_hardware(mut self, spec: &AcceleratorSpec, count: u32) -> Self {
        let n = f64::from(count.max(1));
        self.peak_tflops = Some(spec.bf16_or_fp16() * n);
        self.peak_tops = Some(spec.tops_int8 * n);
        self.mem_bandwidth_gbps = Some(spec.bandwidth_gbps * n);
        self.total_vram_available_gb = Some(spec.vram_gb * n);
        self
    }

    pub fn active_params_b(&self) -> f64 {
        self.active_params_b.unwrap_or(self.params_b)
    }

    pub fn hints(&self) -> ShapeHints {
        ShapeHints {
            layers: self.layers.filter(|&v| v > 0),
            hidden_size: self.hidden_size.filter(|&v| v > 0),
            heads: self.heads.filter(|&v| v > 0),
        }
    }

    pub fn validate(&self) -> Result<(), WorkloadError> {
        if !self.params_b.is_finite() || self.params_b <= 0.0 {
            return Err(WorkloadError::InvalidParams(self.params_b));
        }

        if let Some(active) = self.active_params_b {
            if !active.is_finite() || active <= 0.0 || active > self.params_b {
                return Err(WorkloadError::InvalidActiveParams {
                    active,
                    params_b: self.params_b,
                });
            }
        }

        if self.batch_size == 0 {
            return Err(WorkloadError::ZeroBatch);
        }

        for (name, value) in [
            ("compute", self.util_compute),
            ("bandwidth", self.util_bandwidth),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(WorkloadError::InvalidUtilization { name, value });
            }
        }

        if !self.target_tps.is_finite() || self.target_tps < 0.0 {
            return Err(WorkloadError::InvalidTargetTps(self.target_tps));
        }

        if !self.ttft_budget_ms.is_finite() || self.ttft_budget_ms < 0.0 {
            return Err(WorkloadError::InvalidTtftBudget(self.ttft_budget_ms));
        }

        Ok(())
    }
}
