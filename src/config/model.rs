use crate::config::estimator::EstimatorDefaults;
use crate::config::precision::Precision;
use crate::config::workload::WorkloadSpec;
use crate::requirements::estimate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// VRAM below which a model counts as consumer-class
pub const CONSUMER_TIER_MAX_GB: f64 = 24.0;
/// VRAM up to which a model counts as workstation-class
pub const WORKSTATION_TIER_MAX_GB: f64 = 80.0;
/// Context used to place models into hardware tiers
pub const TIER_PROMPT_TOKENS: u64 = 8192;
pub const TIER_NEW_TOKENS: u64 = 512;

/// Mixture-of-experts routing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoeConfig {
    pub num_experts: u32,
    pub top_k: u32,
}

/// Published architecture of a known model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPreset {
    pub id: String,
    pub name: String,
    pub params_b: f64,
    #[serde(default)]
    pub active_params_b: Option<f64>,
    pub layers: u32,
    pub hidden_size: u32,
    pub heads: u32,
    #[serde(default)]
    pub moe: Option<MoeConfig>,
}

impl ModelPreset {
    /// Parameters used per token: explicit value, else the routed share of experts
    pub fn active_params_b(&self) -> f64 {
        if let Some(active) = self.active_params_b {
            return active;
        }
        match self.moe {
            Some(moe) if moe.num_experts > 0 => {
                let top_k = moe.top_k.clamp(1, moe.num_experts);
                self.params_b / f64::from(moe.num_experts) * f64::from(top_k)
            }
            _ => self.params_b,
        }
    }

    pub fn is_moe(&self) -> bool {
        self.moe.is_some() || self.active_params_b.is_some_and(|a| a < self.params_b)
    }

    pub fn from_preset(preset: &str) -> anyhow::Result<Self> {
        AVAILABLE_MODELS.get(preset).cloned().ok_or_else(|| {
            let mut known: Vec<&String> = AVAILABLE_MODELS.keys().collect();
            known.sort();
            anyhow::anyhow!("Unknown preset: {}. Available: {:?}", preset, known)
        })
    }

    /// Workload for this model with shape hints filled from the preset
    pub fn to_workload(&self, defaults: &EstimatorDefaults) -> WorkloadSpec {
        let mut spec = defaults
            .workload(self.params_b)
            .with_shape(self.layers, self.hidden_size, self.heads);
        if self.is_moe() {
            spec.active_params_b = Some(self.active_params_b());
        }
        spec
    }
}

/// Models grouped by the hardware class needed to serve them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTiers {
    pub consumer: Vec<ModelPreset>,
    pub workstation: Vec<ModelPreset>,
    pub infrastructure: Vec<ModelPreset>,
}

/// Place each model in a hardware tier by its int8 footprint at an 8K
/// prompt, 512 new tokens and batch 1. Each tier is sorted by size.
///
/// Presets the estimator rejects are skipped.
pub fn group_by_hardware_tier(models: &[ModelPreset]) -> ModelTiers {
    let defaults = EstimatorDefaults {
        weight_precision: Precision::Int8,
        kv_precision: Precision::Int8,
        ..Default::default()
    };
    let mut tiers = ModelTiers::default();

    for model in models {
        let spec = model
            .to_workload(&defaults)
            .with_tokens(TIER_PROMPT_TOKENS, TIER_NEW_TOKENS)
            .with_batch(1);
        let vram_gb = match estimate(&spec) {
            Ok(req) => req.total_vram_gb,
            Err(e) => {
                warn!(model = %model.id, error = %e, "skipping preset");
                continue;
            }
        };

        let tier = if vram_gb < CONSUMER_TIER_MAX_GB {
            &mut tiers.consumer
        } else if vram_gb <= WORKSTATION_TIER_MAX_GB {
            &mut tiers.workstation
        } else {
            &mut tiers.infrastructure
        };
        tier.push(model.clone());
    }

    for tier in [
        &mut tiers.consumer,
        &mut tiers.workstation,
        &mut tiers.infrastructure,
    ] {
        tier.sort_by(|a, b| a.params_b.total_cmp(&b.params_b));
    }
    tiers
}

#[allow(clippy::too_many_arguments)]
fn preset(
    id: &str,
    name: &str,
    params_b: f64,
    active_params_b: Option<f64>,
    layers: u32,
    hidden_size: u32,
    heads: u32,
    moe: Option<MoeConfig>,
) -> (String, ModelPreset) {
    (
        id.to_string(),
        ModelPreset {
            id: id.to_string(),
            name: name.to_string(),
            params_b,
            active_params_b,
            layers,
            hidden_size,
            heads,
            moe,
        },
    )
}

/// Well-known open-weight models
#[rustfmt::skip]
pub static AVAILABLE_MODELS: Lazy<HashMap<String, ModelPreset>> = Lazy::new(|| {
    HashMap::from([
        preset("phi-3-mini", "microsoft/Phi-3-mini-4k-instruct", 3.8, None, 32, 3072, 32, None),
        preset("mistral-7b", "mistralai/Mistral-7B-Instruct-v0.3", 7.2, None, 32, 4096, 32, None),
        preset("llama-8b", "meta-llama/Llama-3.1-8B-Instruct", 8.0, None, 32, 4096, 32, None),
        preset("qwen-14b", "Qwen/Qwen2.5-14B-Instruct", 14.7, None, 48, 5120, 40, None),
        preset("llama-70b", "meta-llama/Llama-3.1-70B-Instruct", 70.6, None, 80, 8192, 64, None),
        preset("qwen-72b", "Qwen/Qwen2.5-72B-Instruct", 72.7, None, 80, 8192, 64, None),
        preset(
            "mixtral-8x7b", "mistralai/Mixtral-8x7B-Instruct-v0.1", 46.7, None, 32, 4096, 32,
            Some(MoeConfig { num_experts: 8, top_k: 2 }),
        ),
        preset(
            "deepseek-v3", "deepseek-ai/DeepSeek-V3", 671.0, Some(37.0), 61, 7168, 128,
            Some(MoeConfig { num_experts: 256, top_k: 8 }),
        ),
    ])
});
