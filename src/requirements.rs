//! Inference resource estimation
//!
//! Turns a [`WorkloadSpec`] into memory, compute and bandwidth demands for
//! serving it. Prefill and decode are modeled separately: prefill is a
//! compute-bound pass over the whole prompt, decode is a memory-bound pass per
//! generated token.
//!
//! All figures are analytical approximations. The calibration constants below
//! are empirical and kept fixed; they are knobs, not derived quantities.

use crate::config::precision::Precision;
use crate::config::workload::{known, WorkloadError, WorkloadSpec};
use crate::model::shape::{self, ResolvedShape};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Share of the weight footprint reserved for activations and fragmentation
pub const WORKSPACE_FRACTION: f64 = 0.12;

/// Share of the active weights assumed to stream from memory per token when
/// most of them stay cache-resident
pub const OPTIMISTIC_WEIGHT_FRACTION: f64 = 0.2;

/// Fixed scheduling/launch overhead added to every TTFT projection
pub const TTFT_OVERHEAD_MS: f64 = 80.0;

/// TOPS per TFLOP-equivalent when comparing integer and float throughput
pub const INT_OPS_PER_TFLOP: f64 = 1000.0;

/// Every quantity derived for a workload
///
/// Optional fields are `None` when the hardware figure they depend on was not
/// supplied. `None` means unknown, never zero or false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementsResult {
    pub params_b: f64,
    pub active_params_b: f64,
    pub weight_precision: Precision,
    pub kv_precision: Precision,
    pub weight_bytes_per_param: f64,
    pub kv_bytes_per_param: f64,
    pub shape: ResolvedShape,

    pub prompt_tokens: u64,
    pub new_tokens: u64,
    pub batch_size: u32,
    pub target_tps: f64,
    pub total_seq: u64,
    pub avg_decode_seq: f64,

    // Memory
    pub weight_bytes_total: f64,
    pub kv_bytes_per_token: f64,
    pub kv_cache_bytes: f64,
    pub workspace_bytes: f64,
    pub total_vram_gb: f64,

    // Compute
    pub prefill_flops: f64,
    pub attn_prefill_flops: f64,
    pub total_prefill_flops: f64,
    pub decode_flops_per_token: f64,
    pub required_tflops: f64,

    // Bandwidth
    pub weight_read_bytes_per_token: f64,
    pub kv_read_bytes_per_token: f64,
    pub kv_write_bytes_per_token: f64,
    pub amortized_bytes_per_token: f64,
    pub amortized_bytes_per_token_optimistic: f64,
    pub required_bw_gbps_conservative: f64,
    pub required_bw_gbps_optimistic: f64,

    // Hardware-dependent
    pub effective_tflops: Option<f64>,
    pub effective_bw_gbps: Option<f64>,
    pub ttft_ms: Option<f64>,
    pub ttft_budget_ms: f64,
    pub compute_ok: Option<bool>,
    pub vram_ok: Option<bool>,
    pub bandwidth_ok: Option<bool>,
    pub ttft_ok: Option<bool>,
}

impl RequirementsResult {
    /// Bandwidth figure used for hardware matching (the conservative one)
    pub fn required_bw_gbps(&self) -> f64 {
        self.required_bw_gbps_conservative
    }

    /// Aggregate output tokens/second across all streams
    pub fn total_throughput(&self) -> f64 {
        self.target_tps * f64::from(self.batch_size)
    }
}

/// Estimate the resources needed to serve `spec`
///
/// # Memory
///
/// ```text
/// weights   = params · 1e9 · bytes(weight)
/// kv/token  = layers · hidden · 2 · bytes(kv)           (K and V)
/// kv cache  = batch · (prompt + new) · kv/token
/// workspace = 0.12 · weights
/// ```
///
/// # Compute
///
/// ```text
/// prefill   = 2 · active · 1e9 · prompt · batch  +  4 · layers · prompt² · hidden · batch
/// decode/tk = 2 · active · 1e9  +  4 · layers · avg_seq · hidden
/// avg_seq   = prompt + max(new, 1) / 2
/// TFLOPS    = decode/tk · tps · batch / 1e12
/// ```
///
/// # Bandwidth
///
/// Weight reads are amortized across the batch; KV reads and writes are not.
/// The optimistic variant streams only [`OPTIMISTIC_WEIGHT_FRACTION`] of the
/// weights per token.
///
/// # Errors
///
/// Returns [`WorkloadError`] when `spec` fails [`WorkloadSpec::validate`].
pub fn estimate(spec: &WorkloadSpec) -> Result<RequirementsResult, WorkloadError> {
    spec.validate()?;

    let params_b = spec.params_b;
    let active_params_b = spec.active_params_b();
    let weight_bytes = spec.weight_precision.bytes_per_element();
    let kv_bytes = spec.kv_precision.bytes_per_element();

    let shape = shape::resolve(params_b, &spec.hints());
    let layers = f64::from(shape.layers);
    let hidden = f64::from(shape.hidden_size);

    let prompt = spec.prompt_tokens as f64;
    let new = spec.new_tokens as f64;
    let batch = f64::from(spec.batch_size);
    let total_seq = spec.prompt_tokens.saturating_add(spec.new_tokens);
    let avg_decode_seq = prompt + new.max(1.0) * 0.5;
    let total_throughput = spec.target_tps * batch;

    // Memory
    let weight_bytes_total = params_b * 1e9 * weight_bytes;
    let kv_bytes_per_token = layers * hidden * 2.0 * kv_bytes;
    let kv_cache_bytes = batch * total_seq as f64 * kv_bytes_per_token;
    let workspace_bytes = weight_bytes_total * WORKSPACE_FRACTION;
    let total_vram_gb = (weight_bytes_total + kv_cache_bytes + workspace_bytes) / 1e9;

    // Compute
    let prefill_flops = 2.0 * active_params_b * 1e9 * prompt * batch;
    let attn_prefill_flops = 4.0 * layers * prompt.powi(2) * hidden * batch;
    let total_prefill_flops = prefill_flops + attn_prefill_flops;
    let decode_flops_per_token =
        2.0 * active_params_b * 1e9 + 4.0 * layers * avg_decode_seq * hidden;
    let required_tflops = decode_flops_per_token * total_throughput / 1e12;

    // Bandwidth
    let weight_read_bytes_per_token = active_params_b * 1e9 * weight_bytes;
    let kv_read_bytes_per_token = layers * avg_decode_seq.max(1.0) * hidden * 2.0 * kv_bytes;
    let kv_write_bytes_per_token = layers * hidden * 2.0 * kv_bytes;
    let kv_traffic = kv_read_bytes_per_token + kv_write_bytes_per_token;
    let amortized_bytes_per_token = weight_read_bytes_per_token / batch + kv_traffic;
    let amortized_bytes_per_token_optimistic =
        weight_read_bytes_per_token * OPTIMISTIC_WEIGHT_FRACTION / batch + kv_traffic;
    let required_bw_gbps_conservative = amortized_bytes_per_token * total_throughput / 1e9;
    let required_bw_gbps_optimistic =
        amortized_bytes_per_token_optimistic * total_throughput / 1e9;

    // Hardware
    let peak_tflops = known(spec.peak_tflops);
    let peak_tops = known(spec.peak_tops);
    let effective_tflops = if peak_tflops.is_some() || peak_tops.is_some() {
        let float = peak_tflops.unwrap_or(0.0) * spec.util_compute;
        let int = peak_tops.unwrap_or(0.0) * spec.util_compute / INT_OPS_PER_TFLOP;
        Some(float.max(int))
    } else {
        None
    };
    let effective_bw_gbps = known(spec.mem_bandwidth_gbps).map(|bw| bw * spec.util_bandwidth);

    let ttft_ms = effective_tflops
        .filter(|&t| t > 0.0)
        .map(|t| total_prefill_flops / (t * 1e12) * 1000.0 + TTFT_OVERHEAD_MS);

    let compute_ok = effective_tflops.map(|t| t >= required_tflops);
    let bandwidth_ok = effective_bw_gbps.map(|bw| bw >= required_bw_gbps_conservative);
    let vram_ok = known(spec.total_vram_available_gb).map(|gb| gb >= total_vram_gb);
    let ttft_ok = ttft_ms.map(|t| t <= spec.ttft_budget_ms);

    debug!(
        total_vram_gb,
        required_tflops,
        required_bw_gbps = required_bw_gbps_conservative,
        ?ttft_ms,
        "estimated requirements"
    );

    Ok(RequirementsResult {
        params_b,
        active_params_b,
        weight_precision: spec.weight_precision,
        kv_precision: spec.kv_precision,
        weight_bytes_per_param: weight_bytes,
        kv_bytes_per_param: kv_bytes,
        shape,
        prompt_tokens: spec.prompt_tokens,
        new_tokens: spec.new_tokens,
        batch_size: spec.batch_size,
        target_tps: spec.target_tps,
        total_seq,
        avg_decode_seq,
        weight_bytes_total,
        kv_bytes_per_token,
        kv_cache_bytes,
        workspace_bytes,
        total_vram_gb,
        prefill_flops,
        attn_prefill_flops,
        total_prefill_flops,
        decode_flops_per_token,
        required_tflops,
        weight_read_bytes_per_token,
        kv_read_bytes_per_token,
        kv_write_bytes_per_token,
        amortized_bytes_per_token,
        amortized_bytes_per_token_optimistic,
        required_bw_gbps_conservative,
        required_bw_gbps_optimistic,
        effective_tflops,
        effective_bw_gbps,
        ttft_ms,
        ttft_budget_ms: spec.ttft_budget_ms,
        compute_ok,
        vram_ok,
        bandwidth_ok,
        ttft_ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    fn llama_70b_int8() -> WorkloadSpec {
        WorkloadSpec::new(70.0)
            .with_precision(Precision::Int8, Precision::Int8)
            .with_shape(80, 8192, 64)
            .with_tokens(8192, 512)
            .with_target_tps(10.0)
    }

    #[test]
    fn test_golden_70b_int8() {
        let r = estimate(&llama_70b_int8()).unwrap();

        assert_eq!(r.weight_bytes_total, 70e9);
        assert_eq!(r.kv_bytes_per_token, 1_310_720.0);
        assert_eq!(r.kv_cache_bytes, 11_408_506_880.0);
        assert!(close(r.workspace_bytes, 8.4e9));
        assert!(close(r.total_vram_gb, 89.80850688), "{}", r.total_vram_gb);

        assert!(close(r.total_prefill_flops, 1.32280186044416e15));
        assert_eq!(r.avg_decode_seq, 8448.0);
        assert!(close(r.decode_flops_per_token, 162_145_925_120.0));
        assert!(close(r.required_tflops, 1.6214592512));

        assert!(close(r.required_bw_gbps_conservative, 810.7427328));
        assert!(close(r.required_bw_gbps_optimistic, 250.7427328));
    }

    #[test]
    fn test_hardware_fields_unknown_without_peaks() {
        let r = estimate(&llama_70b_int8()).unwrap();
        assert_eq!(r.effective_tflops, None);
        assert_eq!(r.effective_bw_gbps, None);
        assert_eq!(r.ttft_ms, None);
        assert_eq!(r.compute_ok, None);
        assert_eq!(r.bandwidth_ok, None);
        assert_eq!(r.vram_ok, None);
        assert_eq!(r.ttft_ok, None);
    }

    #[test]
    fn test_effective_throughput_prefers_larger() {
        let mut spec = llama_70b_int8();
        spec.peak_tflops = Some(100.0);
        spec.peak_tops = Some(400.0);
        let r = estimate(&spec).unwrap();
        // 100 * 0.4 = 40 beats 400 * 0.4 / 1000 = 0.16
        assert!(close(r.effective_tflops.unwrap(), 40.0));
        assert_eq!(r.compute_ok, Some(true));

        let expected_ttft = r.total_prefill_flops / 40e12 * 1000.0 + TTFT_OVERHEAD_MS;
        assert!(close(r.ttft_ms.unwrap(), expected_ttft));
        assert_eq!(r.ttft_ok, Some(expected_ttft <= 1000.0));
    }

    #[test]
    fn test_tops_only_hardware() {
        let mut spec = llama_70b_int8();
        spec.peak_tops = Some(2000.0);
        let r = estimate(&spec).unwrap();
        assert!(close(r.effective_tflops.unwrap(), 0.8));
        assert_eq!(r.compute_ok, Some(false));
    }

    #[test]
    fn test_bandwidth_and_vram_flags() {
        let mut spec = llama_70b_int8();
        spec.mem_bandwidth_gbps = Some(2000.0);
        spec.total_vram_available_gb = Some(80.0);
        let r = estimate(&spec).unwrap();
        assert!(close(r.effective_bw_gbps.unwrap(), 1200.0));
        assert_eq!(r.bandwidth_ok, Some(true));
        assert_eq!(r.vram_ok, Some(false));
    }

    #[test]
    fn test_non_finite_hardware_is_unknown() {
        let mut spec = llama_70b_int8();
        spec.peak_tflops = Some(f64::NAN);
        spec.mem_bandwidth_gbps = Some(0.0);
        let r = estimate(&spec).unwrap();
        assert_eq!(r.effective_tflops, None);
        assert_eq!(r.effective_bw_gbps, None);
    }

    #[test]
    fn test_empty_workload_is_memory_only() {
        let spec = WorkloadSpec::new(7.0);
        let r = estimate(&spec).unwrap();
        assert_eq!(r.kv_cache_bytes, 0.0);
        assert_eq!(r.total_prefill_flops, 0.0);
        assert!(close(r.total_vram_gb, 7.0 * 2.0 * 1.12));
        assert!(r.required_tflops.is_finite());
    }

    #[test]
    fn test_moe_active_params_drive_compute_not_memory() {
        let dense = estimate(&WorkloadSpec::new(47.0).with_tokens(1024, 256)).unwrap();
        let moe = estimate(
            &WorkloadSpec::new(47.0)
                .with_active_params(13.0)
                .with_tokens(1024, 256),
        )
        .unwrap();
        assert_eq!(dense.total_vram_gb, moe.total_vram_gb);
        assert!(moe.required_tflops < dense.required_tflops);
        assert!(moe.required_bw_gbps() < dense.required_bw_gbps());
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(estimate(&WorkloadSpec::new(0.0)).is_err());
        assert!(estimate(&WorkloadSpec::new(7.0).with_batch(0)).is_err());
    }
}
