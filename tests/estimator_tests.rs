//! Behavioural checks on requirement estimation

use llm_sizer::{estimate, Precision, RequirementsResult, WorkloadError, WorkloadSpec};

fn base() -> WorkloadSpec {
    WorkloadSpec::new(13.0)
        .with_tokens(4096, 512)
        .with_batch(4)
        .with_target_tps(20.0)
}

fn run(spec: &WorkloadSpec) -> RequirementsResult {
    estimate(spec).expect("valid workload")
}

#[test]
fn test_longer_prompt_never_cheaper() {
    let short = run(&base());
    let long = run(&base().with_tokens(8192, 512));

    assert!(long.total_vram_gb >= short.total_vram_gb);
    assert!(long.required_tflops >= short.required_tflops);
    assert!(long.required_bw_gbps_conservative >= short.required_bw_gbps_conservative);
    assert!(long.total_prefill_flops > short.total_prefill_flops);
}

#[test]
fn test_more_new_tokens_never_cheaper() {
    let short = run(&base());
    let long = run(&base().with_tokens(4096, 4096));

    assert!(long.total_vram_gb >= short.total_vram_gb);
    assert!(long.required_tflops >= short.required_tflops);
    assert!(long.required_bw_gbps_conservative >= short.required_bw_gbps_conservative);
    assert_eq!(long.total_prefill_flops, short.total_prefill_flops);
}

#[test]
fn test_batch_scaling() {
    let one = run(&base().with_batch(1));
    let two = run(&base().with_batch(2));

    assert!((two.kv_cache_bytes - 2.0 * one.kv_cache_bytes).abs() < 1.0);
    assert_eq!(one.total_throughput(), 20.0);
    assert_eq!(two.total_throughput(), 40.0);
    assert_eq!(two.weight_bytes_total, one.weight_bytes_total);

    // Weight reads are shared across the batch
    let weight_term = |r: &RequirementsResult| {
        r.amortized_bytes_per_token - r.kv_read_bytes_per_token - r.kv_write_bytes_per_token
    };
    assert!((weight_term(&two) - weight_term(&one) / 2.0).abs() < 1.0);
    assert!(two.amortized_bytes_per_token < one.amortized_bytes_per_token);
    assert!(two.required_bw_gbps_conservative > one.required_bw_gbps_conservative);
}

#[test]
fn test_precision_ordering() {
    let vram = |p: Precision| run(&base().with_precision(p, p)).total_vram_gb;

    assert!(vram(Precision::Int4) < vram(Precision::Int8));
    assert_eq!(vram(Precision::Int8), vram(Precision::Fp8));
    assert!(vram(Precision::Fp8) < vram(Precision::Bf16));
    assert_eq!(vram(Precision::Bf16), vram(Precision::Fp16));
}

#[test]
fn test_optimistic_not_above_conservative() {
    for batch in [1, 2, 8, 64] {
        let req = run(&base().with_batch(batch));
        assert!(req.required_bw_gbps_optimistic <= req.required_bw_gbps_conservative);
    }
}

#[test]
fn test_estimate_is_deterministic() {
    let spec = base().with_shape(40, 5120, 40);
    assert_eq!(run(&spec), run(&spec));
}

#[test]
fn test_zero_target_tps() {
    let req = run(&base().with_target_tps(0.0));
    assert_eq!(req.required_tflops, 0.0);
    assert_eq!(req.required_bw_gbps_conservative, 0.0);
    assert!(req.total_vram_gb > 0.0);
}

#[test]
fn test_rejects_invalid_workloads() {
    assert!(matches!(
        estimate(&WorkloadSpec::new(-7.0)),
        Err(WorkloadError::InvalidParams(_))
    ));
    assert!(matches!(
        estimate(&base().with_batch(0)),
        Err(WorkloadError::ZeroBatch)
    ));
    assert!(matches!(
        estimate(&base().with_active_params(20.0)),
        Err(WorkloadError::InvalidActiveParams { .. })
    ));

    let mut spec = base();
    spec.util_bandwidth = 1.5;
    assert!(matches!(
        estimate(&spec),
        Err(WorkloadError::InvalidUtilization { name: "bandwidth", .. })
    ));
}

#[test]
fn test_missing_hardware_is_unknown() {
    let req = run(&base());
    assert_eq!(req.effective_tflops, None);
    assert_eq!(req.effective_bw_gbps, None);
    assert_eq!(req.ttft_ms, None);
    assert_eq!(req.compute_ok, None);
    assert_eq!(req.bandwidth_ok, None);
    assert_eq!(req.vram_ok, None);
    assert_eq!(req.ttft_ok, None);
}

#[test]
fn test_ttft_budget_flag() {
    let mut spec = base();
    spec.peak_tflops = Some(1000.0);
    spec.ttft_budget_ms = 100.0;
    let req = run(&spec);

    let ttft = req.ttft_ms.unwrap();
    let expected = req.total_prefill_flops / (400.0 * 1e12) * 1000.0 + 80.0;
    assert!((ttft - expected).abs() < 1e-9);
    assert_eq!(req.ttft_ok, Some(ttft <= 100.0));
}
