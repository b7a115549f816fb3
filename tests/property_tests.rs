//! Property checks over randomly generated workloads

use llm_sizer::hardware::{Catalog, DeviceMode};
use llm_sizer::{estimate, find_suitable, Precision, WorkloadSpec};
use proptest::prelude::*;

fn precision() -> impl Strategy<Value = Precision> {
    prop::sample::select(Precision::ALL.to_vec())
}

fn workload() -> impl Strategy<Value = WorkloadSpec> {
    (
        0.5f64..700.0,
        precision(),
        precision(),
        0u64..32_768,
        0u64..4096,
        1u32..64,
        0.0f64..100.0,
    )
        .prop_map(|(params_b, w, kv, prompt, new, batch, tps)| {
            WorkloadSpec::new(params_b)
                .with_precision(w, kv)
                .with_tokens(prompt, new)
                .with_batch(batch)
                .with_target_tps(tps)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_outputs_finite_and_non_negative(spec in workload()) {
        let req = estimate(&spec).unwrap();
        for value in [
            req.total_vram_gb,
            req.kv_cache_bytes,
            req.total_prefill_flops,
            req.decode_flops_per_token,
            req.required_tflops,
            req.required_bw_gbps_conservative,
            req.required_bw_gbps_optimistic,
        ] {
            prop_assert!(value.is_finite() && value >= 0.0, "bad value {}", value);
        }
        prop_assert!(req.shape.head_dim >= 16);
        prop_assert!(req.shape.hidden_size % 64 == 0);
    }

    #[test]
    fn prop_optimistic_not_above_conservative(spec in workload()) {
        let req = estimate(&spec).unwrap();
        prop_assert!(req.required_bw_gbps_optimistic <= req.required_bw_gbps_conservative);
    }

    #[test]
    fn prop_prompt_monotonic(spec in workload(), extra in 1u64..4096) {
        let longer = spec.clone().with_tokens(spec.prompt_tokens + extra, spec.new_tokens);
        let a = estimate(&spec).unwrap();
        let b = estimate(&longer).unwrap();
        prop_assert!(b.total_vram_gb >= a.total_vram_gb);
        prop_assert!(b.required_tflops >= a.required_tflops);
        prop_assert!(b.required_bw_gbps_conservative >= a.required_bw_gbps_conservative);
    }

    #[test]
    fn prop_single_device_meets_every_requirement(spec in workload()) {
        let req = estimate(&spec).unwrap();
        for rec in find_suitable(&req, Catalog::builtin(), DeviceMode::Single) {
            prop_assert_eq!(rec.count, 1);
            prop_assert!(rec.total_vram_gb >= req.total_vram_gb);
            prop_assert!(rec.effective_tflops >= req.required_tflops);
            prop_assert!(rec.total_bandwidth_gbps >= req.required_bw_gbps());
        }
    }

    #[test]
    fn prop_multi_device_within_limit(spec in workload()) {
        let req = estimate(&spec).unwrap();
        for rec in find_suitable(&req, Catalog::builtin(), DeviceMode::Multi) {
            prop_assert!((1..=8).contains(&rec.count));
            prop_assert!(rec.total_vram_gb >= req.total_vram_gb);
            prop_assert!(rec.effective_tflops >= req.required_tflops);
            prop_assert!(rec.total_bandwidth_gbps >= req.required_bw_gbps());
        }
    }
}
