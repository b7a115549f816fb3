use llm_sizer::config::{ModelPreset, AVAILABLE_MODELS};
use llm_sizer::hardware::{Catalog, DeviceMode};
use llm_sizer::{estimate, find_suitable, recommend, Config, Precision, WorkloadSpec};

#[test]
fn test_config_creation() {
    let config = Config::default();
    assert_eq!(config.estimator.weight_precision, Precision::Bf16);
    assert_eq!(config.estimator.util_compute, 0.4);
    assert_eq!(config.estimator.util_bandwidth, 0.6);
    assert_eq!(config.matcher.max_devices, 8);
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let dict = config.to_dict().unwrap();
    assert!(dict.contains_key("estimator"));
    assert!(dict.contains_key("matcher"));

    let restored = Config::from_dict(dict).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_unknown_preset() {
    let err = ModelPreset::from_preset("gpt-17").unwrap_err();
    assert!(err.to_string().contains("Unknown preset: gpt-17"));
}

#[test]
fn test_every_preset_estimates() {
    let config = Config::default();
    for (id, preset) in AVAILABLE_MODELS.iter() {
        let spec = preset
            .to_workload(&config.estimator)
            .with_tokens(2048, 256);
        let req = estimate(&spec).unwrap_or_else(|e| panic!("{} failed: {}", id, e));
        assert_eq!(req.shape.layers, preset.layers, "{}", id);
        assert_eq!(req.shape.hidden_size, preset.hidden_size, "{}", id);
        assert!(req.total_vram_gb > preset.params_b * 2.0, "{}", id);
        assert!(req.active_params_b <= req.params_b, "{}", id);
    }
}

#[test]
fn test_moe_preset_uses_active_params_for_compute() {
    let config = Config::default();
    let mixtral = ModelPreset::from_preset("mixtral-8x7b").unwrap();
    let moe = estimate(&mixtral.to_workload(&config.estimator)).unwrap();

    let dense_spec = config
        .estimator
        .workload(mixtral.params_b)
        .with_shape(mixtral.layers, mixtral.hidden_size, mixtral.heads);
    let dense = estimate(&dense_spec).unwrap();

    // Memory follows total parameters, compute follows active ones
    assert_eq!(moe.weight_bytes_total, dense.weight_bytes_total);
    assert!(moe.decode_flops_per_token < dense.decode_flops_per_token);
    assert!(moe.required_bw_gbps() < dense.required_bw_gbps());
}

#[test]
fn test_full_pipeline() {
    let spec = WorkloadSpec::new(70.0)
        .with_precision(Precision::Int8, Precision::Int8)
        .with_shape(80, 8192, 64)
        .with_tokens(8192, 512)
        .with_target_tps(10.0);
    let req = estimate(&spec).unwrap();
    assert!((req.total_vram_gb - 89.80850688).abs() < 1e-6);

    let single = find_suitable(&req, Catalog::builtin(), DeviceMode::Single);
    assert!(single.iter().all(|r| r.spec.vram_gb >= req.total_vram_gb));
    assert!(single.iter().any(|r| r.spec.id == "mi300x"));
    assert!(single.iter().all(|r| r.spec.id != "h100-80gb"));

    let multi = find_suitable(&req, Catalog::builtin(), DeviceMode::Multi);
    let h100 = multi.iter().find(|r| r.spec.id == "h100-80gb").unwrap();
    assert_eq!(h100.count, 2);

    let bundle = recommend(&req, Catalog::builtin(), &Config::default().matcher);
    assert!(!bundle.is_empty());
    assert!(bundle.consumer.is_empty(), "no consumer card holds 90 GB");
}

#[test]
fn test_hardware_from_catalog_entry() {
    let gpu = Catalog::builtin().get("rtx-4090").unwrap();
    let spec = WorkloadSpec::new(7.0)
        .with_tokens(1024, 256)
        .with_hardware(gpu, 1);
    let req = estimate(&spec).unwrap();

    assert_eq!(req.effective_tflops, Some(165.2 * 0.4));
    assert_eq!(req.effective_bw_gbps, Some(1008.0 * 0.6));
    assert_eq!(req.vram_ok, Some(true));
    assert_eq!(req.compute_ok, Some(true));
    assert!(req.ttft_ms.unwrap() > 80.0);
}
