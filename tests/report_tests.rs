use llm_sizer::config::ModelPreset;
use llm_sizer::hardware::Catalog;
use llm_sizer::report::SizingReport;
use llm_sizer::{estimate, recommend, Config};
use tempfile::TempDir;

#[test]
fn test_report_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.json");

    let config = Config::default();
    let spec = ModelPreset::from_preset("llama-8b")
        .unwrap()
        .to_workload(&config.estimator)
        .with_tokens(4096, 512);
    let req = estimate(&spec).unwrap();
    let recs = recommend(&req, Catalog::builtin(), &config.matcher);
    let report = SizingReport::new(spec, req, Some(recs));

    report.save(&path).unwrap();
    assert!(path.exists());

    let loaded = SizingReport::load(&path).unwrap();
    loaded.print_summary();
    assert_eq!(loaded.workload, report.workload);
    assert_eq!(loaded.requirements.shape, report.requirements.shape);
    assert_eq!(loaded.created_at, report.created_at);
    assert_eq!(
        loaded.recommendations.map(|r| r.all.len()),
        report.recommendations.map(|r| r.all.len())
    );
}

#[test]
fn test_load_missing_report() {
    let temp_dir = TempDir::new().unwrap();
    let err = SizingReport::load(temp_dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read report"));
}

#[test]
fn test_config_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::default();
    config.matcher.max_devices = 4;
    config.estimator.util_compute = 0.5;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"matcher": {"top_n": 2}}"#).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.matcher.top_n, 2);
    assert_eq!(loaded.matcher.per_category, 3);
    assert_eq!(loaded.estimator, Config::default().estimator);
}

#[test]
fn test_catalog_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gpus.json");

    let catalog = Catalog::new(Catalog::builtin().popular().into_iter().cloned().collect());
    catalog.save(&path).unwrap();

    let loaded = Catalog::load(&path).unwrap();
    assert_eq!(loaded, catalog);
    assert!(loaded.iter().all(|g| g.popular));
}
