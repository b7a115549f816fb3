//! CLI command implementations

use super::WorkloadArgs;
use anyhow::{Context, Result};
use llm_sizer::config::model::AVAILABLE_MODELS;
use llm_sizer::config::{group_by_hardware_tier, Config, ModelPreset, WorkloadSpec};
use llm_sizer::hardware::{
    estimate_cloud_cost, recommend as recommend_hardware, AcceleratorSpec, Catalog, Category,
    Recommendation,
};
use llm_sizer::model::{detect_model_size, size_category};
use llm_sizer::report::SizingReport;
use llm_sizer::requirements::{estimate as estimate_requirements, RequirementsResult};
use llm_sizer::ttft::{chart_data, required_tflops_for_ttft, thresholds, DEFAULT_PROMPT_LENGTHS};
use llm_sizer::utils::{
    fmt_compute, fmt_number, fmt_optional, format_bytes_gb, format_flops, format_ttft,
};
use llm_sizer::verdict::{FitStatus, Verdict};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            Config::load(path)
        }
        None => Ok(Config::default()),
    }
}

fn load_catalog(path: Option<PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let catalog = Catalog::load(&path)?;
            info!(path = %path.display(), entries = catalog.len(), "loaded accelerator catalog");
            Ok(catalog)
        }
        None => Ok(Catalog::builtin().clone()),
    }
}

/// Start from a workload file, a preset, a model name or `--params-b`, then
/// apply the remaining flags on top.
fn build_workload(config: &Config, args: &WorkloadArgs, catalog: &Catalog) -> Result<WorkloadSpec> {
    let defaults = &config.estimator;

    let mut spec = if let Some(path) = &args.workload {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read workload {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("invalid workload JSON in {}", path.display()))?
    } else if let Some(model) = &args.model {
        if AVAILABLE_MODELS.contains_key(model.as_str()) {
            ModelPreset::from_preset(model)?.to_workload(defaults)
        } else {
            let (category, params_b) = detect_model_size(model);
            if params_b <= 0.0 && args.params_b.is_none() {
                anyhow::bail!(
                    "Could not read a parameter count from '{}'. Use a preset or --params-b",
                    model
                );
            }
            debug!(
                model = %model,
                category = %category,
                params_b,
                "parameter count taken from model name"
            );
            defaults.workload(params_b)
        }
    } else {
        let params_b = args
            .params_b
            .ok_or_else(|| anyhow::anyhow!("Provide --model, --params-b or --workload"))?;
        defaults.workload(params_b)
    };

    if let Some(v) = args.params_b {
        spec.params_b = v;
    }
    if let Some(v) = args.active_params_b {
        spec.active_params_b = Some(v);
    }
    if let Some(v) = args.weight_precision {
        spec.weight_precision = v;
    }
    if let Some(v) = args.kv_precision {
        spec.kv_precision = v;
    }
    if args.layers.is_some() {
        spec.layers = args.layers;
    }
    if args.hidden_size.is_some() {
        spec.hidden_size = args.hidden_size;
    }
    if args.heads.is_some() {
        spec.heads = args.heads;
    }
    if let Some(v) = args.prompt_tokens {
        spec.prompt_tokens = v;
    }
    if let Some(v) = args.new_tokens {
        spec.new_tokens = v;
    }
    if let Some(v) = args.batch_size {
        spec.batch_size = v;
    }
    if let Some(v) = args.target_tps {
        spec.target_tps = v;
    }
    if let Some(v) = args.ttft_budget_ms {
        spec.ttft_budget_ms = v;
    }
    if let Some(v) = args.util_compute {
        spec.util_compute = v;
    }
    if let Some(v) = args.util_bandwidth {
        spec.util_bandwidth = v;
    }

    if let Some(id) = &args.gpu {
        let gpu = catalog
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown GPU: {}. Try 'llm-sizer gpus --search'", id))?;
        spec = spec.with_hardware(gpu, args.gpu_count.max(1));
    }
    if args.peak_tflops.is_some() {
        spec.peak_tflops = args.peak_tflops;
    }
    if args.peak_tops.is_some() {
        spec.peak_tops = args.peak_tops;
    }
    if args.mem_bandwidth.is_some() {
        spec.mem_bandwidth_gbps = args.mem_bandwidth;
    }

    Ok(spec)
}

fn flag(ok: Option<bool>) -> &'static str {
    match ok {
        Some(true) => "✅",
        Some(false) => "❌",
        None => "—",
    }
}

fn fit(status: Option<FitStatus>) -> &'static str {
    status.map_or("", FitStatus::label)
}

fn print_requirements(req: &RequirementsResult) {
    let verdict = Verdict::for_requirements(req);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                 LLM Inference Requirements                    ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "Model:      {}B params ({}B active, {})",
        fmt_number(req.params_b, 1),
        fmt_number(req.active_params_b, 1),
        size_category(req.params_b)
    );
    println!(
        "Shape:      {} layers, hidden {}, {} heads × {}",
        req.shape.layers, req.shape.hidden_size, req.shape.heads, req.shape.head_dim
    );
    println!(
        "Precision:  weights {} / kv {}",
        req.weight_precision, req.kv_precision
    );
    println!(
        "Workload:   {} prompt + {} new tokens, batch {}, {} tok/s per stream ({} tok/s total)",
        req.prompt_tokens,
        req.new_tokens,
        req.batch_size,
        fmt_number(req.target_tps, 1),
        fmt_number(req.total_throughput(), 1)
    );
    println!();

    println!("Memory");
    println!("  Weights:    {}", format_bytes_gb(req.weight_bytes_total));
    println!("  KV cache:   {}", format_bytes_gb(req.kv_cache_bytes));
    println!("  Workspace:  {}", format_bytes_gb(req.workspace_bytes));
    println!(
        "  Total:      {} GB  {} {}",
        fmt_number(req.total_vram_gb, 2),
        verdict.tier.status().label(),
        verdict.tier.title()
    );
    println!("              {}", verdict.vram);
    println!("              e.g. {}", verdict.tier.examples());
    println!();

    println!("Compute");
    println!("  Prefill:    {}", format_flops(req.total_prefill_flops / 1e12));
    println!("  Decode:     {}/token", format_flops(req.decode_flops_per_token / 1e12));
    println!(
        "  Required:   {} TFLOPS  ({})",
        fmt_compute(req.required_tflops),
        verdict.compute
    );
    println!();

    println!("Bandwidth");
    println!(
        "  Required:   {} GB/s (optimistic {} GB/s)",
        fmt_number(req.required_bw_gbps_conservative, 1),
        fmt_number(req.required_bw_gbps_optimistic, 1)
    );
    println!("              {}", verdict.bandwidth);
    println!();

    if req.effective_tflops.is_some() || req.effective_bw_gbps.is_some() {
        println!("Hardware check");
        println!(
            "  Effective compute:   {} TFLOPS {} {}",
            fmt_optional(req.effective_tflops, 2),
            flag(req.compute_ok),
            fit(verdict.compute_fit)
        );
        println!(
            "  Effective bandwidth: {} GB/s {} {}",
            fmt_optional(req.effective_bw_gbps, 1),
            flag(req.bandwidth_ok),
            fit(verdict.bandwidth_fit)
        );
        println!("  VRAM fits:           {}", flag(req.vram_ok));
        println!(
            "  TTFT:                {} (budget {}) {}",
            format_ttft(req.ttft_ms.map(|ms| ms / 1000.0)),
            format_ttft(Some(req.ttft_budget_ms / 1000.0)),
            flag(req.ttft_ok)
        );
        println!();
    }
}

fn print_recommendation_row(rec: &Recommendation, hours_per_month: f64) {
    let price = rec
        .total_cost
        .map_or_else(|| "price n/a".to_string(), |p| format!("${}", fmt_number(p, 0)));
    let cloud = estimate_cloud_cost(rec, hours_per_month)
        .map(|c| format!(" | cloud ${}/mo", fmt_number(c.monthly, 0)))
        .unwrap_or_default();
    println!(
        "  {:<28} {:>7} GB {:>9} TFLOPS {:>7} GB/s  {}{}",
        rec.label(),
        fmt_number(rec.total_vram_gb, 0),
        fmt_compute(rec.effective_tflops),
        fmt_number(rec.total_bandwidth_gbps, 0),
        price,
        cloud
    );
}

fn print_section(title: &str, recs: &[Recommendation], hours_per_month: f64) {
    if recs.is_empty() {
        return;
    }
    println!("{}", title);
    for rec in recs {
        print_recommendation_row(rec, hours_per_month);
    }
    println!();
}

pub fn estimate(
    config: &Config,
    args: &WorkloadArgs,
    catalog: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let spec = build_workload(config, args, &catalog)?;
    let req = estimate_requirements(&spec)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&req)?);
    } else {
        print_requirements(&req);
    }

    if let Some(path) = output {
        SizingReport::new(spec, req, None).save(&path)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

pub fn recommend(
    config: &Config,
    args: &WorkloadArgs,
    catalog: Option<PathBuf>,
    datacenter: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut catalog = load_catalog(catalog)?;
    if let Some(path) = datacenter {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read datacenter list {}", path.display()))?;
        let refreshed: Vec<AcceleratorSpec> = serde_json::from_str(&raw)?;
        info!(entries = refreshed.len(), "refreshing datacenter entries");
        catalog = catalog.with_datacenter_refresh(refreshed);
    }

    let spec = build_workload(config, args, &catalog)?;
    let req = estimate_requirements(&spec)?;
    let recs = recommend_hardware(&req, &catalog, &config.matcher);

    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
    } else {
        print_requirements(&req);
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║  HARDWARE RECOMMENDATIONS                                     ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        if recs.is_empty() {
            println!(
                "No configuration of up to {} devices fits this workload.",
                config.matcher.max_devices
            );
            println!("Try a lower precision, a shorter context or a smaller batch.");
            println!();
        } else {
            let hours = config.matcher.hours_per_month;
            print_section("Best overall", &recs.all, hours);
            print_section("Consumer", &recs.consumer, hours);
            print_section("Professional", &recs.professional, hours);
            print_section("Datacenter", &recs.datacenter, hours);
        }
    }

    if let Some(path) = output {
        SizingReport::new(spec, req, Some(recs)).save(&path)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

pub fn gpus(
    category: Option<Category>,
    search: Option<String>,
    popular: bool,
    catalog: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    let mut entries: Vec<&AcceleratorSpec> = match &search {
        Some(query) => catalog.search(query),
        None => catalog.iter().collect(),
    };
    if let Some(category) = category {
        entries.retain(|g| g.category == category);
    }
    if popular {
        entries.retain(|g| g.popular);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{:<18} {:<34} {:<13} {:>6} {:>9} {:>9} {:>7} {:>9}",
        "ID", "Name", "Category", "VRAM", "FP16", "INT8", "BW", "Price"
    );
    println!("{}", "─".repeat(112));
    for g in &entries {
        println!(
            "{:<18} {:<34} {:<13} {:>6} {:>9} {:>9} {:>7} {:>9}",
            g.id,
            g.name,
            g.category.as_str(),
            format!("{}GB", fmt_number(g.vram_gb, 0)),
            fmt_number(g.tflops_fp16, 1),
            fmt_number(g.tops_int8, 0),
            fmt_number(g.bandwidth_gbps, 0),
            g.known_price()
                .map_or_else(|| "—".to_string(), |p| format!("${}", fmt_number(p, 0)))
        );
    }
    println!();
    println!("{} of {} accelerators", entries.len(), catalog.len());
    Ok(())
}

pub fn ttft(
    params_b: f64,
    prompt: Vec<u64>,
    target_seconds: Option<f64>,
    points: usize,
    json: bool,
) -> Result<()> {
    if !params_b.is_finite() || params_b <= 0.0 {
        anyhow::bail!("--params-b must be a positive number, got {}", params_b);
    }
    let prompts = if prompt.is_empty() {
        DEFAULT_PROMPT_LENGTHS.to_vec()
    } else {
        prompt
    };
    let chart = chart_data(
        params_b,
        &prompts,
        llm_sizer::ttft::DEFAULT_MIN_TFLOPS,
        llm_sizer::ttft::DEFAULT_MAX_TFLOPS,
        points,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    println!("TTFT for a {}B model", fmt_number(params_b, 1));
    println!();
    for curve in &chart.curves {
        println!("Prompt {} tokens", curve.prompt_tokens);
        for p in &curve.points {
            println!(
                "  {:>8} TFLOPS  {:>9}",
                fmt_compute(p.tflops),
                format_ttft(Some(p.ttft_seconds))
            );
        }
        if let Some(target) = target_seconds {
            if let Some(needed) = required_tflops_for_ttft(params_b, curve.prompt_tokens, target) {
                println!(
                    "  Needs {} TFLOPS for {}",
                    fmt_compute(needed),
                    format_ttft(Some(target))
                );
            }
        }
        println!();
    }

    let marks: Vec<String> = thresholds()
        .iter()
        .map(|t| format!("{} ≤ {}", t.label, format_ttft(Some(t.seconds))))
        .collect();
    println!("Reference: {}", marks.join(", "));
    Ok(())
}

fn print_preset(preset: &ModelPreset) {
    let moe = preset
        .moe
        .map(|m| format!(", MoE {}×top-{}", m.num_experts, m.top_k))
        .unwrap_or_default();
    println!("  {:<14} {}", preset.id, preset.name);
    println!(
        "  {:<14} {}B ({}B active{}), {} layers, hidden {}, {} heads",
        "",
        fmt_number(preset.params_b, 1),
        fmt_number(preset.active_params_b(), 1),
        moe,
        preset.layers,
        preset.hidden_size,
        preset.heads
    );
}

pub fn models(json: bool) -> Result<()> {
    let presets: Vec<ModelPreset> = AVAILABLE_MODELS.values().cloned().collect();
    let tiers = group_by_hardware_tier(&presets);

    if json {
        println!("{}", serde_json::to_string_pretty(&tiers)?);
        return Ok(());
    }

    println!("Available model presets (int8, 8K prompt + 512 new tokens):");
    println!();
    for (title, tier) in [
        ("Consumer (< 24 GB)", &tiers.consumer),
        ("Workstation (24-80 GB)", &tiers.workstation),
        ("Infrastructure (> 80 GB)", &tiers.infrastructure),
    ] {
        if tier.is_empty() {
            continue;
        }
        println!("{}", title);
        for preset in tier {
            print_preset(preset);
        }
        println!();
    }
    Ok(())
}

pub fn report(path: PathBuf) -> Result<()> {
    let report = SizingReport::load(&path)?;
    info!(path = %path.display(), created_at = %report.created_at, "loaded sizing report");
    report.print_summary();
    Ok(())
}
