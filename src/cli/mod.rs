pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use llm_sizer::config::Precision;
use llm_sizer::hardware::Category;
use llm_sizer::ttft::DEFAULT_POINTS;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "llm-sizer")]
#[command(about = "Estimate the hardware needed to serve an LLM", long_about = None)]
struct Cli {
    /// JSON config with estimator defaults and matcher settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Workload description shared by `estimate` and `recommend`
#[derive(Args, Debug, Default)]
pub struct WorkloadArgs {
    /// Load the workload from a JSON file; flags below override it
    #[arg(long)]
    pub workload: Option<PathBuf>,
    /// Model preset id or HuggingFace name (size parsed from the name)
    #[arg(long)]
    pub model: Option<String>,
    /// Total parameters in billions
    #[arg(long)]
    pub params_b: Option<f64>,
    /// Parameters active per token (MoE)
    #[arg(long)]
    pub active_params_b: Option<f64>,
    #[arg(long, value_enum)]
    pub weight_precision: Option<Precision>,
    #[arg(long, value_enum)]
    pub kv_precision: Option<Precision>,
    #[arg(long)]
    pub layers: Option<u32>,
    #[arg(long)]
    pub hidden_size: Option<u32>,
    #[arg(long)]
    pub heads: Option<u32>,
    #[arg(long)]
    pub prompt_tokens: Option<u64>,
    #[arg(long)]
    pub new_tokens: Option<u64>,
    #[arg(long)]
    pub batch_size: Option<u32>,
    /// Output tokens/second per stream
    #[arg(long)]
    pub target_tps: Option<f64>,
    #[arg(long)]
    pub ttft_budget_ms: Option<f64>,
    #[arg(long)]
    pub util_compute: Option<f64>,
    #[arg(long)]
    pub util_bandwidth: Option<f64>,
    #[arg(long)]
    pub peak_tflops: Option<f64>,
    #[arg(long)]
    pub peak_tops: Option<f64>,
    /// Memory bandwidth in GB/s
    #[arg(long)]
    pub mem_bandwidth: Option<f64>,
    /// Take hardware peaks from this catalog entry
    #[arg(long)]
    pub gpu: Option<String>,
    #[arg(long, default_value = "1")]
    pub gpu_count: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute memory, compute and bandwidth requirements
    Estimate {
        #[command(flatten)]
        workload: WorkloadArgs,
        /// Accelerator catalog JSON (defaults to the built-in list)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Save a report to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Recommend hardware configurations for a workload
    Recommend {
        #[command(flatten)]
        workload: WorkloadArgs,
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Refresh datacenter entries from this JSON file
        #[arg(long)]
        datacenter: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List or search the accelerator catalog
    Gpus {
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        popular: bool,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// TTFT across hardware throughput for several prompt lengths
    Ttft {
        #[arg(long)]
        params_b: f64,
        /// Prompt lengths (comma-separated)
        #[arg(long, value_delimiter = ',')]
        prompt: Vec<u64>,
        /// Also report the TFLOPS needed for this TTFT in seconds
        #[arg(long)]
        target_seconds: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_POINTS)]
        points: usize,
        #[arg(long)]
        json: bool,
    },
    /// List the built-in model presets grouped by hardware tier
    Models {
        #[arg(long)]
        json: bool,
    },
    /// Print the summary of a saved sizing report
    Report {
        /// Report written by `estimate --output` or `recommend --output`
        path: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Estimate {
            workload,
            catalog,
            json,
            output,
        } => commands::estimate(&config, &workload, catalog, json, output),
        Commands::Recommend {
            workload,
            catalog,
            datacenter,
            json,
            output,
        } => commands::recommend(&config, &workload, catalog, datacenter, json, output),
        Commands::Gpus {
            category,
            search,
            popular,
            catalog,
            json,
        } => commands::gpus(category, search, popular, catalog, json),
        Commands::Ttft {
            params_b,
            prompt,
            target_seconds,
            points,
            json,
        } => commands::ttft(params_b, prompt, target_seconds, points, json),
        Commands::Models { json } => commands::models(json),
        Commands::Report { path } => commands::report(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttft_points_default() {
        let cli = Cli::try_parse_from(["llm-sizer", "ttft", "--params-b", "7"]).unwrap();
        match cli.command {
            Commands::Ttft { points, prompt, .. } => {
                assert_eq!(points, DEFAULT_POINTS);
                assert!(prompt.is_empty());
            }
            _ => panic!("expected ttft command"),
        }
    }

    #[test]
    fn test_report_command_parses() {
        let cli = Cli::try_parse_from(["llm-sizer", "report", "run.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report { path } if path == PathBuf::from("run.json")
        ));
    }
}
