//! Sizing report persistence
//!
//! Bundles a workload with its requirements and recommendations so a run can
//! be saved, shared and reloaded.

use crate::config::workload::WorkloadSpec;
use crate::hardware::matcher::Recommendations;
use crate::requirements::RequirementsResult;
use crate::utils::format::{fmt_compute, fmt_number, fmt_optional, format_ttft};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingReport {
    pub workload: WorkloadSpec,
    pub requirements: RequirementsResult,
    pub recommendations: Option<Recommendations>,
    pub created_at: String,
}

impl SizingReport {
    pub fn new(
        workload: WorkloadSpec,
        requirements: RequirementsResult,
        recommendations: Option<Recommendations>,
    ) -> Self {
        Self {
            workload,
            requirements,
            recommendations,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Save report to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)
            .with_context(|| format!("failed to write report {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read report {}", path.as_ref().display()))?;
        let report: Self = serde_json::from_str(&json)?;
        Ok(report)
    }

    pub fn print_summary(&self) {
        let r = &self.requirements;
        println!("Sizing Report Summary:");
        println!(
            "  Model:          {}B ({}B active)",
            fmt_number(r.params_b, 1),
            fmt_number(r.active_params_b, 1)
        );
        println!(
            "  Precision:      weights {} / kv {}",
            r.weight_precision, r.kv_precision
        );
        println!("  Total VRAM:     {} GB", fmt_number(r.total_vram_gb, 2));
        println!(
            "  Throughput:     {} tok/s ({} × {})",
            fmt_number(r.total_throughput(), 1),
            r.batch_size,
            fmt_number(r.target_tps, 1)
        );
        println!("  Compute:        {} TFLOPS", fmt_compute(r.required_tflops));
        println!("  Bandwidth:      {} GB/s", fmt_number(r.required_bw_gbps(), 1));
        println!("  Effective:      {} TFLOPS", fmt_optional(r.effective_tflops, 2));
        println!("  TTFT:           {}", format_ttft(r.ttft_ms.map(|ms| ms / 1000.0)));
        if let Some(recs) = &self.recommendations {
            println!("  Suggestions:    {}", recs.all.len());
        }
        println!("  Created:        {}", self.created_at);
    }
}
