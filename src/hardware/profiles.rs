//! Accelerator specifications and the catalog they live in

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Market segment an accelerator is sold into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Consumer,
    Professional,
    Apple,
    Datacenter,
}

impl Category {
    /// Workstation-class hardware, which includes Apple unified-memory machines
    pub fn is_professional_tier(self) -> bool {
        matches!(self, Category::Professional | Category::Apple)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Consumer => "consumer",
            Category::Professional => "professional",
            Category::Apple => "apple",
            Category::Datacenter => "datacenter",
        }
    }
}

/// Peak specification of one accelerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceleratorSpec {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub vram_gb: f64,
    #[serde(default)]
    pub tflops_fp32: f64,
    pub tflops_fp16: f64,
    #[serde(default)]
    pub tflops_bf16: Option<f64>,
    #[serde(default)]
    pub tops_int8: f64,
    #[serde(default)]
    pub tops_int4: Option<f64>,
    pub bandwidth_gbps: f64,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub cloud_hourly: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub popular: bool,
}

impl AcceleratorSpec {
    /// BF16 throughput, falling back to FP16 when unlisted
    pub fn bf16_or_fp16(&self) -> f64 {
        self.tflops_bf16
            .filter(|v| *v > 0.0)
            .unwrap_or(self.tflops_fp16)
    }

    /// INT4 throughput in TOPS, assuming twice INT8 when unlisted
    pub fn int4_or_double_int8(&self) -> f64 {
        self.tops_int4
            .filter(|v| *v > 0.0)
            .unwrap_or(self.tops_int8 * 2.0)
    }

    pub fn known_price(&self) -> Option<f64> {
        self.price_usd.filter(|p| *p > 0.0)
    }

    fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.id.to_lowercase().contains(query)
            || self
                .notes
                .as_ref()
                .is_some_and(|n| n.to_lowercase().contains(query))
    }
}

/// Immutable list of accelerator specs, injected wherever matching happens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<AcceleratorSpec>,
}

impl Catalog {
    pub fn new(entries: Vec<AcceleratorSpec>) -> Self {
        Self { entries }
    }

    /// Hand-curated catalog shipped with the crate
    pub fn builtin() -> &'static Catalog {
        &BUILTIN_CATALOG
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcceleratorSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AcceleratorSpec> {
        self.entries.iter().find(|spec| spec.id == id)
    }

    pub fn popular(&self) -> Vec<&AcceleratorSpec> {
        self.entries.iter().filter(|spec| spec.popular).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<&AcceleratorSpec> {
        self.entries
            .iter()
            .filter(|spec| spec.category == category)
            .collect()
    }

    /// Case-insensitive search over name, id and notes
    pub fn search(&self, query: &str) -> Vec<&AcceleratorSpec> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|spec| spec.matches_query(&query))
            .collect()
    }

    /// New catalog keeping consumer, professional and Apple entries and
    /// replacing everything else with `refreshed`
    pub fn with_datacenter_refresh(&self, refreshed: Vec<AcceleratorSpec>) -> Catalog {
        if refreshed.is_empty() {
            return self.clone();
        }
        let mut entries: Vec<AcceleratorSpec> = self
            .entries
            .iter()
            .filter(|spec| spec.category != Category::Datacenter)
            .cloned()
            .collect();
        debug!(
            kept = entries.len(),
            refreshed = refreshed.len(),
            "merging refreshed accelerator entries"
        );
        entries.extend(refreshed);
        Catalog { entries }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<AcceleratorSpec> =
            serde_json::from_str(json).context("invalid accelerator catalog JSON")?;
        Ok(Self { entries })
    }

    /// Load a catalog from a JSON array file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn spec(
    id: &str,
    name: &str,
    category: Category,
    vram_gb: f64,
    tflops: (f64, f64, f64),
    tops_int8: f64,
    bandwidth_gbps: f64,
    price_usd: f64,
    cloud_hourly: Option<f64>,
    notes: &str,
    popular: bool,
) -> AcceleratorSpec {
    let (fp32, fp16, bf16) = tflops;
    AcceleratorSpec {
        id: id.to_string(),
        name: name.to_string(),
        category,
        vram_gb,
        tflops_fp32: fp32,
        tflops_fp16: fp16,
        tflops_bf16: Some(bf16),
        tops_int8,
        tops_int4: None,
        bandwidth_gbps,
        price_usd: Some(price_usd),
        cloud_hourly,
        notes: Some(notes.to_string()),
        popular,
    }
}

/// Built-in accelerator catalog
#[rustfmt::skip]
pub static BUILTIN_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    use Category::*;

    Catalog::new(vec![
        // Consumer
        spec("rtx-4090", "NVIDIA RTX 4090", Consumer, 24.0, (82.6, 165.2, 165.2), 660.0, 1008.0, 1599.0, None, "Best consumer GPU for LLM inference", true),
        spec("rtx-4080", "NVIDIA RTX 4080", Consumer, 16.0, (48.7, 97.4, 97.4), 389.0, 716.0, 1199.0, None, "Strong mid-range option", true),
        spec("rtx-3090", "NVIDIA RTX 3090", Consumer, 24.0, (35.6, 71.2, 35.6), 142.0, 936.0, 699.0, None, "Previous gen, still viable for inference", true),
        spec("rtx-3080", "NVIDIA RTX 3080", Consumer, 10.0, (29.8, 59.6, 29.8), 119.0, 760.0, 499.0, None, "Budget option for small models", false),
        spec("rx-7900-xtx", "AMD Radeon RX 7900 XTX", Consumer, 24.0, (61.0, 122.0, 61.0), 244.0, 960.0, 999.0, None, "AMD consumer alternative to RTX 4090", false),
        // Datacenter
        spec("a100-80gb", "NVIDIA A100 80GB", Datacenter, 80.0, (19.5, 312.0, 312.0), 624.0, 2039.0, 15000.0, Some(4.10), "Industry standard datacenter GPU", true),
        spec("a100-40gb", "NVIDIA A100 40GB", Datacenter, 40.0, (19.5, 312.0, 312.0), 624.0, 1555.0, 11000.0, Some(2.88), "More affordable A100 variant", false),
        spec("h100-80gb", "NVIDIA H100 80GB", Datacenter, 80.0, (51.0, 989.0, 989.0), 1979.0, 3350.0, 30000.0, Some(8.50), "Latest datacenter GPU, highest performance", true),
        spec("h100-sxm5-80gb", "NVIDIA H100 SXM5 80GB", Datacenter, 80.0, (51.0, 989.0, 989.0), 1979.0, 3350.0, 35000.0, Some(9.20), "H100 with NVLink, best for multi-GPU", false),
        spec("l40s", "NVIDIA L40S", Datacenter, 48.0, (91.6, 183.2, 183.2), 733.0, 864.0, 8000.0, Some(3.20), "Balanced price/performance for inference", true),
        spec("l4", "NVIDIA L4", Datacenter, 24.0, (30.3, 121.0, 60.6), 242.0, 300.0, 4000.0, Some(1.45), "Cost-effective inference GPU", false),
        spec("v100-32gb", "NVIDIA V100 32GB", Datacenter, 32.0, (15.7, 125.0, 62.5), 250.0, 900.0, 6000.0, Some(2.48), "Older generation, still available in cloud", false),
        spec("mi250x", "AMD Instinct MI250X", Datacenter, 128.0, (47.9, 383.0, 383.0), 766.0, 3277.0, 12000.0, None, "AMD datacenter alternative", false),
        spec("mi300x", "AMD Instinct MI300X", Datacenter, 192.0, (163.0, 1307.0, 1307.0), 2614.0, 5300.0, 15000.0, Some(10.50), "Latest AMD GPU, highest VRAM", true),
        // Professional
        spec("a6000", "NVIDIA RTX A6000", Professional, 48.0, (38.7, 77.4, 77.4), 309.0, 768.0, 4500.0, None, "Workstation GPU with large VRAM", true),
        spec("a5000", "NVIDIA RTX A5000", Professional, 24.0, (27.8, 55.6, 55.6), 222.0, 768.0, 2500.0, None, "Mid-range workstation option", false),
        // Apple
        spec("mac-m2-ultra-192gb", "Mac Studio M2 Ultra (192GB)", Apple, 192.0, (27.2, 54.4, 54.4), 109.0, 800.0, 6499.0, None, "Unified memory, excellent for large context", true),
        spec("mac-m2-ultra-128gb", "Mac Studio M2 Ultra (128GB)", Apple, 128.0, (27.2, 54.4, 54.4), 109.0, 800.0, 5799.0, None, "Unified memory, good for 70B models", true),
        spec("mac-m3-max-128gb", "MacBook Pro M3 Max (128GB)", Apple, 128.0, (14.2, 28.4, 28.4), 57.0, 400.0, 4499.0, None, "Portable option with unified memory", false),
        spec("mac-m3-max-96gb", "MacBook Pro M3 Max (96GB)", Apple, 96.0, (14.2, 28.4, 28.4), 57.0, 400.0, 3999.0, None, "Portable, good for smaller models", false),
    ])
});
