//! Matching workload requirements against an accelerator catalog

use crate::config::precision::Precision;
use crate::config::MatcherConfig;
use crate::hardware::profiles::{AcceleratorSpec, Catalog, Category};
use crate::requirements::{RequirementsResult, INT_OPS_PER_TFLOP};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Largest device count a multi-device configuration may use by default
pub const DEFAULT_MAX_DEVICES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    Single,
    Multi,
}

/// Available minus required capacity for a configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Headroom {
    pub vram_gb: f64,
    pub tflops: f64,
    pub bandwidth_gbps: f64,
}

/// A catalog entry that satisfies the requirements, with its device count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub spec: AcceleratorSpec,
    pub count: u32,
    /// Throughput of one device at the workload's weight precision
    pub per_device_tflops: f64,
    /// Throughput of the whole configuration
    pub effective_tflops: f64,
    pub total_vram_gb: f64,
    pub total_bandwidth_gbps: f64,
    pub total_cost: Option<f64>,
    pub headroom: Headroom,
}

impl Recommendation {
    fn new(
        spec: &AcceleratorSpec,
        count: u32,
        per_device_tflops: f64,
        req: &RequirementsResult,
    ) -> Self {
        let n = f64::from(count);
        let total_vram_gb = spec.vram_gb * n;
        let effective_tflops = per_device_tflops * n;
        let total_bandwidth_gbps = spec.bandwidth_gbps * n;

        Self {
            spec: spec.clone(),
            count,
            per_device_tflops,
            effective_tflops,
            total_vram_gb,
            total_bandwidth_gbps,
            total_cost: spec.known_price().map(|price| price * n),
            headroom: Headroom {
                vram_gb: total_vram_gb - req.total_vram_gb,
                tflops: effective_tflops - req.required_tflops,
                bandwidth_gbps: total_bandwidth_gbps - req.required_bw_gbps(),
            },
        }
    }

    pub fn category(&self) -> Category {
        self.spec.category
    }

    /// Display name, prefixed with the device count for multi-device setups
    pub fn label(&self) -> String {
        if self.count > 1 {
            format!("{}× {}", self.count, self.spec.name)
        } else {
            self.spec.name.clone()
        }
    }
}

/// Recommendations grouped by market segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub consumer: Vec<Recommendation>,
    pub professional: Vec<Recommendation>,
    pub datacenter: Vec<Recommendation>,
    pub all: Vec<Recommendation>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
            && self.professional.is_empty()
            && self.datacenter.is_empty()
            && self.all.is_empty()
    }
}

/// Per-device throughput (TFLOPS or TFLOPS-equivalent) for a weight precision
pub fn throughput_for(spec: &AcceleratorSpec, precision: Precision) -> f64 {
    match precision {
        Precision::Int8 => spec.tops_int8 / INT_OPS_PER_TFLOP,
        Precision::Int4 => spec.int4_or_double_int8() / INT_OPS_PER_TFLOP,
        Precision::Fp8 => spec.tflops_fp16,
        Precision::Bf16 => spec.bf16_or_fp16(),
        Precision::Fp16 => spec.tflops_fp16,
    }
}

/// Devices needed to cover `required` with `per_device` each
///
/// `Some(0)` when nothing is required, `None` when the device has no
/// capacity in a demanded dimension.
pub fn devices_needed(required: f64, per_device: f64) -> Option<u32> {
    if required <= 0.0 {
        return Some(0);
    }
    if !per_device.is_finite() || per_device <= 0.0 {
        return None;
    }
    let n = (required / per_device).ceil();
    n.is_finite().then_some(n as u32)
}

fn satisfies_single(spec: &AcceleratorSpec, throughput: f64, req: &RequirementsResult) -> bool {
    spec.vram_gb >= req.total_vram_gb
        && throughput >= req.required_tflops
        && spec.bandwidth_gbps >= req.required_bw_gbps()
}

/// Cost when both sides are priced, otherwise fewer devices then more throughput
fn compare_recommendations(a: &Recommendation, b: &Recommendation) -> Ordering {
    let fallback = || {
        a.count
            .cmp(&b.count)
            .then_with(|| b.effective_tflops.total_cmp(&a.effective_tflops))
    };
    match (a.total_cost, b.total_cost) {
        (Some(cost_a), Some(cost_b)) => cost_a.total_cmp(&cost_b).then_with(fallback),
        _ => fallback(),
    }
}

/// Order recommendations cheapest first
///
/// Priced and unpriced entries are sorted separately and then merged with the
/// pairwise rule, which keeps the ordering total for mixed catalogs.
fn rank(found: Vec<Recommendation>) -> Vec<Recommendation> {
    let (mut priced, mut unpriced): (Vec<_>, Vec<_>) =
        found.into_iter().partition(|r| r.total_cost.is_some());
    priced.sort_by(compare_recommendations);
    unpriced.sort_by(compare_recommendations);

    let mut ranked = Vec::with_capacity(priced.len() + unpriced.len());
    let mut priced = priced.into_iter().peekable();
    let mut unpriced = unpriced.into_iter().peekable();
    loop {
        let take_priced = match (priced.peek(), unpriced.peek()) {
            (Some(p), Some(u)) => compare_recommendations(p, u) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_priced { priced.next() } else { unpriced.next() };
        ranked.extend(next);
    }
    ranked
}

/// Catalog entries able to serve the requirements, cheapest first
pub fn find_suitable(
    req: &RequirementsResult,
    catalog: &Catalog,
    mode: DeviceMode,
) -> Vec<Recommendation> {
    find_suitable_with_limit(req, catalog, mode, DEFAULT_MAX_DEVICES)
}

pub fn find_suitable_with_limit(
    req: &RequirementsResult,
    catalog: &Catalog,
    mode: DeviceMode,
    max_devices: u32,
) -> Vec<Recommendation> {
    let mut found = Vec::new();

    for spec in catalog.iter() {
        let throughput = throughput_for(spec, req.weight_precision);

        match mode {
            DeviceMode::Single => {
                if satisfies_single(spec, throughput, req) {
                    found.push(Recommendation::new(spec, 1, throughput, req));
                }
            }
            DeviceMode::Multi => {
                let needed = [
                    devices_needed(req.total_vram_gb, spec.vram_gb),
                    devices_needed(req.required_tflops, throughput),
                    devices_needed(req.required_bw_gbps(), spec.bandwidth_gbps),
                ]
                .into_iter()
                .try_fold(1u32, |acc, n| n.map(|n| acc.max(n)));

                match needed {
                    Some(count) if count <= max_devices => {
                        found.push(Recommendation::new(spec, count, throughput, req));
                    }
                    other => {
                        debug!(id = %spec.id, needed = ?other, max_devices, "configuration too large");
                    }
                }
            }
        }
    }

    debug!(?mode, matches = found.len(), "searched accelerator catalog");
    rank(found)
}

fn pick<'a>(
    pool: impl Iterator<Item = &'a Recommendation>,
    limit: usize,
    keep: impl Fn(&Recommendation) -> bool,
) -> Vec<Recommendation> {
    pool.filter(|r| keep(r)).take(limit).cloned().collect()
}

/// Top picks per segment plus a combined shortlist
///
/// An empty bundle is a valid answer: nothing in the catalog fits.
pub fn recommend(
    req: &RequirementsResult,
    catalog: &Catalog,
    config: &MatcherConfig,
) -> Recommendations {
    let single: Vec<Recommendation> = find_suitable_with_limit(
        req,
        catalog,
        DeviceMode::Single,
        config.max_devices,
    )
    .into_iter()
    .take(config.top_n)
    .collect();
    let multi: Vec<Recommendation> =
        find_suitable_with_limit(req, catalog, DeviceMode::Multi, config.max_devices)
            .into_iter()
            .take(config.top_n)
            .collect();

    let limit = config.per_category;
    let consumer = pick(single.iter(), limit, |r| r.category() == Category::Consumer);
    let professional = pick(single.iter(), limit, |r| r.category().is_professional_tier());
    let datacenter = pick(single.iter().chain(multi.iter()), limit, |r| {
        r.category() == Category::Datacenter
    });

    let mut all = single.clone();
    all.extend(multi.into_iter().take(config.multi_in_all));

    Recommendations {
        consumer,
        professional,
        datacenter,
        all,
    }
}
