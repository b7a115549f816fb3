//! Human-readable verdicts for computed requirements

use crate::requirements::RequirementsResult;
use serde::{Deserialize, Serialize};

/// Required/available ratio at or below which a resource comfortably fits
pub const COMFORTABLE_RATIO: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    Fit,
    Warn,
    Danger,
}

impl FitStatus {
    pub fn label(self) -> &'static str {
        match self {
            FitStatus::Fit => "✓ Fits",
            FitStatus::Warn => "~ Close",
            FitStatus::Danger => "✗ Insufficient",
        }
    }
}

/// Classify `required` against `available`; `None` when availability is unknown
pub fn fit_status(required: f64, available: Option<f64>) -> Option<FitStatus> {
    let available = available.filter(|a| a.is_finite() && *a > 0.0)?;
    let ratio = required / available;
    Some(if ratio <= COMFORTABLE_RATIO {
        FitStatus::Fit
    } else if ratio <= 1.0 {
        FitStatus::Warn
    } else {
        FitStatus::Danger
    })
}

/// Hardware class implied by a VRAM requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VramTier {
    Consumer,
    HighEnd,
    Workstation,
    Datacenter,
    MultiGpu,
}

impl VramTier {
    pub fn from_gb(vram_gb: f64) -> Self {
        if vram_gb <= 12.0 {
            VramTier::Consumer
        } else if vram_gb <= 24.0 {
            VramTier::HighEnd
        } else if vram_gb <= 48.0 {
            VramTier::Workstation
        } else if vram_gb <= 80.0 {
            VramTier::Datacenter
        } else {
            VramTier::MultiGpu
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            VramTier::Consumer => "Consumer GPU friendly",
            VramTier::HighEnd => "High-end GPU recommended",
            VramTier::Workstation => "Professional / Workstation GPU needed",
            VramTier::Datacenter => "Datacenter GPU required",
            VramTier::MultiGpu => "Multi-GPU setup required",
        }
    }

    pub fn examples(self) -> &'static str {
        match self {
            VramTier::Consumer => "RTX 4070, RTX 3060 (12GB), RX 7800 XT",
            VramTier::HighEnd => "RTX 4090, RTX 3090, A5000, Mac Studio Ultra",
            VramTier::Workstation => "RTX A6000, 2× RTX 3090, 2× A5000",
            VramTier::Datacenter => "A100 (80GB), H100 (80GB), 2× A6000",
            VramTier::MultiGpu => "MI300X (192GB), 2× H100, multi-GPU cluster",
        }
    }

    /// Overall status a tier maps to
    pub fn status(self) -> FitStatus {
        match self {
            VramTier::Consumer | VramTier::HighEnd => FitStatus::Fit,
            VramTier::Workstation | VramTier::Datacenter => FitStatus::Warn,
            VramTier::MultiGpu => FitStatus::Danger,
        }
    }
}

pub fn vram_summary(vram_gb: f64) -> &'static str {
    match vram_gb {
        v if v <= 8.0 => "Fits on entry-level gaming GPUs",
        v if v <= 12.0 => "Works on mid-range GPUs",
        v if v <= 16.0 => "Needs high-end consumer GPU",
        v if v <= 24.0 => "Requires enthusiast or pro GPU",
        v if v <= 48.0 => "Needs professional workstation card",
        v if v <= 80.0 => "Requires datacenter GPU",
        _ => "Needs multi-GPU setup",
    }
}

pub fn compute_summary(tflops: f64) -> &'static str {
    match tflops {
        t if t <= 30.0 => "Light compute requirements",
        t if t <= 60.0 => "Moderate compute needs",
        t if t <= 100.0 => "High compute requirements",
        t if t <= 200.0 => "Very demanding workload",
        _ => "Extreme compute needed",
    }
}

pub fn bandwidth_summary(gbps: f64) -> &'static str {
    match gbps {
        b if b <= 400.0 => "Light bandwidth usage",
        b if b <= 900.0 => "Moderate bandwidth needs",
        b if b <= 2000.0 => "High bandwidth required",
        b if b <= 3000.0 => "Very high bandwidth demand",
        _ => "Extreme bandwidth required",
    }
}

/// Collected verdict for one estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub tier: VramTier,
    pub vram: &'static str,
    pub compute: &'static str,
    pub bandwidth: &'static str,
    pub compute_fit: Option<FitStatus>,
    pub bandwidth_fit: Option<FitStatus>,
}

impl Verdict {
    pub fn for_requirements(req: &RequirementsResult) -> Self {
        Self {
            tier: VramTier::from_gb(req.total_vram_gb),
            vram: vram_summary(req.total_vram_gb),
            compute: compute_summary(req.required_tflops),
            bandwidth: bandwidth_summary(req.required_bw_gbps()),
            compute_fit: fit_status(req.required_tflops, req.effective_tflops),
            bandwidth_fit: fit_status(req.required_bw_gbps(), req.effective_bw_gbps),
        }
    }
}
