//! Time-to-first-token projections across hardware throughput
//!
//! A simplified prefill model (`2 · prompt · params` FLOPs, no attention term
//! and no fixed overhead) used to sweep TTFT against compute. For the full
//! per-workload figure see [`crate::requirements::estimate`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROMPT_LENGTHS: [u64; 3] = [2048, 4096, 8192];
pub const DEFAULT_MIN_TFLOPS: f64 = 50.0;
pub const DEFAULT_MAX_TFLOPS: f64 = 2000.0;
pub const DEFAULT_POINTS: usize = 50;

fn prefill_flops(params_b: f64, prompt_tokens: u64) -> f64 {
    2.0 * prompt_tokens as f64 * params_b * 1e9
}

/// TTFT in seconds, `None` without usable throughput
pub fn ttft_seconds(params_b: f64, prompt_tokens: u64, tflops: f64) -> Option<f64> {
    if !tflops.is_finite() || tflops <= 0.0 {
        return None;
    }
    Some(prefill_flops(params_b, prompt_tokens) / (tflops * 1e12))
}

/// TFLOPS needed to reach `target_seconds`, `None` for a non-positive target
pub fn required_tflops_for_ttft(
    params_b: f64,
    prompt_tokens: u64,
    target_seconds: f64,
) -> Option<f64> {
    if !target_seconds.is_finite() || target_seconds <= 0.0 {
        return None;
    }
    Some(prefill_flops(params_b, prompt_tokens) / (target_seconds * 1e12))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TtftPoint {
    pub tflops: f64,
    pub ttft_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtftCurve {
    pub prompt_tokens: u64,
    pub points: Vec<TtftPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtftChart {
    pub params_b: f64,
    pub min_tflops: f64,
    pub max_tflops: f64,
    pub curves: Vec<TtftCurve>,
}

/// One curve per prompt length, sampled at log-spaced throughput values
pub fn chart_data(
    params_b: f64,
    prompt_lengths: &[u64],
    min_tflops: f64,
    max_tflops: f64,
    points: usize,
) -> TtftChart {
    let samples: Vec<f64> = match points {
        0 => Vec::new(),
        1 => vec![min_tflops],
        n => (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                min_tflops * (max_tflops / min_tflops).powf(t)
            })
            .collect(),
    };

    let curves = prompt_lengths
        .iter()
        .map(|&prompt_tokens| TtftCurve {
            prompt_tokens,
            points: samples
                .iter()
                .filter_map(|&tflops| {
                    ttft_seconds(params_b, prompt_tokens, tflops)
                        .map(|ttft_seconds| TtftPoint { tflops, ttft_seconds })
                })
                .collect(),
        })
        .collect();

    TtftChart {
        params_b,
        min_tflops,
        max_tflops,
        curves,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TtftThreshold {
    pub seconds: f64,
    pub label: &'static str,
}

/// Reference latencies for reading TTFT charts
pub fn thresholds() -> [TtftThreshold; 3] {
    [
        TtftThreshold { seconds: 1.0, label: "Instant" },
        TtftThreshold { seconds: 3.0, label: "Acceptable" },
        TtftThreshold { seconds: 10.0, label: "Baseline" },
    ]
}
