//! Transformer shape inference from a parameter count
//!
//! Fills in any missing architectural dimensions with the usual dense
//! transformer rule of thumb: total parameters ≈ 12 · layers · hidden².

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Hidden sizes are aligned to this many elements
pub const HIDDEN_ALIGNMENT: u32 = 64;
/// Per-head dimension the head-count heuristic aims for
pub const TARGET_HEAD_DIM: f64 = 128.0;
pub const MIN_HEADS: u32 = 8;
pub const MIN_HEAD_DIM: u32 = 16;

/// Optional architecture overrides supplied by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeHints {
    pub layers: Option<u32>,
    pub hidden_size: Option<u32>,
    pub heads: Option<u32>,
}

/// Fully populated transformer dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedShape {
    pub layers: u32,
    pub hidden_size: u32,
    pub heads: u32,
    pub head_dim: u32,
}

/// Layer count by model size when no hint is given
pub fn estimate_layers(params_b: f64) -> u32 {
    if params_b >= 60.0 {
        80
    } else if params_b >= 30.0 {
        64
    } else if params_b >= 12.0 {
        48
    } else {
        32
    }
}

/// Round up to a multiple of [`HIDDEN_ALIGNMENT`], never below one block
fn align_up(value: f64) -> u32 {
    let base = f64::from(HIDDEN_ALIGNMENT);
    let blocks = (value / base).ceil().max(1.0);
    (blocks * base) as u32
}

pub fn estimate_hidden_size(params_b: f64, layers: u32) -> u32 {
    let hidden = (params_b * 1e9 / (12.0 * f64::from(layers.max(1)))).sqrt();
    align_up(hidden)
}

pub fn estimate_heads(hidden_size: u32) -> u32 {
    let heads = (f64::from(hidden_size) / TARGET_HEAD_DIM).round() as u32;
    heads.max(MIN_HEADS)
}

/// Resolve every dimension, preferring the caller's hints
pub fn resolve(params_b: f64, hints: &ShapeHints) -> ResolvedShape {
    let params_b = if params_b.is_finite() && params_b > 0.0 {
        params_b
    } else {
        warn!(params_b, "non-positive parameter count, clamping shape to minimum");
        0.0
    };

    let layers = hints
        .layers
        .filter(|&v| v > 0)
        .unwrap_or_else(|| estimate_layers(params_b));
    let hidden_size = hints
        .hidden_size
        .filter(|&v| v > 0)
        .unwrap_or_else(|| estimate_hidden_size(params_b, layers));
    let heads = hints
        .heads
        .filter(|&v| v > 0)
        .unwrap_or_else(|| estimate_heads(hidden_size));
    let head_dim = ((f64::from(hidden_size) / f64::from(heads)).round() as u32).max(MIN_HEAD_DIM);

    let shape = ResolvedShape {
        layers,
        hidden_size,
        heads,
        head_dim,
    };
    debug!(?shape, params_b, "resolved model shape");
    shape
}
