//! Display formatting for sizing figures

const MISSING: &str = "—";

/// Fixed-point with `digits` decimals, no decimals from 1000 upward
pub fn fmt_number(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.*}", digits, value)
    }
}

/// Compute figures span many magnitudes, so precision adapts to size
pub fn fmt_compute(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let abs = value.abs();
    if abs >= 1000.0 {
        format!("{:.0}", value)
    } else if abs >= 1.0 {
        format!("{:.2}", value)
    } else if abs >= 0.01 {
        format!("{:.3}", value)
    } else {
        format!("{:.2e}", value)
    }
}

pub fn fmt_optional(value: Option<f64>, digits: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| fmt_number(v, digits))
}

pub fn format_ttft(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s > 0.0 => {
            if s < 1.0 {
                format!("{:.0}ms", s * 1000.0)
            } else if s < 60.0 {
                format!("{:.1}s", s)
            } else {
                format!("{:.1}min", s / 60.0)
            }
        }
        _ => "N/A".to_string(),
    }
}

pub fn format_flops(tflops: f64) -> String {
    if !tflops.is_finite() || tflops <= 0.0 {
        return "N/A".to_string();
    }
    if tflops >= 1000.0 {
        format!("{:.1} PFLOPs", tflops / 1000.0)
    } else if tflops >= 1.0 {
        format!("{} TFLOPs", tflops.round())
    } else {
        format!("{:.1} GFLOPs", tflops * 1000.0)
    }
}

pub fn format_bytes_gb(bytes: f64) -> String {
    format!("{} GB", fmt_number(bytes / 1e9, 2))
}
