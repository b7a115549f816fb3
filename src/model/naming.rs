//! Parameter-count detection from model names

use once_cell::sync::Lazy;
use regex::Regex;

static MODEL_SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)[-_]?b(?:illion)?\b").expect("model size pattern is valid")
});

/// Detect size category and parameter count (billions) from a model id
///
/// Returns `("small", 0.0)` when no size token is present.
pub fn detect_model_size(model_path: &str) -> (String, f64) {
    let model_name = model_path
        .rsplit('/')
        .next()
        .unwrap_or(model_path)
        .to_lowercase();

    let params_b = MODEL_SIZE_PATTERN
        .captures(&model_name)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0);

    (size_category(params_b).to_string(), params_b)
}

pub fn size_category(params_b: f64) -> &'static str {
    if params_b <= 10.0 {
        "small"
    } else if params_b <= 20.0 {
        "medium"
    } else if params_b <= 50.0 {
        "large"
    } else {
        "xlarge"
    }
}
