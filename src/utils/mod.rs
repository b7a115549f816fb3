pub mod format;

pub use format::{
    fmt_compute, fmt_number, fmt_optional, format_bytes_gb, format_flops, format_ttft,
};
