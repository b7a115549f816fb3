//! Analytical hardware sizing for LLM inference
//!
//! Estimates the GPU memory, compute throughput, memory bandwidth and
//! time-to-first-token a workload needs, then matches those requirements
//! against an accelerator catalog.
//!
//! ## Main Components
//!
//! - `model::shape`: infers missing transformer dimensions from a parameter count
//! - `requirements`: memory, prefill/decode FLOPs and bandwidth estimation
//! - `hardware`: accelerator catalog, single/multi-device matching, cloud cost
//! - `ttft`: TTFT curves across throughput
//! - `verdict`: fit status and tier summaries
//! - `config`: workload input, presets and run settings
//! - `report`: saving and loading sizing runs
//!
//! Every computation is a pure function of its inputs. The catalog is passed
//! in by the caller; nothing here reads global mutable state.

pub mod config;
pub mod hardware;
pub mod model;
pub mod report;
pub mod requirements;
pub mod ttft;
pub mod utils;
pub mod verdict;

pub use config::{Config, Precision, WorkloadError, WorkloadSpec};
pub use hardware::{find_suitable, recommend, Catalog, DeviceMode, Recommendation};
pub use requirements::{estimate, RequirementsResult};

/// Library errors
pub use anyhow::{Error, Result};
