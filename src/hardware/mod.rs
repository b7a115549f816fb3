pub mod cost;
pub mod matcher;
pub mod profiles;

pub use cost::{estimate_cloud_cost, CloudCost, HOURS_PER_MONTH};
pub use matcher::{
    devices_needed, find_suitable, find_suitable_with_limit, recommend, throughput_for,
    DeviceMode, Headroom, Recommendation, Recommendations, DEFAULT_MAX_DEVICES,
};
pub use profiles::{AcceleratorSpec, Catalog, Category, BUILTIN_CATALOG};
