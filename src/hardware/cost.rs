//! Rental cost projection for recommended configurations

use crate::hardware::matcher::Recommendation;
use serde::{Deserialize, Serialize};

/// Hours in an average month of continuous use
pub const HOURS_PER_MONTH: f64 = 730.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudCost {
    pub hourly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

/// Cloud rental cost of a configuration, `None` when no hourly rate is known
pub fn estimate_cloud_cost(rec: &Recommendation, hours_per_month: f64) -> Option<CloudCost> {
    let rate = rec.spec.cloud_hourly.filter(|r| *r > 0.0)?;
    let hourly = rate * f64::from(rec.count.max(1));
    let monthly = hourly * hours_per_month;

    Some(CloudCost {
        hourly,
        monthly,
        yearly: monthly * 12.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workload::WorkloadSpec;
    use crate::hardware::matcher::{find_suitable, DeviceMode};
    use crate::hardware::profiles::Catalog;
    use crate::requirements::estimate;

    #[test]
    fn test_cloud_cost_scales_with_count() {
        let mut req = estimate(&WorkloadSpec::new(1.0)).unwrap();
        req.total_vram_gb = 150.0;
        let catalog = Catalog::new(vec![Catalog::builtin().get("a100-80gb").unwrap().clone()]);
        let rec = &find_suitable(&req, &catalog, DeviceMode::Multi)[0];
        assert_eq!(rec.count, 2);

        let cost = estimate_cloud_cost(rec, HOURS_PER_MONTH).unwrap();
        assert!((cost.hourly - 8.2).abs() < 1e-9);
        assert!((cost.monthly - 8.2 * 730.0).abs() < 1e-6);
        assert!((cost.yearly - 8.2 * 730.0 * 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_hourly_rate() {
        let req = estimate(&WorkloadSpec::new(1.0)).unwrap();
        let catalog = Catalog::new(vec![Catalog::builtin().get("rtx-4090").unwrap().clone()]);
        let rec = &find_suitable(&req, &catalog, DeviceMode::Single)[0];
        assert_eq!(estimate_cloud_cost(rec, HOURS_PER_MONTH), None);
    }
}
