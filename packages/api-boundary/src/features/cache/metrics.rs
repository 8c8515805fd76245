//! Prometheus metrics for the boundary cache

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

#[derive(Clone)]
pub struct BoundaryCacheMetrics {
    pub hits: IntCounter,
    pub misses: IntCounter,
    /// Boundary computations actually run (at most one per archive on success)
    pub computations: IntCounter,
    pub archives: IntGauge,
}

impl BoundaryCacheMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            hits: register_int_counter_with_registry!(
                Opts::new("boundary_cache_hits_total", "Boundary cache hits"),
                registry
            )?,
            misses: register_int_counter_with_registry!(
                Opts::new("boundary_cache_misses_total", "Boundary cache misses"),
                registry
            )?,
            computations: register_int_counter_with_registry!(
                Opts::new(
                    "boundary_cache_computations_total",
                    "Boundary computations (descriptor reads)"
                ),
                registry
            )?,
            archives: register_int_gauge_with_registry!(
                Opts::new("boundary_cache_archives", "Archives with a resolved boundary"),
                registry
            )?,
        })
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.get() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_hit_rate() {
        let registry = Registry::new();
        let metrics = BoundaryCacheMetrics::new(&registry).unwrap();
        assert_eq!(metrics.hit_rate(), 0.0);

        metrics.misses.inc();
        metrics.hits.inc_by(3);
        assert_eq!(metrics.hit_rate(), 0.75);

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"boundary_cache_computations_total".to_string()));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Registry::new();
        BoundaryCacheMetrics::new(&registry).unwrap();
        assert!(BoundaryCacheMetrics::new(&registry).is_err());
    }
}
