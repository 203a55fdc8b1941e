//! Fluent builder for `EngineConfig`
//!
//! Every field has a default, so `EngineConfig::builder().build()` is valid.
//! Validation happens once in `build()`.

use anyhow::{Result, anyhow};

use super::types::EngineConfig;

#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    pub(crate) page_size: Option<usize>,
    pub(crate) default_geo_radius_km: Option<f64>,
    pub(crate) max_service_radius_km: Option<f64>,
    pub(crate) full_fetch_threshold: Option<usize>,
    pub(crate) scan_batch_size: Option<usize>,
}

impl EngineConfig {
    /// Create a builder for configuring an `EngineConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl EngineConfigBuilder {
    /// Set the number of offers per result page
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the radius used when coordinates arrive without one
    #[must_use]
    pub fn default_geo_radius_km(mut self, radius_km: f64) -> Self {
        self.default_geo_radius_km = Some(radius_km);
        self
    }

    /// Set the upper bound on any offer's own service radius
    ///
    /// The bounding box sent to the store is widened by this amount.
    ///
    /// # Example
    /// ```rust
    /// # use kodegen_offer_search::config::EngineConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = EngineConfig::builder()
    ///     .max_service_radius_km(250.0)
    ///     .build()?;
    /// assert_eq!(config.max_service_radius_km(), 250.0);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn max_service_radius_km(mut self, radius_km: f64) -> Self {
        self.max_service_radius_km = Some(radius_km);
        self
    }

    /// Set the all-matches count at or below which both tiers are fetched in full
    ///
    /// Set to 0 to always window through the store.
    #[must_use]
    pub fn full_fetch_threshold(mut self, threshold: usize) -> Self {
        self.full_fetch_threshold = Some(threshold);
        self
    }

    /// Set the minimum scan window for description-only retrieval
    #[must_use]
    pub fn scan_batch_size(mut self, batch_size: usize) -> Self {
        self.scan_batch_size = Some(batch_size);
        self
    }

    pub fn build(self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();

        let page_size = self.page_size.unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(anyhow!("page_size must be greater than zero"));
        }

        let default_geo_radius_km = self
            .default_geo_radius_km
            .unwrap_or(defaults.default_geo_radius_km);
        if !default_geo_radius_km.is_finite() || default_geo_radius_km <= 0.0 {
            return Err(anyhow!(
                "default_geo_radius_km must be a positive number, got {default_geo_radius_km}"
            ));
        }

        let max_service_radius_km = self
            .max_service_radius_km
            .unwrap_or(defaults.max_service_radius_km);
        if !max_service_radius_km.is_finite() || max_service_radius_km < 0.0 {
            return Err(anyhow!(
                "max_service_radius_km must be a non-negative number, got {max_service_radius_km}"
            ));
        }

        let scan_batch_size = self.scan_batch_size.unwrap_or(defaults.scan_batch_size);
        if scan_batch_size == 0 {
            return Err(anyhow!("scan_batch_size must be greater than zero"));
        }

        Ok(EngineConfig {
            page_size,
            default_geo_radius_km,
            max_service_radius_km,
            full_fetch_threshold: self
                .full_fetch_threshold
                .unwrap_or(defaults.full_fetch_threshold),
            scan_batch_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.default_geo_radius_km(), 50.0);
        assert_eq!(config.max_service_radius_km(), 500.0);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(EngineConfig::builder().page_size(0).build().is_err());
    }

    #[test]
    fn test_invalid_radii_rejected() {
        assert!(EngineConfig::builder().default_geo_radius_km(0.0).build().is_err());
        assert!(EngineConfig::builder().default_geo_radius_km(f64::NAN).build().is_err());
        assert!(EngineConfig::builder().max_service_radius_km(-1.0).build().is_err());
        assert!(EngineConfig::builder().max_service_radius_km(0.0).build().is_ok());
    }

    #[test]
    fn test_scan_window_is_at_least_two_pages() {
        let config = EngineConfig::builder()
            .page_size(40)
            .scan_batch_size(10)
            .build()
            .unwrap();
        assert_eq!(config.scan_window(), 80);

        let config = EngineConfig::builder()
            .page_size(5)
            .scan_batch_size(64)
            .build()
            .unwrap();
        assert_eq!(config.scan_window(), 64);
    }
}
