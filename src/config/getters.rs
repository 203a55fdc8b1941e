//! Getter methods for `EngineConfig`

use super::types::EngineConfig;

impl EngineConfig {
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn default_geo_radius_km(&self) -> f64 {
        self.default_geo_radius_km
    }

    #[must_use]
    pub fn max_service_radius_km(&self) -> f64 {
        self.max_service_radius_km
    }

    #[must_use]
    pub fn full_fetch_threshold(&self) -> usize {
        self.full_fetch_threshold
    }

    #[must_use]
    pub fn scan_batch_size(&self) -> usize {
        self.scan_batch_size
    }

    /// Window used per store call when scanning the all-matches set.
    ///
    /// Never smaller than two pages, so a single round usually covers a page
    /// even when half of the window belongs to the title tier.
    #[must_use]
    pub fn scan_window(&self) -> usize {
        self.scan_batch_size.max(self.page_size.saturating_mul(2))
    }
}
