//! Configuration module for the offer search engine
//!
//! This module provides the `EngineConfig` struct and its builder for
//! configuring page size, geo radii and two-tier retrieval tuning with
//! validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::EngineConfigBuilder;
pub use types::EngineConfig;
