//! Data models for the banner and chart renderers
//!
//! Plain structs only; the drawing lives in `services`.

pub mod banner;
pub mod chart;

// Re-export commonly used types for convenience
pub use banner::{Hexagon, Particle, ShieldGlow};
pub use chart::{ChartPlan, ChartRequest, Horizons, PriceEntry, PricePoint, PriceRange, Predictions, TrendOverlay};
