//! Per-club statistics over the active shot selection

pub mod aggregate;
pub mod outliers;

pub use aggregate::calculate_club_stats;
pub use outliers::{filter_outliers, OutlierConfig};
