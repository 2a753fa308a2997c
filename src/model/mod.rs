pub mod club;
pub mod session;
pub mod shot;

pub use club::{canonical_club, club_color, club_order, ClubStats, MetricRange, DEFAULT_COLOR};
pub use session::SessionSummary;
pub use shot::{sort_shots, Metric, Shot, ShotStats};
