use serde::Serialize;

/// Shots uploaded together from one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    /// Timestamp of the first shot in the session
    pub date: String,
    pub shot_count: usize,
    pub avg_carry: f64,
}
