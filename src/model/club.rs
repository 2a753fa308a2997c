use super::shot::{Metric, Shot, ShotStats};
use serde::Serialize;

/// Color used for clubs missing from the color table
pub const DEFAULT_COLOR: &str = "#475569";

/// Bag order: driver, woods, hybrids, irons by ascending loft, wedges
const CLUB_ORDER: [&str; 23] = [
    "Driver", "3W", "4W", "5W", "7W", "2H", "3H", "4H", "5H", "2I", "3I", "4I", "5I", "6I", "7I",
    "8I", "9I", "PW", "AW", "GW", "SW", "LW", "UW",
];

const CLUB_COLORS: [(&str, &str); 16] = [
    ("Driver", "#ef4444"),
    ("3W", "#f97316"),
    ("5W", "#f59e0b"),
    ("3H", "#84cc16"),
    ("4H", "#10b981"),
    ("3I", "#06b6d4"),
    ("4I", "#3b82f6"),
    ("5I", "#6366f1"),
    ("6I", "#8b5cf6"),
    ("7I", "#a855f7"),
    ("8I", "#d946ef"),
    ("9I", "#ec4899"),
    ("PW", "#f43f5e"),
    ("GW", "#64748b"),
    ("SW", "#94a3b8"),
    ("LW", "#cbd5e1"),
];

/// Canonicalize a club name as written by the launch monitor into a short code
/// (`"7 Iron"` -> `"7I"`, `"Pitching Wedge"` -> `"PW"`, `"Driver"` -> `"Driver"`).
///
/// Returns `None` when nothing is left after trimming.
pub fn canonical_club(name: &str) -> Option<String> {
    let upper = name.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }

    let alias = match upper.as_str() {
        "DRIVER" | "1 WOOD" => Some("Driver"),
        "PITCHING WEDGE" => Some("PW"),
        "APPROACH WEDGE" => Some("AW"),
        "GAP WEDGE" => Some("GW"),
        "SAND WEDGE" => Some("SW"),
        "LOB WEDGE" => Some("LW"),
        "UTILITY WEDGE" => Some("UW"),
        "3 IRON" => Some("3I"),
        "4 IRON" => Some("4I"),
        "5 IRON" => Some("5I"),
        "6 IRON" => Some("6I"),
        "7 IRON" => Some("7I"),
        "8 IRON" => Some("8I"),
        "9 IRON" => Some("9I"),
        "3 WOOD" => Some("3W"),
        "5 WOOD" => Some("5W"),
        _ => None,
    };
    if let Some(code) = alias {
        return Some(code.to_string());
    }

    let code: String = upper
        .replace("IRON", "I")
        .replace("WOOD", "W")
        .replace("HYBRID", "H")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Position in the bag order, `None` for clubs outside it
pub fn club_order(club: &str) -> Option<usize> {
    CLUB_ORDER.iter().position(|c| *c == club)
}

pub fn club_color(club: &str) -> &'static str {
    CLUB_COLORS
        .iter()
        .find(|(c, _)| *c == club)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Low, average and high of one metric for a club
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRange {
    pub metric: Metric,
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

/// Per-club aggregate over the active shot selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubStats {
    pub club: String,
    /// Shots remaining after outlier filtering
    pub count: usize,
    pub averages: ShotStats,
    pub highs: ShotStats,
    pub lows: ShotStats,
    pub color: String,
    /// Every shot hit with this club, before filtering
    pub shots: Vec<Shot>,
}

impl ClubStats {
    pub fn raw_count(&self) -> usize {
        self.shots.len()
    }

    /// Front-to-back spread of the filtered carries
    pub fn carry_spread(&self) -> f64 {
        self.highs.carry_distance - self.lows.carry_distance
    }

    /// Left-to-right spread of the filtered carry deviations
    pub fn offline_spread(&self) -> f64 {
        (self.highs.offline - self.lows.offline).abs()
    }

    /// Carry spread as a fraction of the average carry, 0 when there is no carry
    pub fn carry_volatility(&self) -> f64 {
        if self.averages.carry_distance > 0.0 {
            self.carry_spread() / self.averages.carry_distance
        } else {
            0.0
        }
    }

    /// Depth consistency score in percent (100 = every carry identical)
    pub fn consistency(&self) -> f64 {
        100.0 - self.carry_volatility() * 100.0
    }

    /// Every metric's filtered range, in [`Metric::ALL`] order
    pub fn ranges(&self) -> Vec<MetricRange> {
        Metric::ALL
            .iter()
            .map(|&metric| MetricRange {
                metric,
                low: self.lows.get(metric),
                average: self.averages.get(metric),
                high: self.highs.get(metric),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_club_aliases() {
        assert_eq!(canonical_club("Pitching Wedge").as_deref(), Some("PW"));
        assert_eq!(canonical_club("  7 Iron ").as_deref(), Some("7I"));
        assert_eq!(canonical_club("3 Wood").as_deref(), Some("3W"));
        assert_eq!(canonical_club("driver").as_deref(), Some("Driver"));
    }

    #[test]
    fn test_canonical_club_suffix_contraction() {
        assert_eq!(canonical_club("4 Hybrid").as_deref(), Some("4H"));
        assert_eq!(canonical_club("2 iron").as_deref(), Some("2I"));
        assert_eq!(canonical_club("7 Wood").as_deref(), Some("7W"));
        assert_eq!(canonical_club("7I").as_deref(), Some("7I"));
        assert_eq!(canonical_club("60 deg").as_deref(), Some("60DEG"));
    }

    #[test]
    fn test_canonical_club_empty() {
        assert_eq!(canonical_club(""), None);
        assert_eq!(canonical_club("   "), None);
    }

    #[test]
    fn test_club_order_and_color() {
        assert!(club_order("Driver") < club_order("3W"));
        assert!(club_order("4H") < club_order("3I"));
        assert!(club_order("9I") < club_order("PW"));
        assert!(club_order("PW") < club_order("LW"));
        assert_eq!(club_order("Putter"), None);
        assert_eq!(club_color("7I"), "#a855f7");
        assert_eq!(club_color("Putter"), DEFAULT_COLOR);
    }

    #[test]
    fn test_ranges_cover_every_metric() {
        let stats = ClubStats {
            club: "7I".to_string(),
            count: 3,
            averages: ShotStats {
                carry_distance: 160.0,
                spin_rate: 6900.0,
                ..Default::default()
            },
            highs: ShotStats {
                carry_distance: 168.0,
                spin_rate: 7400.0,
                ..Default::default()
            },
            lows: ShotStats {
                carry_distance: 151.0,
                spin_rate: 6300.0,
                ..Default::default()
            },
            color: club_color("7I").to_string(),
            shots: Vec::new(),
        };

        let ranges = stats.ranges();
        assert_eq!(ranges.len(), Metric::ALL.len());
        let carry = ranges.iter().find(|r| r.metric == Metric::CarryDistance).unwrap();
        assert_eq!((carry.low, carry.average, carry.high), (151.0, 160.0, 168.0));
        let spin = ranges.iter().find(|r| r.metric == Metric::SpinRate).unwrap();
        assert_eq!(spin.metric.format_value(spin.high), "7400");
        assert_eq!(spin.metric.unit(), "rpm");
    }
}
