//! Templated coaching text over computed club statistics.
//!
//! Benchmarks are passed in rather than looked up globally so callers can
//! swap the tour table for their own targets.

use crate::error::{Result, ShotError};
use crate::model::ClubStats;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Tour-average performance for one club
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClubBenchmark {
    pub carry: f64,
    pub ball_speed: f64,
    pub spin: f64,
    pub smash: f64,
    pub apex: f64,
    /// Landing footprint in square yards
    pub land_area: f64,
}

/// One line of a benchmark CSV
#[derive(Debug, Deserialize)]
struct BenchmarkRow {
    club: String,
    carry: f64,
    ball_speed: f64,
    spin: f64,
    smash: f64,
    apex: f64,
    land_area: f64,
}

/// Read-only club -> benchmark lookup
#[derive(Debug, Clone, Default)]
pub struct Benchmarks {
    clubs: HashMap<String, ClubBenchmark>,
}

/// PGA Tour averages: club, carry, ball speed, spin, smash, apex, landing area
const PGA_TOUR: [(&str, f64, f64, f64, f64, f64, f64); 11] = [
    ("Driver", 275.0, 167.0, 2500.0, 1.48, 95.0, 800.0),
    ("3W", 243.0, 158.0, 3600.0, 1.46, 92.0, 650.0),
    ("5W", 230.0, 152.0, 4300.0, 1.45, 95.0, 600.0),
    ("3I", 212.0, 142.0, 4600.0, 1.43, 88.0, 550.0),
    ("4I", 203.0, 137.0, 4800.0, 1.42, 85.0, 500.0),
    ("5I", 194.0, 132.0, 5300.0, 1.41, 82.0, 450.0),
    ("6I", 183.0, 127.0, 6100.0, 1.38, 80.0, 400.0),
    ("7I", 172.0, 120.0, 7000.0, 1.33, 78.0, 350.0),
    ("8I", 160.0, 115.0, 7900.0, 1.32, 75.0, 300.0),
    ("9I", 148.0, 109.0, 8500.0, 1.28, 72.0, 250.0),
    ("PW", 136.0, 102.0, 9300.0, 1.23, 68.0, 200.0),
];

/// Session-wide smash factor quoted for comparison
const TOUR_AVERAGE_SMASH: f64 = 1.38;

impl Benchmarks {
    pub fn pga_tour() -> Self {
        let clubs = PGA_TOUR
            .iter()
            .map(|&(club, carry, ball_speed, spin, smash, apex, land_area)| {
                (
                    club.to_string(),
                    ClubBenchmark {
                        carry,
                        ball_speed,
                        spin,
                        smash,
                        apex,
                        land_area,
                    },
                )
            })
            .collect();
        Self { clubs }
    }

    /// Load a table with columns `club,carry,ball_speed,spin,smash,apex,land_area`
    pub fn from_csv<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut clubs = HashMap::new();
        for result in reader.deserialize() {
            let row: BenchmarkRow = result?;
            let values = [row.carry, row.ball_speed, row.spin, row.smash, row.apex, row.land_area];
            if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(ShotError::Benchmark(format!(
                    "{}: benchmark values must be positive",
                    row.club
                )));
            }
            clubs.insert(
                row.club,
                ClubBenchmark {
                    carry: row.carry,
                    ball_speed: row.ball_speed,
                    spin: row.spin,
                    smash: row.smash,
                    apex: row.apex,
                    land_area: row.land_area,
                },
            );
        }

        if clubs.is_empty() {
            return Err(ShotError::Benchmark("no benchmark rows found".to_string()));
        }
        Ok(Self { clubs })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv(file)
    }

    pub fn get(&self, club: &str) -> Option<&ClubBenchmark> {
        self.clubs.get(club)
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }
}

/// Landing footprint in square yards, at least 1
fn footprint(stats: &ClubStats) -> f64 {
    (stats.carry_spread() * stats.offline_spread()).max(1.0)
}

/// Dispersion and variance report for one club
pub fn analyze_club(stats: &ClubStats, benchmarks: &Benchmarks) -> String {
    let club = &stats.club;
    let benchmark = benchmarks.get(club);
    let mut report = String::from("[GROUPING & DISPERSION]\n");

    let area = footprint(stats);
    if let Some(b) = benchmark {
        let ratio = area / b.land_area;
        if ratio < 1.2 {
            report.push_str(&format!(
                "- **Tour-Level Tightness**: a landing footprint of **{:.0} sq yds** sits right at the tour standard for a {}.\n",
                area, club
            ));
        } else if ratio > 2.5 {
            report.push_str(&format!(
                "- **Loose Grouping**: the landing area (**{:.0} sq yds**) is more than 2.5x the tour target. Centre the strike to shrink the box.\n",
                area
            ));
        } else {
            report.push_str("- **Stable Footprint**: the grouping area matches an advanced amateur profile.\n");
        }
    }

    let bias = stats.averages.offline;
    if bias.abs() > 10.0 {
        let side = if bias > 0.0 { "Right" } else { "Left" };
        report.push_str(&format!(
            "- **Spatial Bias**: shots group heavily to the **{}**. This is a repeatable pattern, so adjust aim or work on path.\n",
            side
        ));
    }

    report.push_str("\n[VARIANCE DIAGNOSTICS]\n");
    let spread = stats.carry_spread();
    let variance_pct = stats.carry_volatility() * 100.0;
    report.push_str(&format!(
        "- **Vertical Variance**: carry moves by **{:.1} yards** ({:.1}%).\n",
        spread, variance_pct
    ));

    if variance_pct > 10.0 {
        report.push_str("- **High Volatility**: the front-to-back spread points to thin or heavy contact. Consistency matters more than speed here.\n");
    } else {
        report.push_str("- **Reliable Depth**: depth control is excellent. This yardage can be trusted over hazards.\n");
    }

    if let Some(b) = benchmark {
        let speed_index = stats.averages.ball_speed / b.ball_speed * 100.0;
        report.push_str(&format!(
            "- **Power Index**: **{:.1}%** of the average tour ball speed with this club.\n",
            speed_index
        ));
    }

    report
}

/// Bag-wide report: tightest and loosest clubs, most volatile club, smash factor
pub fn analyze_session(stats: &[ClubStats]) -> String {
    if stats.is_empty() {
        return "Upload session data to begin analysis.".to_string();
    }

    let mut report = String::from("[BAG-WIDE GROUPINGS]\n");

    let mut by_area: Vec<(&str, f64)> = stats
        .iter()
        .map(|s| (s.club.as_str(), s.carry_spread() * s.offline_spread()))
        .collect();
    by_area.sort_by(|a, b| a.1.total_cmp(&b.1));
    let tightest = by_area[0].0;
    let widest = by_area[by_area.len() - 1].0;

    report.push_str(&format!(
        "- **Consistency Anchor**: the **{}** has the most concentrated grouping today. This is the safety club.\n",
        tightest
    ));
    report.push_str(&format!(
        "- **Dispersion Outlier**: the **{}** has the largest landing area of the session.\n",
        widest
    ));

    report.push_str("\n[VARIANCE HEATMAP]\n");
    let mut by_volatility: Vec<(&str, f64)> = stats
        .iter()
        .map(|s| (s.club.as_str(), s.carry_volatility()))
        .collect();
    by_volatility.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (volatile_club, volatility) = by_volatility[0];

    report.push_str(&format!(
        "- **Variance Leader**: the **{}** shows the highest yardage volatility (**{:.1}%**).\n",
        volatile_club,
        volatility * 100.0
    ));
    report.push_str(&format!(
        "- **Strategic Focus**: spend the next practice block on the **{}**. Tightening it gives the fastest scoring gain.\n",
        volatile_club
    ));

    let smashes: Vec<f64> = stats
        .iter()
        .filter(|s| s.averages.club_speed > 0.0)
        .map(|s| s.averages.ball_speed / s.averages.club_speed)
        .collect();
    if !smashes.is_empty() {
        let avg_smash = smashes.iter().sum::<f64>() / smashes.len() as f64;
        report.push_str(&format!(
            "- **Ball Striking Efficiency**: session smash factor is **{:.2}** (tour average ~{:.2} across the bag).\n",
            avg_smash, TOUR_AVERAGE_SMASH
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShotStats;

    fn club_stats(club: &str, carry: (f64, f64, f64), offline: (f64, f64, f64)) -> ClubStats {
        ClubStats {
            club: club.to_string(),
            count: 10,
            averages: ShotStats {
                carry_distance: carry.1,
                offline: offline.1,
                ball_speed: 118.0,
                club_speed: 88.0,
                ..Default::default()
            },
            highs: ShotStats {
                carry_distance: carry.2,
                offline: offline.2,
                ..Default::default()
            },
            lows: ShotStats {
                carry_distance: carry.0,
                offline: offline.0,
                ..Default::default()
            },
            color: "#a855f7".to_string(),
            shots: Vec::new(),
        }
    }

    #[test]
    fn test_pga_table() {
        let b = Benchmarks::pga_tour();
        assert_eq!(b.len(), 11);
        assert_eq!(b.get("7I").unwrap().carry, 172.0);
        assert!(b.get("LW").is_none());
    }

    #[test]
    fn test_benchmarks_from_csv() {
        let data = "club,carry,ball_speed,spin,smash,apex,land_area\n7I,150,105,6500,1.3,70,400\n";
        let b = Benchmarks::from_csv(data.as_bytes()).unwrap();
        assert_eq!(b.get("7I").unwrap().ball_speed, 105.0);
        assert!(Benchmarks::from_csv("club,carry,ball_speed,spin,smash,apex,land_area\n".as_bytes()).is_err());
        assert!(Benchmarks::from_csv("club,carry\n7I,abc\n".as_bytes()).is_err());
    }

    #[test]
    fn test_benchmarks_reject_non_positive_values() {
        let zero_speed = "club,carry,ball_speed,spin,smash,apex,land_area\n7I,150,0,6500,1.3,70,400\n";
        assert!(matches!(
            Benchmarks::from_csv(zero_speed.as_bytes()),
            Err(ShotError::Benchmark(_))
        ));
        let negative_area = "club,carry,ball_speed,spin,smash,apex,land_area\n7I,150,105,6500,1.3,70,-1\n";
        assert!(matches!(
            Benchmarks::from_csv(negative_area.as_bytes()),
            Err(ShotError::Benchmark(_))
        ));
    }

    #[test]
    fn test_tight_club_report() {
        // 12 x 20 = 240 sq yds against a 350 target
        let stats = club_stats("7I", (154.0, 160.0, 166.0), (-10.0, 0.0, 10.0));
        let report = analyze_club(&stats, &Benchmarks::pga_tour());
        assert!(report.contains("Tour-Level Tightness"));
        assert!(report.contains("240 sq yds"));
        assert!(report.contains("Reliable Depth"));
        assert!(report.contains("Power Index"));
        assert!(!report.contains("Spatial Bias"));
    }

    #[test]
    fn test_loose_biased_club_report() {
        let stats = club_stats("7I", (120.0, 150.0, 170.0), (-5.0, 14.0, 40.0));
        let report = analyze_club(&stats, &Benchmarks::pga_tour());
        assert!(report.contains("Loose Grouping"));
        assert!(report.contains("**Right**"));
        assert!(report.contains("High Volatility"));
    }

    #[test]
    fn test_unknown_club_skips_benchmark_lines() {
        let stats = club_stats("LW", (60.0, 62.0, 64.0), (-2.0, 0.0, 2.0));
        let report = analyze_club(&stats, &Benchmarks::pga_tour());
        assert!(!report.contains("Power Index"));
        assert!(report.contains("[VARIANCE DIAGNOSTICS]"));
    }

    #[test]
    fn test_zero_carry_does_not_produce_nan() {
        let stats = club_stats("7I", (0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
        let report = analyze_club(&stats, &Benchmarks::pga_tour());
        assert!(!report.contains("NaN"));
        assert!(!report.contains("inf"));
    }

    #[test]
    fn test_session_report() {
        let stats = vec![
            club_stats("Driver", (200.0, 230.0, 250.0), (-30.0, 0.0, 30.0)),
            club_stats("7I", (155.0, 160.0, 165.0), (-5.0, 0.0, 5.0)),
        ];
        let report = analyze_session(&stats);
        assert!(report.contains("the **7I** has the most concentrated"));
        assert!(report.contains("the **Driver** has the largest"));
        assert!(report.contains("Variance Leader**: the **Driver**"));
        assert!(report.contains("1.34"));
    }

    #[test]
    fn test_empty_session_report() {
        assert_eq!(analyze_session(&[]), "Upload session data to begin analysis.");
    }
}
