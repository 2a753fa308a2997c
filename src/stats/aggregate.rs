use super::outliers::{filter_outliers, OutlierConfig};
use crate::model::{club_color, club_order, ClubStats, Metric, Shot, ShotStats};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Group shots by club in first-appearance order
fn group_by_club(shots: &[Shot]) -> Vec<(&str, Vec<&Shot>)> {
    let mut groups: Vec<(&str, Vec<&Shot>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for shot in shots {
        match index.get(shot.club.as_str()).copied() {
            Some(i) => groups[i].1.push(shot),
            None => {
                index.insert(shot.club.as_str(), groups.len());
                groups.push((shot.club.as_str(), vec![shot]));
            }
        }
    }

    groups
}

/// Mean, max and min of every metric. All zero for an empty set.
fn summarize(shots: &[&Shot]) -> (ShotStats, ShotStats, ShotStats) {
    let mut averages = ShotStats::default();
    let mut highs = ShotStats::default();
    let mut lows = ShotStats::default();

    if shots.is_empty() {
        return (averages, highs, lows);
    }

    let count = shots.len() as f64;
    for metric in Metric::ALL {
        let values = shots.iter().map(|s| s.metric(metric));
        let sum: f64 = values.clone().sum();
        *averages.get_mut(metric) = sum / count;
        *highs.get_mut(metric) = values.clone().fold(f64::NEG_INFINITY, f64::max);
        *lows.get_mut(metric) = values.fold(f64::INFINITY, f64::min);
    }

    (averages, highs, lows)
}

/// Bag order first, then unknown clubs alphabetically
fn compare_clubs(a: &str, b: &str) -> Ordering {
    match (club_order(a), club_order(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Build one [`ClubStats`] per club in the given shots.
///
/// Averages, highs and lows come from the outlier-filtered shots while the
/// full per-club list is kept on the result. Always a fresh computation.
pub fn calculate_club_stats(shots: &[Shot], config: &OutlierConfig) -> Vec<ClubStats> {
    let mut stats: Vec<ClubStats> = group_by_club(shots)
        .into_iter()
        .map(|(club, club_shots)| {
            let filtered = filter_outliers(&club_shots, config);
            let (averages, highs, lows) = summarize(&filtered);

            ClubStats {
                club: club.to_string(),
                count: filtered.len(),
                averages,
                highs,
                lows,
                color: club_color(club).to_string(),
                shots: club_shots.into_iter().cloned().collect(),
            }
        })
        .collect();

    stats.sort_by(|a, b| compare_clubs(&a.club, &b.club));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::RawRow;
    use crate::model::DEFAULT_COLOR;
    use crate::normalize::{normalize_rows, NormalizeConfig};

    fn shot(club: &str, carry: f64, offline: f64) -> Shot {
        Shot {
            id: format!("s-{}-{}", club, carry),
            timestamp: String::new(),
            club: club.to_string(),
            session_id: "s".to_string(),
            ball_speed: carry * 0.75,
            club_speed: 0.0,
            smash_factor: 0.0,
            carry_distance: carry,
            total_distance: carry + 8.0,
            launch_angle: 0.0,
            launch_direction: 0.0,
            spin_rate: 0.0,
            back_spin: 0.0,
            side_spin: 0.0,
            spin_axis: 0.0,
            apex: 0.0,
            angle_of_attack: 0.0,
            offline,
            total_offline: 0.0,
            club_path: 0.0,
            club_face: 0.0,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(calculate_club_stats(&[], &OutlierConfig::default()).is_empty());
    }

    #[test]
    fn test_canonical_ordering() {
        let shots = vec![
            shot("7I", 150.0, 0.0),
            shot("Driver", 230.0, 0.0),
            shot("PW", 110.0, 0.0),
            shot("9I", 130.0, 0.0),
        ];
        let stats = calculate_club_stats(&shots, &OutlierConfig::default());
        let clubs: Vec<&str> = stats.iter().map(|s| s.club.as_str()).collect();
        assert_eq!(clubs, vec!["Driver", "7I", "9I", "PW"]);
    }

    #[test]
    fn test_unknown_clubs_sort_last_alphabetically() {
        let shots = vec![
            shot("PUTTER", 5.0, 0.0),
            shot("CHIPPER", 20.0, 0.0),
            shot("LW", 60.0, 0.0),
        ];
        let stats = calculate_club_stats(&shots, &OutlierConfig::default());
        let clubs: Vec<&str> = stats.iter().map(|s| s.club.as_str()).collect();
        assert_eq!(clubs, vec!["LW", "CHIPPER", "PUTTER"]);
        assert_eq!(stats[1].color, DEFAULT_COLOR);
    }

    #[test]
    fn test_min_max_mean() {
        let shots = vec![
            shot("8I", 140.0, -5.0),
            shot("8I", 144.0, 3.0),
            shot("8I", 142.0, 2.0),
        ];
        let stats = calculate_club_stats(&shots, &OutlierConfig::default());
        let eight = &stats[0];
        assert_eq!(eight.count, 3);
        assert_eq!(eight.averages.carry_distance, 142.0);
        assert_eq!(eight.highs.carry_distance, 144.0);
        assert_eq!(eight.lows.carry_distance, 140.0);
        assert_eq!(eight.highs.offline, 3.0);
        assert_eq!(eight.lows.offline, -5.0);
        assert_eq!(eight.averages.total_distance, 150.0);
        assert_eq!(eight.color, "#d946ef");
    }

    #[test]
    fn test_count_never_exceeds_raw_shots() {
        let mut shots: Vec<Shot> = (0..15).map(|i| shot("6I", 160.0 + i as f64, 0.0)).collect();
        shots.push(shot("6I", 30.0, 0.0));
        shots.extend((0..3).map(|i| shot("Driver", 220.0 + i as f64, 0.0)));
        let stats = calculate_club_stats(&shots, &OutlierConfig::default());
        for s in &stats {
            assert!(s.count <= s.raw_count());
        }
        assert_eq!(stats[0].club, "Driver");
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[1].raw_count(), 16);
    }

    #[test]
    fn test_idempotent() {
        let shots: Vec<Shot> = (0..12)
            .map(|i| shot(if i % 2 == 0 { "7I" } else { "5W" }, 150.0 + (i * 7 % 11) as f64, i as f64 - 6.0))
            .collect();
        let config = OutlierConfig::default();
        let first = calculate_club_stats(&shots, &config);
        let second = calculate_club_stats(&shots, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_guard() {
        let (averages, highs, lows) = summarize(&[]);
        assert_eq!(averages, ShotStats::default());
        assert_eq!(highs, ShotStats::default());
        assert_eq!(lows, ShotStats::default());
    }

    #[test]
    fn test_end_to_end_seven_iron() {
        let mut rows: Vec<RawRow> = (0..20)
            .map(|i| {
                let carry = 150.0 + i as f64 * 20.0 / 19.0;
                vec![
                    ("Club Type", "7 Iron".to_string()),
                    ("Ball Speed", "112".to_string()),
                    ("Carry Distance", format!("{:.2}", carry)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        for carry in ["40", "400"] {
            rows.push(
                vec![
                    ("Club Type", "7 Iron".to_string()),
                    ("Ball Speed", "112".to_string()),
                    ("Carry Distance", carry.to_string()),
                ]
                .into_iter()
                .collect(),
            );
        }

        let shots = normalize_rows(&rows, "session-e2e", &NormalizeConfig::default());
        assert_eq!(shots.len(), 22);

        let stats = calculate_club_stats(&shots, &OutlierConfig::default());
        assert_eq!(stats.len(), 1);
        let seven = &stats[0];
        assert_eq!(seven.club, "7I");
        assert_eq!(seven.count, 18);
        assert_eq!(seven.raw_count(), 22);
        assert!(seven.lows.carry_distance >= 150.0);
        assert!(seven.highs.carry_distance <= 170.0);
        assert!(seven.averages.carry_distance > 155.0 && seven.averages.carry_distance < 165.0);
    }
}
