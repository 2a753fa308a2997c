use crate::normalize::normalize_header;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A numeric measurement carried by every shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    BallSpeed,
    ClubSpeed,
    SmashFactor,
    CarryDistance,
    TotalDistance,
    LaunchAngle,
    LaunchDirection,
    SpinRate,
    BackSpin,
    SideSpin,
    SpinAxis,
    Apex,
    AngleOfAttack,
    Offline,
    TotalOffline,
    ClubPath,
    ClubFace,
}

impl Metric {
    pub const ALL: [Metric; 17] = [
        Metric::BallSpeed,
        Metric::ClubSpeed,
        Metric::SmashFactor,
        Metric::CarryDistance,
        Metric::TotalDistance,
        Metric::LaunchAngle,
        Metric::LaunchDirection,
        Metric::SpinRate,
        Metric::BackSpin,
        Metric::SideSpin,
        Metric::SpinAxis,
        Metric::Apex,
        Metric::AngleOfAttack,
        Metric::Offline,
        Metric::TotalOffline,
        Metric::ClubPath,
        Metric::ClubFace,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::BallSpeed => "Ball Speed",
            Metric::ClubSpeed => "Club Speed",
            Metric::SmashFactor => "Smash",
            Metric::CarryDistance => "Carry",
            Metric::TotalDistance => "Total",
            Metric::LaunchAngle => "Launch Angle",
            Metric::LaunchDirection => "Launch Dir",
            Metric::SpinRate => "Spin Rate",
            Metric::BackSpin => "Back Spin",
            Metric::SideSpin => "Side Spin",
            Metric::SpinAxis => "Spin Axis",
            Metric::Apex => "Apex",
            Metric::AngleOfAttack => "Attack Angle",
            Metric::Offline => "Carry Deviation",
            Metric::TotalOffline => "Total Deviation",
            Metric::ClubPath => "Club Path",
            Metric::ClubFace => "Face Angle",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::BallSpeed | Metric::ClubSpeed => "mph",
            Metric::SmashFactor => "",
            Metric::CarryDistance
            | Metric::TotalDistance
            | Metric::Offline
            | Metric::TotalOffline => "yd",
            Metric::SpinRate | Metric::BackSpin | Metric::SideSpin => "rpm",
            Metric::Apex => "ft",
            Metric::LaunchAngle
            | Metric::LaunchDirection
            | Metric::SpinAxis
            | Metric::AngleOfAttack
            | Metric::ClubPath
            | Metric::ClubFace => "°",
        }
    }

    /// Field name as written in the shot log
    pub fn key(&self) -> &'static str {
        match self {
            Metric::BallSpeed => "ball_speed",
            Metric::ClubSpeed => "club_speed",
            Metric::SmashFactor => "smash_factor",
            Metric::CarryDistance => "carry_distance",
            Metric::TotalDistance => "total_distance",
            Metric::LaunchAngle => "launch_angle",
            Metric::LaunchDirection => "launch_direction",
            Metric::SpinRate => "spin_rate",
            Metric::BackSpin => "back_spin",
            Metric::SideSpin => "side_spin",
            Metric::SpinAxis => "spin_axis",
            Metric::Apex => "apex",
            Metric::AngleOfAttack => "angle_of_attack",
            Metric::Offline => "offline",
            Metric::TotalOffline => "total_offline",
            Metric::ClubPath => "club_path",
            Metric::ClubFace => "club_face",
        }
    }

    /// Signed left/right metrics (positive = right of target)
    pub fn is_lateral(&self) -> bool {
        matches!(
            self,
            Metric::LaunchDirection
                | Metric::SideSpin
                | Metric::SpinAxis
                | Metric::Offline
                | Metric::TotalOffline
                | Metric::ClubPath
                | Metric::ClubFace
        )
    }

    /// Format a value for display: spins as whole rpm, lateral metrics as `L 4.2` / `R 4.2`
    pub fn format_value(&self, value: f64) -> String {
        let is_spin = matches!(self, Metric::SpinRate | Metric::BackSpin | Metric::SideSpin);
        let magnitude = if self.is_lateral() { value.abs() } else { value };
        let formatted = if is_spin {
            format!("{:.0}", magnitude)
        } else if *self == Metric::SmashFactor {
            format!("{:.2}", magnitude)
        } else {
            format!("{:.1}", magnitude)
        };

        if self.is_lateral() && value != 0.0 {
            let dir = if value > 0.0 { 'R' } else { 'L' };
            format!("{} {}", dir, formatted)
        } else {
            formatted
        }
    }
}

/// Accepts the field key or the display label, ignoring case and punctuation
/// (`carry`, `carry_distance`, `"Launch Dir"`)
impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_header(s);
        Metric::ALL
            .iter()
            .copied()
            .find(|m| normalize_header(m.key()) == wanted || normalize_header(m.label()) == wanted)
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One recorded swing as reported by the launch monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: String,
    pub timestamp: String,
    pub club: String,
    pub session_id: String,

    pub ball_speed: f64,
    pub club_speed: f64,
    pub smash_factor: f64,
    pub carry_distance: f64,
    pub total_distance: f64,
    pub launch_angle: f64,
    pub launch_direction: f64,
    pub spin_rate: f64,
    pub back_spin: f64,
    pub side_spin: f64,
    pub spin_axis: f64,
    pub apex: f64,
    pub angle_of_attack: f64,
    /// Lateral deviation at carry, positive = right
    pub offline: f64,
    /// Lateral deviation after roll, positive = right
    pub total_offline: f64,
    pub club_path: f64,
    pub club_face: f64,
}

impl Shot {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BallSpeed => self.ball_speed,
            Metric::ClubSpeed => self.club_speed,
            Metric::SmashFactor => self.smash_factor,
            Metric::CarryDistance => self.carry_distance,
            Metric::TotalDistance => self.total_distance,
            Metric::LaunchAngle => self.launch_angle,
            Metric::LaunchDirection => self.launch_direction,
            Metric::SpinRate => self.spin_rate,
            Metric::BackSpin => self.back_spin,
            Metric::SideSpin => self.side_spin,
            Metric::SpinAxis => self.spin_axis,
            Metric::Apex => self.apex,
            Metric::AngleOfAttack => self.angle_of_attack,
            Metric::Offline => self.offline,
            Metric::TotalOffline => self.total_offline,
            Metric::ClubPath => self.club_path,
            Metric::ClubFace => self.club_face,
        }
    }
}

/// Stable sort of shots by one metric
pub fn sort_shots(shots: &mut [Shot], metric: Metric, descending: bool) {
    shots.sort_by(|a, b| {
        let order: Ordering = a.metric(metric).total_cmp(&b.metric(metric));
        if descending {
            order.reverse()
        } else {
            order
        }
    });
}

/// Aggregate (mean, min or max) of each metric over a group of shots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotStats {
    pub ball_speed: f64,
    pub club_speed: f64,
    pub smash_factor: f64,
    pub carry_distance: f64,
    pub total_distance: f64,
    pub launch_angle: f64,
    pub launch_direction: f64,
    pub spin_rate: f64,
    pub back_spin: f64,
    pub side_spin: f64,
    pub spin_axis: f64,
    pub apex: f64,
    pub angle_of_attack: f64,
    pub offline: f64,
    pub total_offline: f64,
    pub club_path: f64,
    pub club_face: f64,
}

impl ShotStats {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BallSpeed => self.ball_speed,
            Metric::ClubSpeed => self.club_speed,
            Metric::SmashFactor => self.smash_factor,
            Metric::CarryDistance => self.carry_distance,
            Metric::TotalDistance => self.total_distance,
            Metric::LaunchAngle => self.launch_angle,
            Metric::LaunchDirection => self.launch_direction,
            Metric::SpinRate => self.spin_rate,
            Metric::BackSpin => self.back_spin,
            Metric::SideSpin => self.side_spin,
            Metric::SpinAxis => self.spin_axis,
            Metric::Apex => self.apex,
            Metric::AngleOfAttack => self.angle_of_attack,
            Metric::Offline => self.offline,
            Metric::TotalOffline => self.total_offline,
            Metric::ClubPath => self.club_path,
            Metric::ClubFace => self.club_face,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::BallSpeed => &mut self.ball_speed,
            Metric::ClubSpeed => &mut self.club_speed,
            Metric::SmashFactor => &mut self.smash_factor,
            Metric::CarryDistance => &mut self.carry_distance,
            Metric::TotalDistance => &mut self.total_distance,
            Metric::LaunchAngle => &mut self.launch_angle,
            Metric::LaunchDirection => &mut self.launch_direction,
            Metric::SpinRate => &mut self.spin_rate,
            Metric::BackSpin => &mut self.back_spin,
            Metric::SideSpin => &mut self.side_spin,
            Metric::SpinAxis => &mut self.spin_axis,
            Metric::Apex => &mut self.apex,
            Metric::AngleOfAttack => &mut self.angle_of_attack,
            Metric::Offline => &mut self.offline,
            Metric::TotalOffline => &mut self.total_offline,
            Metric::ClubPath => &mut self.club_path,
            Metric::ClubFace => &mut self.club_face,
        }
    }
}
