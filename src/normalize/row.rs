use super::headers::{resolve, resolve_number};
use super::spin::decompose_spin;
use super::timestamp::parse_timestamp_at;
use crate::export::RawRow;
use crate::model::{canonical_club, Shot};
use chrono::{DateTime, Utc};

// Candidate column names per field, most specific first
const CLUB: [&str; 3] = ["Club Type", "Club Name", "Club"];
const BALL_SPEED: [&str; 3] = ["Ball Speed", "VBall", "BallSpeed"];
const CARRY_DISTANCE: [&str; 3] = ["Carry Distance", "CarryDist", "Carry"];
const CLUB_SPEED: [&str; 4] = ["Club Speed", "VClub", "Club Head Speed", "ClubSpeed"];
const SMASH_FACTOR: [&str; 4] = ["Smash Factor", "Smash Efficiency", "Smash", "SmashFactor"];
const TOTAL_DISTANCE: [&str; 3] = ["Total Distance", "TotalDist", "Total"];
const LAUNCH_ANGLE: [&str; 4] = ["Launch Angle", "Launch V", "Vertical Launch", "LaunchAngle"];
const LAUNCH_DIRECTION: [&str; 5] = [
    "Launch Direction",
    "Launch H",
    "Horizontal Launch",
    "LaunchHoriz",
    "Launch Dir",
];
const SPIN_RATE: [&str; 4] = ["Spin Rate", "Total Spin", "Spin", "TotalSpin"];
const SPIN_AXIS: [&str; 2] = ["Spin Axis", "SpinAxis"];
const BACK_SPIN: [&str; 2] = ["Back Spin", "BackSpin"];
const SIDE_SPIN: [&str; 2] = ["Side Spin", "SideSpin"];
const APEX: [&str; 4] = ["Apex Height", "Apex", "Max Height", "ApexHeight"];
const ANGLE_OF_ATTACK: [&str; 5] = ["Angle of Attack", "Attack Angle", "AoA", "Attack", "AttackAngle"];
const OFFLINE: [&str; 6] = [
    "Carry Deviation Distance",
    "Carry Deviation",
    "Horizontal Carry",
    "Offline",
    "Lateral Carry",
    "Offline Carry",
];
const TOTAL_OFFLINE: [&str; 4] = [
    "Total Deviation Distance",
    "Total Deviation",
    "Total Offline",
    "Lateral Total",
];
const CLUB_PATH: [&str; 5] = ["Club Path", "Path", "Swing Path", "Path Angle", "Club Path Angle"];
const CLUB_FACE: [&str; 5] = ["Face Angle", "Club Face", "Face", "Face to Target", "Club Face Angle"];
const TIMESTAMP: [&str; 3] = ["Date", "Time", "Timestamp"];

/// Minimum carry (yards) for a row to count as a full shot
pub const MIN_CARRY_DISTANCE: f64 = 5.0;
/// Minimum ball speed (mph) for a row to count as a full shot
pub const MIN_BALL_SPEED: f64 = 10.0;

/// Validity gate thresholds applied to every row
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub min_carry: f64,
    pub min_ball_speed: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_carry: MIN_CARRY_DISTANCE,
            min_ball_speed: MIN_BALL_SPEED,
        }
    }
}

impl NormalizeConfig {
    /// Whether a carry/ball speed pair looks like a real full swing rather than
    /// a misread, practice swing or chip
    pub fn is_plausible(&self, carry_distance: f64, ball_speed: f64) -> bool {
        carry_distance.is_finite()
            && ball_speed.is_finite()
            && carry_distance >= self.min_carry
            && ball_speed >= self.min_ball_speed
    }
}

/// Convert one export row into a [`Shot`], or `None` if the row is not a valid shot.
///
/// `index` is the zero-based data row index and becomes part of the shot id.
pub fn normalize_row(
    row: &RawRow,
    session_id: &str,
    index: usize,
    config: &NormalizeConfig,
) -> Option<Shot> {
    normalize_row_at(row, session_id, index, config, Utc::now())
}

/// [`normalize_row`] with an explicit fallback instant for unparseable timestamps
pub fn normalize_row_at(
    row: &RawRow,
    session_id: &str,
    index: usize,
    config: &NormalizeConfig,
    now: DateTime<Utc>,
) -> Option<Shot> {
    let club = resolve(row, &CLUB).and_then(canonical_club)?;

    let ball_speed = resolve_number(row, &BALL_SPEED);
    let carry_distance = resolve_number(row, &CARRY_DISTANCE);
    if !config.is_plausible(carry_distance, ball_speed) {
        log::debug!(
            "Row {}: rejected {} shot (carry {}, ball speed {})",
            index + 1,
            club,
            carry_distance,
            ball_speed
        );
        return None;
    }

    let spin_rate = resolve_number(row, &SPIN_RATE);
    let spin_axis = resolve_number(row, &SPIN_AXIS);
    let (back_spin, side_spin) = decompose_spin(
        spin_rate,
        spin_axis,
        resolve_number(row, &BACK_SPIN),
        resolve_number(row, &SIDE_SPIN),
    );

    Some(Shot {
        id: format!("{}-{}", session_id, index),
        timestamp: parse_timestamp_at(resolve(row, &TIMESTAMP).unwrap_or(""), now),
        club,
        session_id: session_id.to_string(),
        ball_speed,
        club_speed: resolve_number(row, &CLUB_SPEED),
        smash_factor: resolve_number(row, &SMASH_FACTOR),
        carry_distance,
        total_distance: resolve_number(row, &TOTAL_DISTANCE),
        launch_angle: resolve_number(row, &LAUNCH_ANGLE),
        launch_direction: resolve_number(row, &LAUNCH_DIRECTION),
        spin_rate,
        back_spin,
        side_spin,
        spin_axis,
        apex: resolve_number(row, &APEX),
        angle_of_attack: resolve_number(row, &ANGLE_OF_ATTACK),
        offline: resolve_number(row, &OFFLINE),
        total_offline: resolve_number(row, &TOTAL_OFFLINE),
        club_path: resolve_number(row, &CLUB_PATH),
        club_face: resolve_number(row, &CLUB_FACE),
    })
}

/// Normalize every row of one file, dropping the ones that fail the validity gate
pub fn normalize_rows(rows: &[RawRow], session_id: &str, config: &NormalizeConfig) -> Vec<Shot> {
    let now = Utc::now();
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| normalize_row_at(row, session_id, index, config, now))
        .collect()
}
