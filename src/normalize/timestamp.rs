use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    IResult, Parser,
};

/// Date-time layouts tried after the export's own `DD/MM/YYYY HH:MM:SS`
const FALLBACK_DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

const FALLBACK_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

fn number<'a>(len: usize) -> impl Parser<&'a str, Output = u32, Error = nom::error::Error<&'a str>> {
    map_res(take_while_m_n(len, len, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })
}

/// `DD/MM/YYYY HH:MM:SS` as written by the launch monitor
fn export_datetime(input: &str) -> IResult<&str, (u32, u32, u32, u32, u32, u32)> {
    let (input, day) = number(2).parse(input)?;
    let (input, _) = char('/').parse(input)?;
    let (input, month) = number(2).parse(input)?;
    let (input, _) = char('/').parse(input)?;
    let (input, year) = number(4).parse(input)?;
    let (input, _) = take_while_m_n(1, 1, |c: char| c.is_whitespace()).parse(input)?;
    let (input, hour) = number(2).parse(input)?;
    let (input, _) = char(':').parse(input)?;
    let (input, minute) = number(2).parse(input)?;
    let (input, _) = char(':').parse(input)?;
    let (input, second) = number(2).parse(input)?;

    Ok((input, (day, month, year, hour, minute, second)))
}

fn parse_export_datetime(value: &str) -> Option<DateTime<Utc>> {
    let (_, (day, month, year, hour, minute, second)) =
        all_consuming(export_datetime).parse(value).ok()?;
    NaiveDate::from_ymd_opt(year as i32, month, day)?
        .and_hms_opt(hour, minute, second)
        .map(|dt| dt.and_utc())
}

fn parse_generic(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Parse a shot timestamp into an ISO-8601 UTC string, falling back to `now`.
///
/// Zone-less values are taken as UTC. Never fails.
pub fn parse_timestamp_at(value: &str, now: DateTime<Utc>) -> String {
    let value = value.trim();
    let instant = if value.is_empty() {
        None
    } else {
        parse_export_datetime(value).or_else(|| parse_generic(value))
    };

    instant
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> String {
    parse_timestamp_at(value, Utc::now())
}
