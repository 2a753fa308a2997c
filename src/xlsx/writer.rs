use crate::error::Result;
use crate::{ClubStats, Metric, Shot};
use rust_xlsxwriter::{
    Color, ConditionalFormat3ColorScale, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::path::Path;

/// Metrics shown as averages on the club summary sheet
const SUMMARY_METRICS: [Metric; 8] = [
    Metric::CarryDistance,
    Metric::TotalDistance,
    Metric::BallSpeed,
    Metric::ClubSpeed,
    Metric::LaunchAngle,
    Metric::SpinRate,
    Metric::Apex,
    Metric::Offline,
];

/// Write club statistics and the shot log to an Excel file
pub fn write_club_stats_to_xlsx(stats: &[ClubStats], shots: &[Shot], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    // Add the club summary worksheet
    let summary_sheet = workbook.add_worksheet();
    write_club_summary_sheet(summary_sheet, stats)?;

    // Add low/average/high for every metric of every club
    if !stats.is_empty() {
        let ranges_sheet = workbook.add_worksheet();
        write_club_ranges_sheet(ranges_sheet, stats)?;
    }

    // Add the shot log
    if !shots.is_empty() {
        let shots_sheet = workbook.add_worksheet();
        write_shots_sheet(shots_sheet, shots)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Parse `#rrggbb` into an xlsx color, falling back to black
fn hex_color(hex: &str) -> Color {
    u32::from_str_radix(hex.trim_start_matches('#'), 16)
        .map(Color::RGB)
        .unwrap_or(Color::Black)
}

fn number_format(metric: Metric) -> &'static str {
    match metric {
        Metric::SpinRate | Metric::BackSpin | Metric::SideSpin => "0",
        Metric::SmashFactor => "0.00",
        _ => "0.0",
    }
}

fn write_club_summary_sheet(sheet: &mut Worksheet, stats: &[ClubStats]) -> Result<()> {
    sheet.set_name("Club Summary")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);
    let center_format = Format::new().set_align(FormatAlign::Center);

    // Headers: counts, one column per summary metric, then the carry range
    let mut headers: Vec<String> = vec!["Club".to_string(), "Shots".to_string(), "Raw".to_string()];
    headers.extend(SUMMARY_METRICS.iter().map(|m| format!("{} ({})", m.label(), m.unit())));
    headers.push("Carry Low".to_string());
    headers.push("Carry High".to_string());
    headers.push("Consistency %".to_string());

    // Set column widths
    sheet.set_column_width(0, 10)?;
    for col in 1..headers.len() {
        sheet.set_column_width(col as u16, 14)?;
    }
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (row_idx, club) in stats.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        // Club name in its display color
        let club_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_font_color(hex_color(&club.color));
        sheet.write_string_with_format(row, 0, &club.club, &club_format)?;
        sheet.write_number_with_format(row, 1, club.count as f64, &center_format)?;
        sheet.write_number_with_format(row, 2, club.raw_count() as f64, &center_format)?;

        // Averages of the filtered shots
        let mut col: u16 = 3;
        for metric in SUMMARY_METRICS {
            let format = Format::new()
                .set_align(FormatAlign::Right)
                .set_num_format(number_format(metric));
            sheet.write_number_with_format(row, col, club.averages.get(metric), &format)?;
            col += 1;
        }

        // Carry range and consistency
        let carry_format = Format::new().set_align(FormatAlign::Right).set_num_format("0.0");
        sheet.write_number_with_format(row, col, club.lows.carry_distance, &carry_format)?;
        sheet.write_number_with_format(row, col + 1, club.highs.carry_distance, &carry_format)?;
        sheet.write_number_with_format(row, col + 2, club.consistency(), &carry_format)?;
    }

    // Red (short) -> Yellow -> Green (long) on average carry
    if !stats.is_empty() {
        let carry_scale = ConditionalFormat3ColorScale::new()
            .set_minimum_color("F8696B")
            .set_midpoint_color("FFEB84")
            .set_maximum_color("63BE7B");
        let last_row = stats.len() as u32;
        sheet.add_conditional_format(1, 3, last_row, 3, &carry_scale)?;
    }

    Ok(())
}

fn write_club_ranges_sheet(sheet: &mut Worksheet, stats: &[ClubStats]) -> Result<()> {
    sheet.set_name("Club Ranges")?;

    // Set column widths
    sheet.set_column_width(0, 10)?; // Club
    sheet.set_column_width(1, 16)?; // Metric
    sheet.set_column_width(2, 8)?; // Unit
    for col in 3..6 {
        sheet.set_column_width(col, 12)?;
    }

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);
    let center_format = Format::new().set_align(FormatAlign::Center);
    let left_format = Format::new().set_align(FormatAlign::Left);

    for (col, header) in ["Club", "Metric", "Unit", "Low", "Average", "High"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // One row per club and metric
    let mut row: u32 = 1;
    for club in stats {
        let club_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_font_color(hex_color(&club.color));

        for range in club.ranges() {
            let number = Format::new()
                .set_align(FormatAlign::Right)
                .set_num_format(number_format(range.metric));

            sheet.write_string_with_format(row, 0, &club.club, &club_format)?;
            sheet.write_string_with_format(row, 1, range.metric.label(), &left_format)?;
            sheet.write_string_with_format(row, 2, range.metric.unit(), &center_format)?;
            sheet.write_number_with_format(row, 3, range.low, &number)?;
            sheet.write_number_with_format(row, 4, range.average, &number)?;
            sheet.write_number_with_format(row, 5, range.high, &number)?;
            row += 1;
        }
    }

    sheet.autofilter(0, 0, row - 1, 5)?;

    Ok(())
}

fn write_shots_sheet(sheet: &mut Worksheet, shots: &[Shot]) -> Result<()> {
    sheet.set_name("Shots")?;

    sheet.set_column_width(0, 26)?; // Timestamp
    sheet.set_column_width(1, 10)?; // Club
    sheet.set_column_width(2, 28)?; // Session

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);
    let left_format = Format::new().set_align(FormatAlign::Left);
    let center_format = Format::new().set_align(FormatAlign::Center);

    // Write headers
    sheet.write_string_with_format(0, 0, "Timestamp", &header_format)?;
    sheet.write_string_with_format(0, 1, "Club", &header_format)?;
    sheet.write_string_with_format(0, 2, "Session", &header_format)?;
    for (i, metric) in Metric::ALL.iter().enumerate() {
        let col = (i + 3) as u16;
        sheet.set_column_width(col, 12)?;
        sheet.write_string_with_format(0, col, metric.label(), &header_format)?;
    }

    // Write shot data
    for (row_idx, shot) in shots.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet.write_string_with_format(row, 0, &shot.timestamp, &left_format)?;
        sheet.write_string_with_format(row, 1, &shot.club, &center_format)?;
        sheet.write_string_with_format(row, 2, &shot.session_id, &left_format)?;

        for (i, metric) in Metric::ALL.iter().enumerate() {
            let format = Format::new()
                .set_align(FormatAlign::Right)
                .set_num_format(number_format(*metric));
            sheet.write_number_with_format(row, (i + 3) as u16, shot.metric(*metric), &format)?;
        }
    }

    // Add auto-filter to the table
    let last_row = shots.len() as u32;
    let last_col = (Metric::ALL.len() + 2) as u16;
    sheet.autofilter(0, 0, last_row, last_col)?;

    Ok(())
}
