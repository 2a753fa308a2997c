use crate::error::Result;
use crate::model::Shot;
use std::path::Path;

/// Write the shot log as CSV, one row per shot with snake_case headers
pub fn write_shots_csv<W: std::io::Write>(shots: &[Shot], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for shot in shots {
        writer.serialize(shot)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_shots_csv_file(shots: &[Shot], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_shots_csv(shots, file)
}
