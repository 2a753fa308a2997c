use crate::error::{Result, ShotError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

/// A data row keyed by column header, kept in column order.
///
/// Values are the raw (trimmed) cell strings; nothing is coerced here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. A repeated header keeps its first position but takes the later value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// How an export file is laid out
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub delimiter: u8,
    /// Second line holds units (mph, yds, ...) rather than data
    pub units_row: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            units_row: true,
        }
    }
}

impl ReaderOptions {
    /// Parse a delimiter given on the command line (`,` `;` `|` `tab` or `\t`)
    pub fn parse_delimiter(s: &str) -> Result<u8> {
        match s {
            "tab" | "\\t" | "\t" => Ok(b'\t'),
            _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            _ => Err(ShotError::InvalidDelimiter(s.to_string())),
        }
    }
}

/// Tokenize an export into rows keyed by the header line.
///
/// The first non-blank line names the columns, the second (when `units_row` is set)
/// is skipped, and every following line becomes a [`RawRow`]. Quoted fields may
/// contain the delimiter.
pub fn read_export(text: &str, options: &ReaderOptions) -> Result<Vec<RawRow>> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Err(ShotError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(options.delimiter)
        .from_reader(text.as_bytes());

    let mut records: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Whitespace-only line. A delimiter-only line such as a units row stays.
        if record.len() <= 1 && record.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push(record);
    }

    let data_start = if options.units_row { 2 } else { 1 };
    if records.len() <= data_start {
        return Err(ShotError::MissingHeaders);
    }

    let headers = &records[0];
    let rows: Vec<RawRow> = records[data_start..]
        .iter()
        .map(|record| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(i, header)| (header, record.get(i).unwrap_or("")))
                .collect::<RawRow>()
        })
        .collect();

    Ok(rows)
}

/// Read an export from disk
pub fn read_export_file(path: &Path, options: &ReaderOptions) -> Result<Vec<RawRow>> {
    let content = std::fs::read_to_string(path)?;
    read_export(&content, options)
}
