use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShotError {
    #[error("Empty file content")]
    EmptyFile,

    #[error("Invalid launch monitor export: file structure missing headers or data")]
    MissingHeaders,

    #[error("No valid shot data found in this CSV")]
    NoValidShots,

    #[error("Duplicate CSV detected: this session has already been processed (hash {0})")]
    DuplicateFile(String),

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    #[error("Benchmark table error: {0}")]
    Benchmark(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, ShotError>;
