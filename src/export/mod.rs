//! Launch monitor CSV export reading and shot log writing

pub mod reader;
pub mod writer;

pub use reader::{read_export, read_export_file, RawRow, ReaderOptions};
pub use writer::{write_shots_csv, write_shots_csv_file};
