//! Raw export rows to canonical shots

pub mod headers;
pub mod row;
pub mod spin;
pub mod timestamp;

pub use headers::{coerce_number, normalize_header, resolve, resolve_number};
pub use row::{normalize_row, normalize_rows, NormalizeConfig};
pub use spin::decompose_spin;
pub use timestamp::parse_timestamp;
