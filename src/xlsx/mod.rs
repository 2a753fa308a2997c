pub mod writer;

pub use writer::write_club_stats_to_xlsx;
