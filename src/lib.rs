pub mod advice;
pub mod error;
pub mod export;
pub mod library;
pub mod model;
pub mod normalize;
pub mod stats;
pub mod xlsx;

pub use error::{Result, ShotError};
pub use model::*;
