pub mod csv;
pub mod records;

pub use records::{Records, Sample};
