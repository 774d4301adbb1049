pub mod binary_stream;
pub mod json;
pub mod model;

pub use json::NetworkSnapshot;
pub use model::{decode, encode};
