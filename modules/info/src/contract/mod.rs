pub mod model;

pub use model::{AiData, Info, NewInfo};
