pub mod observation;
pub mod timestamp;
pub mod types;

pub use observation::Observation;
pub use types::*;
