//! Label remapping, sampling and batching of dataset records.

mod label_map;
mod loader;
mod sampler;

pub use label_map::*;
pub use loader::*;
pub use sampler::*;
