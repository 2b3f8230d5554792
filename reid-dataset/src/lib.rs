//! Dataset adapters and the dataset registry for ReID training.
//!
//! Every adapter turns a dataset directory into three lists of
//! [ImageRecord](record::ImageRecord)s (train, query and gallery). The
//! [DatasetRegistry](registry::DatasetRegistry) maps dataset names to
//! adapter constructors.

mod common;
pub mod dataset;
pub mod error;
pub mod record;
pub mod registry;
mod utils;

pub use dataset::{
    DatasetArgs, DatasetOptions, DatasetSummary, LoadDataset, ReidDataset, VehicleIdOptions,
    VeriOptions,
};
pub use error::{DatasetError, Result};
pub use record::{ImageRecord, SplitInfo};
pub use registry::{DatasetConstructor, DatasetRegistry};
