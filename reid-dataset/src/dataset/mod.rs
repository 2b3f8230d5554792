//! Dataset adapters.

mod dataset_;
mod dukemtmc;
mod market1501;
mod mot20;
mod msmt17;
mod options;
mod summary;
mod vehicle_id;
mod veri;

pub use dataset_::*;
pub use dukemtmc::*;
pub use market1501::*;
pub use mot20::*;
pub use msmt17::*;
pub use options::*;
pub use summary::*;
pub use vehicle_id::*;
pub use veri::*;
