use super::*;
use crate::{
    common::*,
    record::{ImageRecord, SplitInfo},
};

/// The ReID dataset with train, query and gallery splits.
///
/// The record lists are fixed once the dataset is loaded.
pub trait ReidDataset
where
    Self: Debug + Send + Sync,
{
    /// The display name of the dataset.
    fn name(&self) -> &'static str;

    /// The training split.
    fn train(&self) -> &[ImageRecord];

    /// The query split for evaluation.
    fn query(&self) -> &[ImageRecord];

    /// The gallery split for evaluation.
    fn gallery(&self) -> &[ImageRecord];

    /// Casts to [Any] to recover the concrete adapter type.
    fn as_any(&self) -> &dyn Any;

    fn train_info(&self) -> SplitInfo {
        SplitInfo::from_records(self.train())
    }

    fn query_info(&self) -> SplitInfo {
        SplitInfo::from_records(self.query())
    }

    fn gallery_info(&self) -> SplitInfo {
        SplitInfo::from_records(self.gallery())
    }

    /// Returns true if both query and gallery splits are present.
    fn supports_evaluation(&self) -> bool {
        !self.query().is_empty() && !self.gallery().is_empty()
    }

    fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            name: self.name(),
            train: self.train_info(),
            query: self.query_info(),
            gallery: self.gallery_info(),
        }
    }
}

/// The adapter that can be loaded from [DatasetArgs].
pub trait LoadDataset
where
    Self: 'static + ReidDataset + Sized,
{
    fn load(args: &DatasetArgs) -> Result<Self>;
}

/// The arguments passed to dataset adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetArgs {
    /// The directory containing dataset directories.
    pub root: PathBuf,
    /// If set, log the dataset statistics after loading.
    pub verbose: bool,
    /// The offset added to every identity.
    pub pid_begin: usize,
    /// Adapter specific options.
    pub options: DatasetOptions,
}

impl DatasetArgs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            verbose: true,
            pid_begin: 0,
            options: DatasetOptions::None,
        }
    }

    pub fn verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    pub fn pid_begin(self, pid_begin: usize) -> Self {
        Self { pid_begin, ..self }
    }

    pub fn options(self, options: DatasetOptions) -> Self {
        Self { options, ..self }
    }
}

/// Logs the statistics of a loaded dataset if verbose output is enabled.
pub(crate) fn report_loaded(dataset: &dyn ReidDataset, args: &DatasetArgs) {
    if args.verbose {
        info!("=> {} loaded\n{}", dataset.name(), dataset.summary());
    }
}

/// Implements [ReidDataset] for adapters storing `train`, `query` and `gallery` fields.
macro_rules! impl_reid_dataset {
    ($ty:ty, $name:expr) => {
        impl $crate::dataset::ReidDataset for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn train(&self) -> &[$crate::record::ImageRecord] {
                &self.train
            }

            fn query(&self) -> &[$crate::record::ImageRecord] {
                &self.query
            }

            fn gallery(&self) -> &[$crate::record::ImageRecord] {
                &self.gallery
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
}

pub(crate) use impl_reid_dataset;
