use super::{
    dataset_::{impl_reid_dataset, report_loaded},
    market1501::load_bounding_box_layout,
    *,
};
use crate::{common::*, record::ImageRecord, utils::NamePattern};

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"([-\d]+)_c(\d)").unwrap());

fn duke_pattern() -> NamePattern {
    NamePattern {
        regex: &NAME_REGEX,
        max_pid: i64::MAX,
        cams: 1..=8,
    }
}

/// The DukeMTMC-reID person dataset.
#[derive(Debug, Clone)]
pub struct DukeMtmcReid {
    pub dataset_dir: PathBuf,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl DukeMtmcReid {
    pub const NAME: &'static str = "DukeMTMC-reID";
    pub const DIR_NAME: &'static str = "DukeMTMC-reID";
}

impl LoadDataset for DukeMtmcReid {
    fn load(args: &DatasetArgs) -> Result<Self> {
        args.options.expect_none(Self::NAME)?;

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let [train, query, gallery] =
            load_bounding_box_layout(args, &dataset_dir, &duke_pattern())?;

        let dataset = Self {
            dataset_dir,
            train,
            query,
            gallery,
        };
        report_loaded(&dataset, args);
        Ok(dataset)
    }
}

impl_reid_dataset!(DukeMtmcReid, DukeMtmcReid::NAME);

/// The Occluded-DukeMTMC person dataset.
///
/// It shares the directory layout and naming of DukeMTMC-reID.
#[derive(Debug, Clone)]
pub struct OccludedDuke {
    pub dataset_dir: PathBuf,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl OccludedDuke {
    pub const NAME: &'static str = "Occluded-Duke";
    pub const DIR_NAME: &'static str = "Occluded_Duke";
}

impl LoadDataset for OccludedDuke {
    fn load(args: &DatasetArgs) -> Result<Self> {
        args.options.expect_none(Self::NAME)?;

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let [train, query, gallery] =
            load_bounding_box_layout(args, &dataset_dir, &duke_pattern())?;

        let dataset = Self {
            dataset_dir,
            train,
            query,
            gallery,
        };
        report_loaded(&dataset, args);
        Ok(dataset)
    }
}

impl_reid_dataset!(OccludedDuke, OccludedDuke::NAME);
