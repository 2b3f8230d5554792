use super::{
    dataset_::{impl_reid_dataset, report_loaded},
    *,
};
use crate::{
    common::*,
    record::ImageRecord,
    utils::{self, NamePattern},
};

/// The track id of datasets where every crop is its own tracklet.
pub(crate) const SINGLE_TRACK: usize = 1;

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"([-\d]+)_c(\d)").unwrap());

/// The Market-1501 person dataset.
///
/// The images are stored in `market1501/{bounding_box_train,query,bounding_box_test}`
/// and labeled by their file names.
#[derive(Debug, Clone)]
pub struct Market1501 {
    pub dataset_dir: PathBuf,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl Market1501 {
    pub const NAME: &'static str = "Market1501";
    pub const DIR_NAME: &'static str = "market1501";
}

impl LoadDataset for Market1501 {
    fn load(args: &DatasetArgs) -> Result<Self> {
        args.options.expect_none(Self::NAME)?;

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let pattern = NamePattern {
            regex: &NAME_REGEX,
            max_pid: 1501,
            cams: 1..=6,
        };
        let [train, query, gallery] = load_bounding_box_layout(args, &dataset_dir, &pattern)?;

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

impl_reid_dataset!(Market1501, Market1501::NAME);

/// Loads the `bounding_box_train`, `query` and `bounding_box_test` directories
/// shared by Market-1501 and DukeMTMC-reID style datasets.
pub(crate) fn load_bounding_box_layout(
    args: &DatasetArgs,
    dataset_dir: &Path,
    pattern: &NamePattern,
) -> Result<[Vec<ImageRecord>; 3]> {
    let train_dir = dataset_dir.join("bounding_box_train");
    let query_dir = dataset_dir.join("query");
    let gallery_dir = dataset_dir.join("bounding_box_test");

    utils::check_paths([
        ("root directory", args.root.as_path()),
        ("dataset directory", dataset_dir),
        ("train directory", train_dir.as_path()),
        ("query directory", query_dir.as_path()),
        ("gallery directory", gallery_dir.as_path()),
    ])?;

    let train = utils::load_named_split(&train_dir, pattern, args.pid_begin, SINGLE_TRACK)?;
    let query = utils::load_named_split(&query_dir, pattern, args.pid_begin, SINGLE_TRACK)?;
    let gallery = utils::load_named_split(&gallery_dir, pattern, args.pid_begin, SINGLE_TRACK)?;

    Ok([train, query, gallery])
}
