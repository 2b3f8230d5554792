use super::{
    dataset_::{impl_reid_dataset, report_loaded},
    *,
};
use crate::{common::*, record::ImageRecord, utils};

/// The track id of MOT20 crops. The dataset has no track labels.
const TRACK_ID: usize = 0;

/// The MOT20 person crops dataset.
///
/// The layout is
///
/// ```text
/// <root>/MOT20/images/
/// ├── train/
/// ├── train.txt
/// ├── query.txt    (optional)
/// └── gallery.txt  (optional)
/// ```
///
/// where each label file line is `<relative_image_path> <pid> <camid>` and
/// image paths are relative to the `images` directory.
///
/// Query and gallery splits are only loaded when both `query.txt` and
/// `gallery.txt` are present. Otherwise they are empty and the dataset cannot
/// be used for evaluation.
#[derive(Debug, Clone)]
pub struct Mot20 {
    pub dataset_dir: PathBuf,
    pub images_dir: PathBuf,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl Mot20 {
    pub const NAME: &'static str = "MOT20";
    pub const DIR_NAME: &'static str = "MOT20";
}

impl LoadDataset for Mot20 {
    fn load(args: &DatasetArgs) -> Result<Self> {
        args.options.expect_none(Self::NAME)?;

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let images_dir = dataset_dir.join("images");
        let train_dir = images_dir.join("train");
        let train_label = images_dir.join("train.txt");
        let query_label = images_dir.join("query.txt");
        let gallery_label = images_dir.join("gallery.txt");

        // check before parsing anything
        utils::check_paths([
            ("root directory", args.root.as_path()),
            ("dataset directory", dataset_dir.as_path()),
            ("images directory", images_dir.as_path()),
            ("train directory", train_dir.as_path()),
            ("label file", train_label.as_path()),
        ])?;
        let eval_labels = match (query_label.exists(), gallery_label.exists()) {
            (true, true) => Some((query_label, gallery_label)),
            (false, false) => None,
            (true, false) => {
                return Err(DatasetError::MissingPath {
                    what: "gallery label file",
                    path: gallery_label,
                })
            }
            (false, true) => {
                return Err(DatasetError::MissingPath {
                    what: "query label file",
                    path: query_label,
                })
            }
        };

        let train = load_label_file(&images_dir, &train_label, args.pid_begin)?;
        let (query, gallery) = match eval_labels {
            Some((query_label, gallery_label)) => (
                load_label_file(&images_dir, &query_label, args.pid_begin)?,
                load_label_file(&images_dir, &gallery_label, args.pid_begin)?,
            ),
            None => {
                warn!(
                    "no query.txt and gallery.txt in '{}', evaluation on {} is not supported",
                    images_dir.display(),
                    Self::NAME
                );
                (vec![], vec![])
            }
        };

        let dataset = Self {
            dataset_dir,
            images_dir,
            train,
            query,
            gallery,
        };
        report_loaded(&dataset, args);
        Ok(dataset)
    }
}

impl_reid_dataset!(Mot20, Mot20::NAME);

fn load_label_file(
    images_dir: &Path,
    label_file: &Path,
    pid_begin: usize,
) -> Result<Vec<ImageRecord>> {
    utils::parse_label_file(label_file, 3, |line| {
        let path = images_dir.join(line.fields[0]);
        let pid: usize = line.parse(1, "person id")?;
        let camid: usize = line.parse(2, "camera id")?;
        utils::ensure_image_file(&path)?;
        Ok(ImageRecord::new(path, pid_begin + pid, camid, TRACK_ID))
    })
}
