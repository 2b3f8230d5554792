use super::{
    dataset_::{impl_reid_dataset, report_loaded},
    market1501::SINGLE_TRACK,
    *,
};
use crate::{common::*, record::ImageRecord, utils};

/// The MSMT17 person dataset.
///
/// Identities are listed in `list_{train,val,query,gallery}.txt`, one
/// `<relative_path> <pid>` per line. The camera is the third `_`-separated
/// field of the image file name. The validation list is merged into the
/// training split.
#[derive(Debug, Clone)]
pub struct Msmt17 {
    pub dataset_dir: PathBuf,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl Msmt17 {
    pub const NAME: &'static str = "MSMT17";
    pub const DIR_NAME: &'static str = "MSMT17";
}

impl LoadDataset for Msmt17 {
    fn load(args: &DatasetArgs) -> Result<Self> {
        args.options.expect_none(Self::NAME)?;

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let train_dir = dataset_dir.join("train");
        let test_dir = dataset_dir.join("test");
        let list_train = dataset_dir.join("list_train.txt");
        let list_val = dataset_dir.join("list_val.txt");
        let list_query = dataset_dir.join("list_query.txt");
        let list_gallery = dataset_dir.join("list_gallery.txt");

        utils::check_paths([
            ("root directory", args.root.as_path()),
            ("dataset directory", dataset_dir.as_path()),
            ("train directory", train_dir.as_path()),
            ("test directory", test_dir.as_path()),
            ("label file", list_train.as_path()),
            ("label file", list_val.as_path()),
            ("label file", list_query.as_path()),
            ("label file", list_gallery.as_path()),
        ])?;

        let mut train = load_list(&train_dir, &list_train, args.pid_begin)?;
        train.extend(load_list(&train_dir, &list_val, args.pid_begin)?);
        let query = load_list(&test_dir, &list_query, args.pid_begin)?;
        let gallery = load_list(&test_dir, &list_gallery, args.pid_begin)?;

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

impl_reid_dataset!(Msmt17, Msmt17::NAME);

fn load_list(image_dir: &Path, list_file: &Path, pid_begin: usize) -> Result<Vec<ImageRecord>> {
    utils::parse_label_file(list_file, 2, |line| {
        let path = image_dir.join(line.fields[0]);
        let pid: usize = line.parse(1, "person id")?;
        let camera = camera_of(&path)?;
        utils::ensure_image_file(&path)?;
        Ok(ImageRecord::new(path, pid_begin + pid, camera, SINGLE_TRACK))
    })
}

/// Extracts the zero-based camera id from a file name like `0000_000_01_0303morning_0015_0.jpg`.
fn camera_of(path: &Path) -> Result<usize> {
    let camera: usize = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('_').nth(2))
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| DatasetError::InvalidFileName {
            path: path.to_owned(),
        })?;

    camera.checked_sub(1).ok_or_else(|| DatasetError::InvalidLabel {
        path: path.to_owned(),
        reason: "camera numbers start from 1".to_owned(),
    })
}
