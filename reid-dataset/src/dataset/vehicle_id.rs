use super::{
    dataset_::{impl_reid_dataset, report_loaded},
    *,
};
use crate::{common::*, record::ImageRecord, utils};

const TEST_SIZES: [usize; 3] = [800, 1600, 2400];
const QUERY_CAMERA: usize = 0;
const GALLERY_CAMERA: usize = 1;

/// The PKU VehicleID dataset.
///
/// The list files contain `<image_name> <vehicle_id>` lines where image names
/// have no extension. The test list is split by drawing one gallery image per
/// vehicle, and the remaining images of the vehicle become queries. Query and
/// gallery images get distinct camera ids so that no true match is filtered
/// out as a same-camera match.
#[derive(Debug, Clone)]
pub struct VehicleId {
    pub dataset_dir: PathBuf,
    pub test_size: usize,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl VehicleId {
    pub const NAME: &'static str = "VehicleID";
    pub const DIR_NAME: &'static str = "VehicleID_V1.0";
}

impl LoadDataset for VehicleId {
    fn load(args: &DatasetArgs) -> Result<Self> {
        let VehicleIdOptions { test_size, seed } = args.options.vehicle_id(Self::NAME)?;
        if !TEST_SIZES.contains(&test_size) {
            return Err(DatasetError::InvalidOptions {
                dataset: Self::NAME,
                reason: format!(
                    "test_size must be one of {:?}, but get {}",
                    TEST_SIZES, test_size
                ),
            });
        }

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let image_dir = dataset_dir.join("image");
        let split_dir = dataset_dir.join("train_test_split");
        let train_list = split_dir.join("train_list.txt");
        let test_list = split_dir.join(format!("test_list_{}.txt", test_size));

        utils::check_paths([
            ("root directory", args.root.as_path()),
            ("dataset directory", dataset_dir.as_path()),
            ("images directory", image_dir.as_path()),
            ("split directory", split_dir.as_path()),
            ("label file", train_list.as_path()),
            ("label file", test_list.as_path()),
        ])?;

        let train: Vec<_> = load_list(&image_dir, &train_list)?
            .into_iter()
            .map(|(path, vid)| ImageRecord::new(path, args.pid_begin + vid, 0, 0))
            .collect();

        let (query, gallery) = {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut groups: IndexMap<usize, Vec<PathBuf>> = IndexMap::new();
            for (path, vid) in load_list(&image_dir, &test_list)? {
                groups.entry(vid).or_default().push(path);
            }

            let mut query = vec![];
            let mut gallery = vec![];

            for (vid, paths) in groups {
                let pid = args.pid_begin + vid;
                let gallery_index = rng.gen_range(0..paths.len());

                for (index, path) in paths.into_iter().enumerate() {
                    if index == gallery_index {
                        gallery.push(ImageRecord::new(path, pid, GALLERY_CAMERA, 0));
                    } else {
                        query.push(ImageRecord::new(path, pid, QUERY_CAMERA, 0));
                    }
                }
            }

            (query, gallery)
        };

        let dataset = Self {
            dataset_dir,
            test_size,
            train,
            query,
            gallery,
        };
        report_loaded(&dataset, args);
        Ok(dataset)
    }
}

impl_reid_dataset!(VehicleId, VehicleId::NAME);

fn load_list(image_dir: &Path, list_file: &Path) -> Result<Vec<(PathBuf, usize)>> {
    utils::parse_label_file(list_file, 2, |line| {
        let path = image_dir.join(format!("{}.jpg", line.fields[0]));
        let vid: usize = line.parse(1, "vehicle id")?;
        utils::ensure_image_file(&path)?;
        Ok((path, vid))
    })
}
