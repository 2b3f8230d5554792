use super::{
    dataset_::{impl_reid_dataset, report_loaded},
    *,
};
use crate::{
    common::*,
    record::ImageRecord,
    utils::{self, NamePattern},
};

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d]+)_c(\d\d\d)").unwrap());

/// The VeRi-776 vehicle dataset.
///
/// With [VeriOptions::view_labels] enabled, the track id of each image is its
/// view label, and images without a view label are left out.
#[derive(Debug, Clone)]
pub struct Veri {
    pub dataset_dir: PathBuf,
    train: Vec<ImageRecord>,
    query: Vec<ImageRecord>,
    gallery: Vec<ImageRecord>,
}

impl Veri {
    pub const NAME: &'static str = "VeRi";
    pub const DIR_NAME: &'static str = "VeRi";
}

impl LoadDataset for Veri {
    fn load(args: &DatasetArgs) -> Result<Self> {
        let VeriOptions { view_labels } = args.options.veri(Self::NAME)?;

        let dataset_dir = args.root.join(Self::DIR_NAME);
        let train_dir = dataset_dir.join("image_train");
        let query_dir = dataset_dir.join("image_query");
        let gallery_dir = dataset_dir.join("image_test");
        let keypoint_files = [
            dataset_dir.join("keypoint_train.txt"),
            dataset_dir.join("keypoint_test.txt"),
        ];

        utils::check_paths([
            ("root directory", args.root.as_path()),
            ("dataset directory", dataset_dir.as_path()),
            ("train directory", train_dir.as_path()),
            ("query directory", query_dir.as_path()),
            ("gallery directory", gallery_dir.as_path()),
        ])?;
        if view_labels {
            utils::check_paths(
                keypoint_files
                    .iter()
                    .map(|path| ("view label file", path.as_path())),
            )?;
        }

        let pattern = NamePattern {
            regex: &NAME_REGEX,
            max_pid: 776,
            cams: 1..=20,
        };
        let views = if view_labels {
            Some(load_views(&keypoint_files)?)
        } else {
            None
        };

        let load_split = |dir: &Path| -> Result<Vec<ImageRecord>> {
            let records = utils::load_named_split(dir, &pattern, args.pid_begin, 0)?;
            let views = match &views {
                Some(views) => views,
                None => return Ok(records),
            };

            let num_records = records.len();
            let records: Vec<_> = records
                .into_iter()
                .filter_map(|record| {
                    let file_name = record.path.file_name()?.to_str()?;
                    let trackid = *views.get(file_name)?;
                    Some(ImageRecord { trackid, ..record })
                })
                .collect();

            let num_missing = num_records - records.len();
            if num_missing > 0 {
                warn!(
                    "{} images in '{}' have no view label and are ignored",
                    num_missing,
                    dir.display()
                );
            }
            Ok(records)
        };

        let train = load_split(&train_dir)?;
        let query = load_split(&query_dir)?;
        let gallery = load_split(&gallery_dir)?;

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

impl_reid_dataset!(Veri, Veri::NAME);

/// Reads view labels keyed by image file name. The view is the last field of each line.
fn load_views(files: &[PathBuf]) -> Result<HashMap<String, usize>> {
    let mut views = HashMap::new();

    for file in files {
        let text = fs::read_to_string(file).map_err(|err| DatasetError::io(file, err))?;

        for (index, content) in text.lines().enumerate() {
            let fields: Vec<_> = content.split_whitespace().collect();
            let (first, last) = match (fields.first(), fields.last()) {
                (Some(first), Some(last)) if fields.len() >= 2 => (first, last),
                (None, _) => continue,
                _ => {
                    return Err(DatasetError::MalformedLabelLine {
                        path: file.to_owned(),
                        line: index + 1,
                        content: content.trim().to_owned(),
                        expected: 2,
                        found: fields.len(),
                    })
                }
            };

            let view: usize = last.parse().map_err(|_| DatasetError::InvalidField {
                path: file.to_owned(),
                line: index + 1,
                field: "view id",
                value: (*last).to_owned(),
            })?;
            let image = first.rsplit('/').next().unwrap_or(*first);
            views.insert(image.to_owned(), view);
        }
    }

    Ok(views)
}
