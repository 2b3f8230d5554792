use crate::common::*;

/// A labeled image of a dataset split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRecord {
    /// The absolute or root-relative path to the image file.
    pub path: PathBuf,
    /// The identity label.
    pub pid: usize,
    /// The zero-based camera label.
    pub camid: usize,
    /// The track or view label. It is zero if the dataset has no such concept.
    pub trackid: usize,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, pid: usize, camid: usize, trackid: usize) -> Self {
        Self {
            path: path.into(),
            pid,
            camid,
            trackid,
        }
    }
}

/// The statistics of a list of records.
///
/// It is always computed from the records and never stored along with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SplitInfo {
    pub num_pids: usize,
    pub num_imgs: usize,
    pub num_cams: usize,
    pub num_vids: usize,
}

impl SplitInfo {
    pub fn from_records(records: &[ImageRecord]) -> Self {
        Self {
            num_pids: records.iter().map(|record| record.pid).unique().count(),
            num_imgs: records.len(),
            num_cams: records.iter().map(|record| record.camid).unique().count(),
            num_vids: records.iter().map(|record| record.trackid).unique().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_info_counts_distinct_labels() {
        let records = vec![
            ImageRecord::new("a/1.jpg", 0, 1, 0),
            ImageRecord::new("a/2.jpg", 0, 2, 0),
            ImageRecord::new("a/3.jpg", 1, 1, 0),
        ];
        let info = SplitInfo::from_records(&records);
        assert_eq!(
            info,
            SplitInfo {
                num_pids: 2,
                num_imgs: 3,
                num_cams: 2,
                num_vids: 1,
            }
        );
    }

    #[test]
    fn split_info_of_empty_split() {
        assert_eq!(SplitInfo::from_records(&[]), SplitInfo::default());
    }
}
