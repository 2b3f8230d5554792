use crate::{common::*, record::SplitInfo};
use prettytable::{cell, row, Table};

/// The per-split statistics of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub name: &'static str,
    pub train: SplitInfo,
    pub query: SplitInfo,
    pub gallery: SplitInfo,
}

impl DatasetSummary {
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["subset", "# ids", "# images", "# cameras", "# views"]);

        [
            ("train", &self.train),
            ("query", &self.query),
            ("gallery", &self.gallery),
        ]
        .into_iter()
        .for_each(|(subset, info)| {
            table.add_row(row![
                subset,
                info.num_pids,
                info.num_imgs,
                info.num_cams,
                info.num_vids
            ]);
        });

        table
    }
}

impl Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset statistics:")?;
        write!(f, "{}", self.to_table())
    }
}
