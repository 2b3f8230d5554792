//! Name-keyed dataset construction.

use crate::{
    common::*,
    dataset::{
        DatasetArgs, DukeMtmcReid, LoadDataset, Market1501, Mot20, Msmt17, OccludedDuke,
        ReidDataset, VehicleId, Veri,
    },
};

/// The function that builds a dataset from arguments.
pub type DatasetConstructor = fn(&DatasetArgs) -> Result<Box<dyn ReidDataset>>;

/// The immutable mapping from dataset names to dataset constructors.
///
/// Names are case-sensitive.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    entries: IndexMap<String, DatasetConstructor>,
}

impl DatasetRegistry {
    /// The registry of all bundled dataset adapters.
    ///
    /// MOT20 is registered as `mot20`. Older configurations used the
    /// misspelled key `mot repairing20`, which is not registered.
    pub fn builtin() -> Self {
        let entries: [(&str, DatasetConstructor); 7] = [
            ("market1501", construct::<Market1501>),
            ("dukemtmc", construct::<DukeMtmcReid>),
            ("msmt17", construct::<Msmt17>),
            ("occ_duke", construct::<OccludedDuke>),
            ("veri", construct::<Veri>),
            ("VehicleID", construct::<VehicleId>),
            ("mot20", construct::<Mot20>),
        ];
        Self::from_entries(entries)
    }

    /// Builds a registry from a fixed table.
    ///
    /// Later entries replace earlier ones with the same name.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, DatasetConstructor)>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, constructor)| (name.into(), constructor))
            .collect();
        Self { entries }
    }

    /// The registered dataset names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Builds the dataset registered under `name`.
    pub fn init_dataset(&self, name: &str, args: &DatasetArgs) -> Result<Box<dyn ReidDataset>> {
        let constructor =
            self.entries
                .get(name)
                .ok_or_else(|| DatasetError::UnknownDataset {
                    name: name.to_owned(),
                    available: self.names().map(ToOwned::to_owned).collect(),
                })?;

        debug!("initialize dataset '{}' from '{}'", name, args.root.display());
        constructor(args)
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn construct<D>(args: &DatasetArgs) -> Result<Box<dyn ReidDataset>>
where
    D: LoadDataset,
{
    Ok(Box::new(D::load(args)?))
}
