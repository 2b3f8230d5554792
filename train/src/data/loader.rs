use super::{LabelMap, RandomIdentitySampler};
use crate::{common::*, config::Config};

/// A batch of images with parallel label vectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    pub paths: Vec<PathBuf>,
    pub pids: Vec<usize>,
    pub camids: Vec<usize>,
    pub trackids: Vec<usize>,
}

impl Batch {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ImageRecord>,
    {
        let mut batch = Self::default();
        for record in records {
            batch.paths.push(record.path.clone());
            batch.pids.push(record.pid);
            batch.camids.push(record.camid);
            batch.trackids.push(record.trackid);
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The order in which a [DataLoader] visits its records.
#[derive(Debug, Clone)]
pub enum BatchOrder {
    /// Visit records in order.
    Sequential,
    /// Visit records in a random permutation per epoch.
    Shuffled { seed: u64 },
    /// Visit records by P×K identity batches.
    Identity {
        sampler: RandomIdentitySampler,
        seed: u64,
    },
}

/// Batches records for an epoch.
///
/// Randomized orders draw from an RNG seeded by the loader seed and the
/// epoch number, so an epoch is reproducible.
#[derive(Debug, Clone)]
pub struct DataLoader {
    records: Arc<[ImageRecord]>,
    batch_size: usize,
    order: BatchOrder,
}

impl DataLoader {
    pub fn sequential(records: impl Into<Arc<[ImageRecord]>>, batch_size: NonZeroUsize) -> Self {
        Self {
            records: records.into(),
            batch_size: batch_size.get(),
            order: BatchOrder::Sequential,
        }
    }

    pub fn shuffled(
        records: impl Into<Arc<[ImageRecord]>>,
        batch_size: NonZeroUsize,
        seed: u64,
    ) -> Self {
        Self {
            records: records.into(),
            batch_size: batch_size.get(),
            order: BatchOrder::Shuffled { seed },
        }
    }

    pub fn identity(
        records: impl Into<Arc<[ImageRecord]>>,
        sampler: RandomIdentitySampler,
        seed: u64,
    ) -> Self {
        Self {
            records: records.into(),
            batch_size: sampler.batch_size(),
            order: BatchOrder::Identity { sampler, seed },
        }
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn order(&self) -> &BatchOrder {
        &self.order
    }

    /// The nominal number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        let num_samples = match &self.order {
            BatchOrder::Sequential | BatchOrder::Shuffled { .. } => self.records.len(),
            BatchOrder::Identity { sampler, .. } => sampler.len(),
        };
        (num_samples + self.batch_size - 1) / self.batch_size
    }

    /// Iterates the batches of an epoch.
    pub fn epoch(&self, epoch: usize) -> impl Iterator<Item = Batch> + '_ {
        let indices: Vec<usize> = match &self.order {
            BatchOrder::Sequential => (0..self.records.len()).collect(),
            BatchOrder::Shuffled { seed } => {
                let mut indices: Vec<_> = (0..self.records.len()).collect();
                indices.shuffle(&mut epoch_rng(*seed, epoch));
                indices
            }
            BatchOrder::Identity { sampler, seed } => sampler.sample(&mut epoch_rng(*seed, epoch)),
        };
        let batch_size = self.batch_size;

        (0..indices.len())
            .step_by(batch_size)
            .map(move |start| {
                let end = (start + batch_size).min(indices.len());
                Batch::from_records(indices[start..end].iter().map(|&index| &self.records[index]))
            })
    }
}

fn epoch_rng(seed: u64, epoch: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(epoch as u64))
}

/// The loaders and label cardinalities handed to the training backend.
#[derive(Debug, Clone)]
pub struct DataLoaders {
    pub dataset_name: &'static str,
    /// Training batches by the configured sampler, with dense labels.
    pub train_loader: DataLoader,
    /// Sequential training batches with dense labels.
    pub train_loader_normal: DataLoader,
    /// Sequential batches over query followed by gallery, with original labels.
    pub val_loader: DataLoader,
    /// The number of leading query records in `val_loader`.
    pub num_query: usize,
    pub num_classes: usize,
    pub camera_num: usize,
    pub view_num: usize,
    /// The dense training identities.
    pub pid_map: LabelMap,
    /// The dense training cameras.
    pub camid_map: LabelMap,
}

/// Loads the configured dataset and builds the training and validation loaders.
pub fn make_dataloader<R>(
    config: &Config,
    registry: &DatasetRegistry,
    rng: &mut R,
) -> Result<DataLoaders>
where
    R: Rng,
{
    let dataset_config = &config.dataset;
    let dataset = registry
        .init_dataset(&dataset_config.names, &dataset_config.to_args())
        .with_context(|| format!("failed to load dataset '{}'", dataset_config.names))?;
    ensure!(
        !dataset.train().is_empty(),
        "the training split of dataset '{}' is empty",
        dataset_config.names
    );

    let pid_map = LabelMap::new(dataset.train().iter().map(|record| record.pid));
    let camid_map = LabelMap::new(dataset.train().iter().map(|record| record.camid));
    let train: Arc<[ImageRecord]> = dataset
        .train()
        .iter()
        .map(|record| -> Result<_> {
            let pid = pid_map
                .get(record.pid)
                .ok_or_else(|| format_err!("unmapped identity {}", record.pid))?;
            let camid = camid_map
                .get(record.camid)
                .ok_or_else(|| format_err!("unmapped camera {}", record.camid))?;
            Ok(ImageRecord {
                pid,
                camid,
                ..record.clone()
            })
        })
        .collect::<Result<_>>()?;

    let train_info = dataset.train_info();
    let num_classes = pid_map.len();
    let camera_num = camid_map.len();
    let view_num = train_info.num_vids;

    let train_seed: u64 = rng.gen();
    let solver = &config.solver;
    let train_loader = if config.dataloader.sampler.uses_triplet() {
        info!("using identity sampler for training");
        let sampler = RandomIdentitySampler::new(
            &train,
            solver.ims_per_batch.get(),
            config.dataloader.num_instance.get(),
        )?;
        DataLoader::identity(train.clone(), sampler, train_seed)
    } else {
        info!("using shuffled sampler for training");
        DataLoader::shuffled(train.clone(), solver.ims_per_batch, train_seed)
    };
    let train_loader_normal = DataLoader::sequential(train, config.test.ims_per_batch);

    let num_query = dataset.query().len();
    let val_records: Vec<_> = dataset
        .query()
        .iter()
        .chain(dataset.gallery())
        .cloned()
        .collect();
    let val_loader = DataLoader::sequential(val_records, config.test.ims_per_batch);

    debug!(
        "{} identities, {} cameras, {} views in training split",
        num_classes, camera_num, view_num
    );

    Ok(DataLoaders {
        dataset_name: dataset.name(),
        train_loader,
        train_loader_normal,
        val_loader,
        num_query,
        num_classes,
        camera_num,
        view_num,
        pid_map,
        camid_map,
    })
}
