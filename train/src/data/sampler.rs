use crate::common::*;

/// Draws P identities with K images each per batch.
///
/// Identities with fewer than K images are padded by sampling their images
/// with replacement. The leftover images of an identity that do not fill a
/// K-chunk are dropped for the epoch.
#[derive(Debug, Clone)]
pub struct RandomIdentitySampler {
    indices_by_pid: IndexMap<usize, Vec<usize>>,
    batch_size: usize,
    num_instances: usize,
    num_pids_per_batch: usize,
    length: usize,
}

impl RandomIdentitySampler {
    pub fn new(records: &[ImageRecord], batch_size: usize, num_instances: usize) -> Result<Self> {
        ensure!(num_instances > 0, "num_instance must be positive");
        ensure!(
            batch_size % num_instances == 0,
            "ims_per_batch ({}) must be a multiple of num_instance ({})",
            batch_size,
            num_instances
        );
        let num_pids_per_batch = batch_size / num_instances;
        ensure!(
            num_pids_per_batch > 0,
            "ims_per_batch must be positive"
        );

        let mut indices_by_pid: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for (index, record) in records.iter().enumerate() {
            indices_by_pid.entry(record.pid).or_default().push(index);
        }

        let length = indices_by_pid
            .values()
            .map(|indices| {
                let num = indices.len().max(num_instances);
                num - num % num_instances
            })
            .sum();

        if indices_by_pid.len() < num_pids_per_batch {
            warn!(
                "only {} identities are available, but {} identities are needed per batch",
                indices_by_pid.len(),
                num_pids_per_batch
            );
        }

        Ok(Self {
            indices_by_pid,
            batch_size,
            num_instances,
            num_pids_per_batch,
            length,
        })
    }

    /// The nominal number of indices per epoch.
    ///
    /// An epoch can emit fewer indices when identities run out of chunks
    /// unevenly.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_instances(&self) -> usize {
        self.num_instances
    }

    pub fn num_pids_per_batch(&self) -> usize {
        self.num_pids_per_batch
    }

    /// Produces the record indices of an epoch. Every consecutive
    /// `batch_size` indices form a batch.
    pub fn sample<R>(&self, rng: &mut R) -> Vec<usize>
    where
        R: Rng,
    {
        let num_instances = self.num_instances;

        let mut chunks_by_pid: IndexMap<usize, VecDeque<Vec<usize>>> = self
            .indices_by_pid
            .iter()
            .map(|(&pid, indices)| {
                let mut indices = if indices.len() < num_instances {
                    (0..num_instances)
                        .filter_map(|_| indices.choose(rng).copied())
                        .collect()
                } else {
                    indices.clone()
                };
                indices.shuffle(rng);

                let chunks: VecDeque<_> = indices
                    .chunks_exact(num_instances)
                    .map(|chunk| chunk.to_vec())
                    .collect();
                (pid, chunks)
            })
            .collect();

        let mut available: Vec<usize> = chunks_by_pid.keys().copied().collect();
        let mut output = Vec::with_capacity(self.length);

        while available.len() >= self.num_pids_per_batch {
            let selected: Vec<usize> = available
                .choose_multiple(rng, self.num_pids_per_batch)
                .copied()
                .collect();

            for pid in selected {
                let chunks = &mut chunks_by_pid[&pid];
                if let Some(chunk) = chunks.pop_front() {
                    output.extend(chunk);
                }
            }

            available.retain(|pid| !chunks_by_pid[pid].is_empty());
        }

        output
    }
}
