//! Training program configuration format.

use crate::common::*;
use reid_dataset::{DatasetArgs, DatasetOptions};
use serde_json::Value;

pub use dataloader::*;
pub use dataset::*;
pub use evaluation::*;
pub use model::*;
pub use solver::*;

/// The main training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The directory to store logs, the resolved config and checkpoints.
    pub output_dir: PathBuf,
    pub dataset: DatasetConfig,
    pub dataloader: DataLoaderConfig,
    pub model: ModelConfig,
    pub solver: SolverConfig,
    pub test: TestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("logs"),
            dataset: DatasetConfig::default(),
            dataloader: DataLoaderConfig::default(),
            model: ModelConfig::default(),
            solver: SolverConfig::default(),
            test: TestConfig::default(),
        }
    }
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    /// Loads the optional configuration file and applies command line overrides.
    pub fn load(file: Option<&Path>, opts: &[String]) -> Result<Self> {
        let config = match file {
            Some(file) => Self::open(file)
                .with_context(|| format!("failed to load config file '{}'", file.display()))?,
            None => Self::default(),
        };
        config.with_overrides(opts)
    }

    /// Applies `key value` pairs where keys are dotted paths like `solver.base_lr`.
    ///
    /// Each value is parsed as a JSON5 literal, and falls back to a plain
    /// string if it is not one.
    pub fn with_overrides<S>(&self, opts: &[S]) -> Result<Self>
    where
        S: AsRef<str>,
    {
        ensure!(
            opts.len() % 2 == 0,
            "config overrides must be key value pairs, but get {} arguments",
            opts.len()
        );

        let mut value = serde_json::to_value(self)?;
        for (key, literal) in opts.iter().tuples() {
            apply_override(&mut value, key.as_ref(), literal.as_ref())?;
        }

        let config = serde_json::from_value(value).context("invalid config overrides")?;
        Ok(config)
    }
}

fn apply_override(root: &mut Value, key: &str, literal: &str) -> Result<()> {
    let slot = key.split('.').try_fold(root, |value, name| {
        value
            .as_object_mut()
            .and_then(|object| object.get_mut(name))
            .ok_or_else(|| format_err!("unknown config key '{}'", key))
    })?;
    *slot = json5::from_str(literal).unwrap_or_else(|_| Value::String(literal.to_owned()));
    Ok(())
}

mod dataset {
    use super::*;

    /// Dataset options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct DatasetConfig {
        /// The registry name of the dataset.
        pub names: String,
        /// The directory containing dataset directories.
        pub root_dir: PathBuf,
        pub verbose: bool,
        /// The offset added to every identity.
        pub pid_begin: usize,
        /// Adapter specific options.
        pub options: DatasetOptions,
    }

    impl DatasetConfig {
        pub fn to_args(&self) -> DatasetArgs {
            DatasetArgs::new(&self.root_dir)
                .verbose(self.verbose)
                .pid_begin(self.pid_begin)
                .options(self.options.clone())
        }
    }

    impl Default for DatasetConfig {
        fn default() -> Self {
            Self {
                names: "market1501".into(),
                root_dir: PathBuf::from("../data"),
                verbose: true,
                pid_begin: 0,
                options: DatasetOptions::None,
            }
        }
    }
}

mod dataloader {
    use super::*;

    /// Batching options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct DataLoaderConfig {
        pub sampler: SamplerKind,
        /// The number of images per identity in a batch.
        pub num_instance: NonZeroUsize,
        /// The number of loading workers used by the training backend.
        pub num_workers: usize,
    }

    impl Default for DataLoaderConfig {
        fn default() -> Self {
            Self {
                sampler: SamplerKind::SoftmaxTriplet,
                num_instance: NonZeroUsize::new(4).unwrap(),
                num_workers: 8,
            }
        }
    }

    /// The training sampler, named after the losses it serves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SamplerKind {
        Softmax,
        Triplet,
        SoftmaxTriplet,
    }

    impl SamplerKind {
        /// Returns true if batches are drawn identity by identity.
        pub fn uses_triplet(&self) -> bool {
            matches!(self, Self::Triplet | Self::SoftmaxTriplet)
        }
    }
}

mod model {
    use super::*;

    /// The model options passed to the training backend.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ModelConfig {
        pub name: String,
        /// Enable side information embedding of cameras.
        pub sie_camera: bool,
        /// Enable side information embedding of views.
        pub sie_view: bool,
    }

    impl Default for ModelConfig {
        fn default() -> Self {
            Self {
                name: "transformer".into(),
                sie_camera: false,
                sie_view: false,
            }
        }
    }
}

mod evaluation {
    use super::*;

    /// The evaluation options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct TestConfig {
        pub ims_per_batch: NonZeroUsize,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                ims_per_batch: NonZeroUsize::new(128).unwrap(),
            }
        }
    }
}

mod solver {
    use super::*;

    /// The training options.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SolverConfig {
        /// The seed of all randomness in the training program.
        pub seed: u64,
        pub max_epochs: usize,
        /// The training batch size.
        pub ims_per_batch: NonZeroUsize,
        pub base_lr: R64,
        /// The number of epochs to linearly increase the learning rate.
        pub warmup_epochs: usize,
        /// Save a checkpoint file per this number of epochs.
        pub checkpoint_period: NonZeroUsize,
        /// Log the progress per this number of iterations.
        pub log_period: NonZeroUsize,
        /// Evaluate on the validation split per this number of epochs.
        pub eval_period: NonZeroUsize,
        /// Checkpoint file loading method.
        pub load_checkpoint: LoadCheckpoint,
        pub id_loss_weight: R64,
        pub triplet_loss_weight: R64,
        /// The triplet loss margin.
        pub margin: R64,
    }

    impl Default for SolverConfig {
        fn default() -> Self {
            Self {
                seed: 1234,
                max_epochs: 120,
                ims_per_batch: NonZeroUsize::new(64).unwrap(),
                base_lr: r64(0.008),
                warmup_epochs: 5,
                checkpoint_period: NonZeroUsize::new(120).unwrap(),
                log_period: NonZeroUsize::new(50).unwrap(),
                eval_period: NonZeroUsize::new(120).unwrap(),
                load_checkpoint: LoadCheckpoint::Disabled,
                id_loss_weight: r64(1.0),
                triplet_loss_weight: r64(1.0),
                margin: r64(0.3),
            }
        }
    }

    /// Checkpoint file loading method.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum LoadCheckpoint {
        /// Disable checkpoint file loading.
        Disabled,
        /// Load the most recent checkpoint file.
        FromRecent,
        /// Load the checkpoint file at specified path.
        FromFile { file: PathBuf },
    }
}
