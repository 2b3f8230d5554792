//! The training program of ReID models.

pub mod backend;
pub mod common;
pub mod config;
pub mod data;
pub mod logging;
pub mod utils;

use crate::{
    backend::{HeadDims, TrainingBackend, TrainingJob},
    common::*,
    config::Config,
};

pub const CONFIG_FILE_NAME: &str = "config.json5";
pub const CHECKPOINT_DIR_NAME: &str = "checkpoints";

/// The entry of training program.
///
/// It prepares the output directory, loads the dataset and hands the loaders
/// to the backend.
pub async fn start<B>(
    config: Arc<Config>,
    registry: Arc<DatasetRegistry>,
    mut backend: B,
) -> Result<B::Output>
where
    B: TrainingBackend,
{
    let output_dir = config.output_dir.clone();
    let checkpoint_dir = output_dir.join(CHECKPOINT_DIR_NAME);

    // create dirs and save config
    {
        tokio::fs::create_dir_all(&checkpoint_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create checkpoint directory '{}'",
                    checkpoint_dir.display()
                )
            })?;
        let path = output_dir.join(CONFIG_FILE_NAME);
        let text = serde_json::to_string_pretty(&*config)?;
        tokio::fs::write(&path, text).await?;
    }

    let output = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut rng = StdRng::seed_from_u64(config.solver.seed);

        // load dataset
        info!("loading dataset '{}'", config.dataset.names);
        let loaders = data::make_dataloader(&config, &registry, &mut rng)?;

        let dims = HeadDims::from(&loaders);
        let model = backend.make_model(&config, dims)?;
        let loss = backend.make_loss(&config, loaders.num_classes)?;
        let optimizer = backend.make_optimizer(&config, &model)?;

        backend.do_train(TrainingJob {
            config: &config,
            model,
            loss,
            optimizer,
            loaders: &loaders,
            num_query: loaders.num_query,
            checkpoint_dir: &checkpoint_dir,
        })
    })
    .instrument(info_span!("train"))
    .await??;

    Ok(output)
}
