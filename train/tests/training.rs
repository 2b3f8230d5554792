mod common;

use anyhow::{ensure, Result};
use reid_dataset::DatasetRegistry;
use std::{fs, sync::Arc};
use train::{
    backend::{DryRunBackend, HeadDims, TrainingBackend, TrainingJob},
    config::Config,
    CHECKPOINT_DIR_NAME, CONFIG_FILE_NAME,
};

#[tokio::test]
async fn dry_run_training() -> Result<()> {
    let data_dir = tempfile::tempdir()?;
    let output_dir = tempfile::tempdir()?;
    common::mot20_tree(data_dir.path(), 4, 4, true)?;
    let config = Arc::new(common::mot20_config(
        data_dir.path(),
        output_dir.path().join("run"),
        &["dataloader.sampler", "softmax_triplet"],
    )?);

    let report = train::start(
        config.clone(),
        Arc::new(DatasetRegistry::builtin()),
        DryRunBackend,
    )
    .await?;

    // 4 identities of 4 images, 2 identities per batch
    assert_eq!(report.start_epoch, 1);
    assert_eq!(report.epochs, 2);
    assert_eq!(report.iterations, 4);
    assert_eq!(report.images, 32);
    assert_eq!(report.evaluations, 2);
    assert_eq!(report.checkpoints.len(), 2);

    let run_dir = output_dir.path().join("run");
    let saved = Config::open(run_dir.join(CONFIG_FILE_NAME))?;
    assert_eq!(saved, *config);

    let checkpoints: Vec<_> =
        fs::read_dir(run_dir.join(CHECKPOINT_DIR_NAME))?.collect::<Result<_, _>>()?;
    assert_eq!(checkpoints.len(), 2);
    Ok(())
}

#[tokio::test]
async fn resume_from_recent_checkpoint() -> Result<()> {
    let data_dir = tempfile::tempdir()?;
    let output_dir = tempfile::tempdir()?;
    common::mot20_tree(data_dir.path(), 4, 4, false)?;
    let registry = Arc::new(DatasetRegistry::builtin());

    let config = common::mot20_config(data_dir.path(), output_dir.path().into(), &[])?;
    let first = train::start(Arc::new(config), registry.clone(), DryRunBackend).await?;
    assert_eq!(first.epochs, 2);
    assert_eq!(first.evaluations, 0);

    let config = common::mot20_config(
        data_dir.path(),
        output_dir.path().into(),
        &[
            "solver.max_epochs",
            "3",
            "solver.load_checkpoint",
            "{type: 'from_recent'}",
        ],
    )?;
    let second = train::start(Arc::new(config), registry, DryRunBackend).await?;

    assert_eq!(second.start_epoch, 3);
    assert_eq!(second.epochs, 1);
    assert_eq!(
        second.iterations,
        first.iterations + first.iterations / first.epochs
    );
    Ok(())
}

#[tokio::test]
async fn missing_dataset_aborts() -> Result<()> {
    let data_dir = tempfile::tempdir()?;
    let output_dir = tempfile::tempdir()?;
    let config = common::mot20_config(data_dir.path(), output_dir.path().into(), &[])?;

    let err = train::start(
        Arc::new(config),
        Arc::new(DatasetRegistry::builtin()),
        DryRunBackend,
    )
    .await
    .unwrap_err();
    assert!(format!("{:#}", err).contains("MOT20"));
    Ok(())
}

/// Records what the orchestrator hands to the backend.
#[derive(Debug, Default)]
struct RecordingBackend;

#[derive(Debug, PartialEq)]
struct Recorded {
    dims: HeadDims,
    loss_classes: usize,
    optimizer_lr: f64,
    num_query: usize,
    num_batches: usize,
}

impl TrainingBackend for RecordingBackend {
    type Model = HeadDims;
    type Loss = usize;
    type Optimizer = f64;
    type Output = Recorded;

    fn make_model(&mut self, _config: &Config, dims: HeadDims) -> Result<Self::Model> {
        Ok(dims)
    }

    fn make_loss(&mut self, _config: &Config, num_classes: usize) -> Result<Self::Loss> {
        Ok(num_classes)
    }

    fn make_optimizer(&mut self, config: &Config, model: &Self::Model) -> Result<Self::Optimizer> {
        ensure!(model.num_classes > 0, "no classes");
        Ok(config.solver.base_lr.raw())
    }

    fn do_train(
        &mut self,
        job: TrainingJob<'_, Self::Model, Self::Loss, Self::Optimizer>,
    ) -> Result<Self::Output> {
        Ok(Recorded {
            dims: job.model,
            loss_classes: job.loss,
            optimizer_lr: job.optimizer,
            num_query: job.num_query,
            num_batches: job.loaders.train_loader.epoch(1).count(),
        })
    }
}

#[tokio::test]
async fn backend_receives_head_dims() -> Result<()> {
    let data_dir = tempfile::tempdir()?;
    let output_dir = tempfile::tempdir()?;
    common::mot20_tree(data_dir.path(), 5, 2, true)?;
    let config = common::mot20_config(
        data_dir.path(),
        output_dir.path().into(),
        &["dataloader.sampler", "softmax", "solver.base_lr", "0.02"],
    )?;

    let recorded = train::start(
        Arc::new(config),
        Arc::new(DatasetRegistry::builtin()),
        RecordingBackend,
    )
    .await?;

    assert_eq!(
        recorded,
        Recorded {
            dims: HeadDims {
                num_classes: 5,
                camera_num: 2,
                view_num: 1,
            },
            loss_classes: 5,
            optimizer_lr: 0.02,
            num_query: 3,
            num_batches: 2,
        }
    );
    Ok(())
}
