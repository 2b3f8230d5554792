//! The model, loss and optimizer factories and the epoch loop.

use crate::{
    common::*,
    config::{Config, LoadCheckpoint},
    data::{Batch, DataLoaders},
    utils::{self, LrScheduler, RateCounter, TrainingState},
};

/// The label cardinalities that size the model heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadDims {
    pub num_classes: usize,
    pub camera_num: usize,
    pub view_num: usize,
}

impl From<&DataLoaders> for HeadDims {
    fn from(loaders: &DataLoaders) -> Self {
        Self {
            num_classes: loaders.num_classes,
            camera_num: loaders.camera_num,
            view_num: loaders.view_num,
        }
    }
}

/// Everything the epoch loop works on.
#[derive(Debug)]
pub struct TrainingJob<'a, M, L, O> {
    pub config: &'a Config,
    pub model: M,
    pub loss: L,
    pub optimizer: O,
    pub loaders: &'a DataLoaders,
    pub num_query: usize,
    pub checkpoint_dir: &'a Path,
}

/// Builds the learnable components and runs the epoch loop.
pub trait TrainingBackend
where
    Self: Send + 'static,
{
    type Model: Send;
    type Loss: Send;
    type Optimizer: Send;
    type Output: Send + 'static;

    fn make_model(&mut self, config: &Config, dims: HeadDims) -> Result<Self::Model>;

    fn make_loss(&mut self, config: &Config, num_classes: usize) -> Result<Self::Loss>;

    fn make_optimizer(&mut self, config: &Config, model: &Self::Model) -> Result<Self::Optimizer>;

    fn do_train(
        &mut self,
        job: TrainingJob<'_, Self::Model, Self::Loss, Self::Optimizer>,
    ) -> Result<Self::Output>;
}

/// The training backend that walks the epoch loop over real batches without
/// any tensor computation.
///
/// It checks batch labels against the head dimensions, exercises the
/// checkpoint and evaluation schedule and reports throughput.
#[derive(Debug, Clone, Default)]
pub struct DryRunBackend;

/// The model stand-in of [DryRunBackend].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunModel {
    pub name: String,
    pub dims: HeadDims,
    pub sie_camera: bool,
    pub sie_view: bool,
}

/// The weighted loss terms.
#[derive(Debug, Clone, PartialEq)]
pub struct LossSpec {
    pub num_classes: usize,
    pub id_loss_weight: R64,
    pub triplet: Option<TripletSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripletSpec {
    pub weight: R64,
    pub margin: R64,
}

/// The summary of a finished [DryRunBackend] run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingReport {
    /// The first epoch run, which is after the resumed checkpoint if any.
    pub start_epoch: usize,
    pub epochs: usize,
    pub iterations: usize,
    pub images: usize,
    pub evaluations: usize,
    pub checkpoints: Vec<PathBuf>,
}

impl TrainingBackend for DryRunBackend {
    type Model = DryRunModel;
    type Loss = LossSpec;
    type Optimizer = LrScheduler;
    type Output = TrainingReport;

    fn make_model(&mut self, config: &Config, dims: HeadDims) -> Result<Self::Model> {
        ensure!(dims.num_classes > 0, "the model needs at least one identity");
        let model_config = &config.model;

        info!(
            "build model '{}' with {} classes, {} cameras, {} views",
            model_config.name, dims.num_classes, dims.camera_num, dims.view_num
        );

        Ok(DryRunModel {
            name: model_config.name.clone(),
            dims,
            sie_camera: model_config.sie_camera,
            sie_view: model_config.sie_view,
        })
    }

    fn make_loss(&mut self, config: &Config, num_classes: usize) -> Result<Self::Loss> {
        let solver = &config.solver;
        let triplet = config
            .dataloader
            .sampler
            .uses_triplet()
            .then(|| TripletSpec {
                weight: solver.triplet_loss_weight,
                margin: solver.margin,
            });

        Ok(LossSpec {
            num_classes,
            id_loss_weight: solver.id_loss_weight,
            triplet,
        })
    }

    fn make_optimizer(&mut self, config: &Config, _model: &Self::Model) -> Result<Self::Optimizer> {
        LrScheduler::new(config.solver.base_lr, config.solver.warmup_epochs)
    }

    fn do_train(
        &mut self,
        job: TrainingJob<'_, Self::Model, Self::Loss, Self::Optimizer>,
    ) -> Result<Self::Output> {
        let TrainingJob {
            config,
            model,
            loss,
            optimizer,
            loaders,
            num_query,
            checkpoint_dir,
        } = job;
        let solver = &config.solver;
        ensure!(
            loss.num_classes == model.dims.num_classes,
            "the loss expects {} classes, but the model has {}",
            loss.num_classes,
            model.dims.num_classes
        );

        // load checkpoint
        let (init_epoch, init_iteration) =
            match utils::try_load_checkpoint(checkpoint_dir, &solver.load_checkpoint)? {
                Some((path, state)) => {
                    ensure!(
                        state.num_classes == model.dims.num_classes,
                        "checkpoint '{}' has {} classes, but the model has {}",
                        path.display(),
                        state.num_classes,
                        model.dims.num_classes
                    );
                    (state.epoch + 1, state.iteration)
                }
                None => {
                    if let LoadCheckpoint::FromRecent = solver.load_checkpoint {
                        info!("start training from scratch");
                    }
                    (1, 0)
                }
            };

        let train_loader = &loaders.train_loader;
        let num_batches = train_loader.num_batches();
        let mut report = TrainingReport {
            start_epoch: init_epoch,
            iterations: init_iteration,
            ..Default::default()
        };

        info!("start training");

        for epoch in init_epoch..=solver.max_epochs {
            let lr = optimizer.lr(epoch);
            let mut rate_counter = RateCounter::with_second_interval();
            let mut epoch_counter = RateCounter::with_second_interval();

            for (index, batch) in train_loader.epoch(epoch).enumerate() {
                check_batch(&batch, &model)
                    .with_context(|| format!("invalid batch {} at epoch {}", index + 1, epoch))?;

                rate_counter.add(batch.len() as f64);
                epoch_counter.add(batch.len() as f64);
                report.iterations += 1;
                report.images += batch.len();

                if (index + 1) % solver.log_period.get() == 0 {
                    match rate_counter.rate() {
                        Some(rate) => info!(
                            "Epoch[{}] Iteration[{}/{}] Base Lr: {:.2e}, {:.2} images/s",
                            epoch,
                            index + 1,
                            num_batches,
                            lr.raw(),
                            rate
                        ),
                        None => info!(
                            "Epoch[{}] Iteration[{}/{}] Base Lr: {:.2e}",
                            epoch,
                            index + 1,
                            num_batches,
                            lr.raw()
                        ),
                    }
                }
            }

            info!(
                "Epoch {} done. Speed: {:.2} images/s",
                epoch,
                epoch_counter.flush()
            );
            report.epochs += 1;

            // save checkpoint
            if epoch % solver.checkpoint_period.get() == 0 {
                let state = TrainingState {
                    epoch,
                    iteration: report.iterations,
                    lr,
                    model_name: model.name.clone(),
                    num_classes: model.dims.num_classes,
                };
                let path = utils::save_checkpoint(checkpoint_dir, &state)?;
                info!("save checkpoint '{}'", path.display());
                report.checkpoints.push(path);
            }

            // evaluation
            if epoch % solver.eval_period.get() == 0 {
                if num_query == 0 {
                    warn!(
                        "dataset '{}' has no query split, evaluation is skipped",
                        loaders.dataset_name
                    );
                } else {
                    let (num_images, num_batches) = loaders
                        .val_loader
                        .epoch(epoch)
                        .fold((0, 0), |(images, batches), batch| {
                            (images + batch.len(), batches + 1)
                        });
                    info!(
                        "Validation Results - Epoch: {}, {} query and {} gallery images in {} batches",
                        epoch,
                        num_query,
                        num_images - num_query,
                        num_batches
                    );
                    report.evaluations += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Checks that batch labels index into the heads of the model.
///
/// Track ids are only checked when the model embeds views.
fn check_batch(batch: &Batch, model: &DryRunModel) -> Result<()> {
    let dims = &model.dims;
    ensure!(!batch.is_empty(), "empty batch");
    ensure!(
        [&batch.pids, &batch.camids, &batch.trackids]
            .iter()
            .all(|labels| labels.len() == batch.len()),
        "label vectors differ in length"
    );
    if let Some(pid) = batch.pids.iter().find(|&&pid| pid >= dims.num_classes) {
        bail!("identity {} exceeds {} classes", pid, dims.num_classes);
    }
    if let Some(camid) = batch.camids.iter().find(|&&camid| camid >= dims.camera_num) {
        bail!("camera {} exceeds {} cameras", camid, dims.camera_num);
    }
    if model.sie_view {
        if let Some(trackid) = batch.trackids.iter().find(|&&trackid| trackid >= dims.view_num) {
            bail!("view {} exceeds {} views", trackid, dims.view_num);
        }
    }
    Ok(())
}
