use anyhow::{Context, Result};
use reid_dataset::DatasetRegistry;
use std::{path::PathBuf, sync::Arc};
use structopt::{clap::AppSettings, StructOpt};
use tracing::{info, info_span, Instrument};
use train::{backend::DryRunBackend, config::Config};

#[derive(Debug, Clone, StructOpt)]
#[structopt(setting = AppSettings::AllowNegativeNumbers)]
/// Train ReID model
struct Args {
    #[structopt(long, alias = "config_file")]
    /// configuration file
    pub config_file: Option<PathBuf>,
    #[structopt(long, alias = "local_rank", default_value = "0")]
    /// local rank for distributed training
    pub local_rank: usize,
    #[structopt(allow_hyphen_values = true)]
    /// config overrides in `key value` pairs, such as `solver.base_lr 0.01`
    pub opts: Vec<String>,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    // parse arguments
    let args = Args::from_args();
    let config = Arc::new(Config::load(args.config_file.as_deref(), &args.opts)?);

    // setup tracing
    let output_dir = &config.output_dir;
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create output directory '{}'", output_dir.display()))?;
    train::logging::init_logging(output_dir)?;

    info!("saving model in the path '{}'", output_dir.display());
    info!("{:?}", args);
    if let Some(config_file) = &args.config_file {
        let text = tokio::fs::read_to_string(config_file).await?;
        info!("loaded configuration file '{}'\n{}", config_file.display(), text);
    }
    info!("running with config:\n{}", serde_json::to_string_pretty(&*config)?);

    // start training program
    let report = train::start(config, Arc::new(DatasetRegistry::builtin()), DryRunBackend)
        .instrument(info_span!("dry_run"))
        .await?;
    info!(
        "finished {} epochs, {} iterations, {} evaluations",
        report.epochs, report.iterations, report.evaluations
    );

    Ok(())
}
