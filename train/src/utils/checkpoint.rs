use crate::{common::*, config::LoadCheckpoint};
use chrono::FixedOffset;

pub const FILE_STRFTIME: &str = "%Y-%m-%d-%H-%M-%S.%3f%z";

static CHECKPOINT_FILENAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}\.\d{3}[+-]\d{4})_(\d{6})\.ckpt$").unwrap()
});

/// The training progress stored in a checkpoint file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingState {
    /// The last finished epoch.
    pub epoch: usize,
    /// The number of finished iterations over all epochs.
    pub iteration: usize,
    pub lr: R64,
    pub model_name: String,
    pub num_classes: usize,
}

/// Save the training state to a checkpoint file.
pub fn save_checkpoint(checkpoint_dir: &Path, state: &TrainingState) -> Result<PathBuf> {
    let filename = format!(
        "{}_{:06}.ckpt",
        Local::now().format(FILE_STRFTIME),
        state.epoch
    );
    let path = checkpoint_dir.join(filename);
    let text = serde_json::to_string_pretty(state)?;
    fs::write(&path, text)
        .with_context(|| format!("failed to write checkpoint file '{}'", path.display()))?;
    Ok(path)
}

/// Load the training state from a directory with specified checkpoint loading method.
pub fn try_load_checkpoint(
    checkpoint_dir: &Path,
    load_checkpoint: &LoadCheckpoint,
) -> Result<Option<(PathBuf, TrainingState)>> {
    let path = match load_checkpoint {
        LoadCheckpoint::Disabled => {
            info!("checkpoint loading is disabled");
            None
        }
        LoadCheckpoint::FromRecent => {
            let checkpoint_file = list_checkpoints(checkpoint_dir)?
                .into_iter()
                .max_by_key(|(_path, datetime, epoch)| (*datetime, *epoch))
                .map(|(path, _datetime, _epoch)| path);

            if checkpoint_file.is_none() {
                warn!("no checkpoint file found in '{}'", checkpoint_dir.display());
            }

            checkpoint_file
        }
        LoadCheckpoint::FromFile { file } => {
            ensure!(file.is_file(), "'{}' is not a file", file.display());
            Some(file.to_owned())
        }
    };

    let path = match path {
        Some(path) => path,
        None => return Ok(None),
    };

    info!("load checkpoint file '{}'", path.display());
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read checkpoint file '{}'", path.display()))?;
    let state = serde_json::from_str(&text)
        .with_context(|| format!("invalid checkpoint file '{}'", path.display()))?;
    Ok(Some((path, state)))
}

/// Lists checkpoint files along with their save time and epoch.
fn list_checkpoints(
    checkpoint_dir: &Path,
) -> Result<Vec<(PathBuf, DateTime<FixedOffset>, usize)>> {
    let pattern = format!(
        "{}/*.ckpt",
        glob::Pattern::escape(&checkpoint_dir.to_string_lossy())
    );
    let paths: Vec<_> = glob::glob(&pattern)?.collect::<Result<_, _>>()?;

    let checkpoints = paths
        .into_iter()
        .filter_map(|path| {
            let file_name = path.file_name()?.to_str()?;
            let captures = CHECKPOINT_FILENAME_REGEX.captures(file_name)?;
            let datetime = DateTime::parse_from_str(captures.get(1)?.as_str(), FILE_STRFTIME).ok()?;
            let epoch: usize = captures.get(2)?.as_str().parse().ok()?;
            Some((path, datetime, epoch))
        })
        .collect();
    Ok(checkpoints)
}
