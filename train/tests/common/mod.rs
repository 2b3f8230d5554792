#![allow(dead_code)]

use anyhow::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};
use train::config::Config;

pub fn touch(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")?;
    Ok(())
}

/// Builds a MOT20 tree with `num_pids` identities of `num_images` images on
/// two cameras. Identities are numbered with a gap to exercise remapping.
pub fn mot20_tree(root: &Path, num_pids: usize, num_images: usize, with_eval: bool) -> Result<()> {
    let images_dir = root.join("MOT20").join("images");
    fs::create_dir_all(images_dir.join("train"))?;

    let mut train = vec![];
    for pid in 0..num_pids {
        for index in 0..num_images {
            let rel_path = format!("train/{:04}/{:03}.jpg", pid, index);
            touch(images_dir.join(&rel_path))?;
            train.push(format!("{} {} {}", rel_path, 10 + pid * 5, 1 + index % 2));
        }
    }
    fs::write(images_dir.join("train.txt"), train.join("\n"))?;

    if with_eval {
        let mut query = vec![];
        let mut gallery = vec![];
        for pid in 0..3 {
            let rel_path = format!("test/q{}.jpg", pid);
            touch(images_dir.join(&rel_path))?;
            query.push(format!("{} {} 1", rel_path, 500 + pid));

            for index in 0..2 {
                let rel_path = format!("test/g{}_{}.jpg", pid, index);
                touch(images_dir.join(&rel_path))?;
                gallery.push(format!("{} {} 2", rel_path, 500 + pid));
            }
        }
        fs::write(images_dir.join("query.txt"), query.join("\n"))?;
        fs::write(images_dir.join("gallery.txt"), gallery.join("\n"))?;
    }

    Ok(())
}

/// A small MOT20 dry-run configuration.
pub fn mot20_config(data_dir: &Path, output_dir: PathBuf, opts: &[&str]) -> Result<Config> {
    let data_dir = data_dir.display().to_string();
    let output_dir = output_dir.display().to_string();
    let mut all_opts = vec![
        "output_dir",
        output_dir.as_str(),
        "dataset.names",
        "mot20",
        "dataset.root_dir",
        data_dir.as_str(),
        "dataset.verbose",
        "false",
        "solver.max_epochs",
        "2",
        "solver.ims_per_batch",
        "8",
        "solver.log_period",
        "1",
        "solver.checkpoint_period",
        "1",
        "solver.eval_period",
        "1",
        "test.ims_per_batch",
        "4",
        "dataloader.num_instance",
        "4",
    ];
    all_opts.extend_from_slice(opts);
    Config::default().with_overrides(&all_opts)
}
