#![allow(dead_code)]

use anyhow::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Creates an empty file and its parent directories.
pub fn touch(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")?;
    Ok(path.to_owned())
}

/// Writes lines to a file and creates its parent directories.
pub fn write_lines(path: impl AsRef<Path>, lines: &[&str]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text: String = lines.iter().map(|line| format!("{}\n", line)).collect();
    fs::write(path, text)?;
    Ok(())
}

/// Builds a MOT20 tree and creates every image referenced by the label lines.
pub fn mot20_tree(root: &Path, train: &[&str]) -> Result<PathBuf> {
    let images_dir = root.join("MOT20").join("images");
    fs::create_dir_all(images_dir.join("train"))?;
    write_label_file(&images_dir, "train.txt", train)?;
    Ok(images_dir)
}

/// Writes a label file under `images_dir` and creates the referenced images.
pub fn write_label_file(images_dir: &Path, name: &str, lines: &[&str]) -> Result<()> {
    for line in lines {
        if let Some(rel_path) = line.split_whitespace().next() {
            touch(images_dir.join(rel_path))?;
        }
    }
    write_lines(images_dir.join(name), lines)
}

/// Builds a Market-1501 style tree with the given image names per split.
pub fn bounding_box_tree(
    dataset_dir: &Path,
    train: &[&str],
    query: &[&str],
    gallery: &[&str],
) -> Result<()> {
    [
        ("bounding_box_train", train),
        ("query", query),
        ("bounding_box_test", gallery),
    ]
    .into_iter()
    .try_for_each(|(dir, names)| -> Result<()> {
        let dir = dataset_dir.join(dir);
        fs::create_dir_all(&dir)?;
        for name in names {
            touch(dir.join(name))?;
        }
        Ok(())
    })
}
