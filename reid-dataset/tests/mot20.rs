mod common;

use anyhow::Result;
use reid_dataset::{
    dataset::Mot20, DatasetArgs, DatasetError, DatasetOptions, DatasetRegistry, LoadDataset,
    ReidDataset, VeriOptions,
};
use std::fs;

#[test]
fn mot20_train_split() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images_dir =
        common::mot20_tree(dir.path(), &["a/1.jpg 0 1", "a/2.jpg 0 2", "a/3.jpg 1 1"])?;

    let dataset = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false))?;

    assert_eq!(dataset.train().len(), 3);
    assert!(dataset.train().iter().all(|record| record.trackid == 0));
    assert_eq!(dataset.train()[0].path, images_dir.join("a/1.jpg"));
    assert_eq!(dataset.train()[1].camid, 2);

    let info = dataset.train_info();
    assert_eq!(info.num_pids, 2);
    assert_eq!(info.num_cams, 2);
    assert_eq!(info.num_imgs, 3);
    assert_eq!(info.num_vids, 1);

    assert!(dataset.query().is_empty());
    assert!(dataset.gallery().is_empty());
    assert!(!dataset.supports_evaluation());
    Ok(())
}

#[test]
fn mot20_statistics_match_records() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let lines: Vec<String> = (0..20)
        .map(|index| format!("seq/{:03}.jpg {} {}", index, index % 7, index % 3))
        .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    common::mot20_tree(dir.path(), &lines)?;

    let dataset = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false))?;
    let info = dataset.train_info();

    assert_eq!(dataset.train().len(), lines.len());
    assert_eq!(info.num_pids, 7);
    assert_eq!(info.num_cams, 3);
    assert_eq!(info, dataset.train_info());
    Ok(())
}

#[test]
fn mot20_pid_begin_offsets_identities() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["a/1.jpg 0 1", "a/2.jpg 3 1"])?;

    let dataset = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false).pid_begin(100))?;
    let pids: Vec<_> = dataset.train().iter().map(|record| record.pid).collect();
    assert_eq!(pids, [100, 103]);
    Ok(())
}

#[test]
fn mot20_blank_line_is_malformed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["a/1.jpg 0 1", "", "a/2.jpg 1 1"])?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    match err {
        DatasetError::MalformedLabelLine {
            line,
            expected,
            found,
            ref content,
            ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(expected, 3);
            assert_eq!(found, 0);
            assert!(content.is_empty());
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[test]
fn mot20_whitespace_line_is_malformed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["a/1.jpg 0 1", "   "])?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::MalformedLabelLine { line: 2, found: 0, .. }
    ));
    Ok(())
}

#[test]
fn mot20_trailing_newline_is_accepted() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images_dir = common::mot20_tree(dir.path(), &["a/1.jpg 0 1"])?;
    fs::write(images_dir.join("train.txt"), "a/1.jpg 0 1\n")?;

    let dataset = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false))?;
    assert_eq!(dataset.train().len(), 1);
    Ok(())
}

#[test]
fn mot20_two_field_line_is_malformed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["a/1.jpg 0 1", "a/2.jpg 0"])?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    match err {
        DatasetError::MalformedLabelLine {
            line,
            expected,
            found,
            ref content,
            ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
            assert_eq!(content, "a/2.jpg 0");
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[test]
fn mot20_non_numeric_field_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["a/1.jpg zero 1"])?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::InvalidField {
            field: "person id",
            line: 1,
            ..
        }
    ));
    Ok(())
}

#[test]
fn mot20_missing_images_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("MOT20"))?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    match err {
        DatasetError::MissingPath { what, path } => {
            assert_eq!(what, "images directory");
            assert_eq!(path, dir.path().join("MOT20").join("images"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[test]
fn mot20_missing_root_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("absent");

    let err = Mot20::load(&DatasetArgs::new(&root).verbose(false)).unwrap_err();
    match err {
        DatasetError::MissingPath { what, path } => {
            assert_eq!(what, "root directory");
            assert_eq!(path, root);
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[test]
fn mot20_missing_label_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images_dir = dir.path().join("MOT20").join("images");
    fs::create_dir_all(images_dir.join("train"))?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    match err {
        DatasetError::MissingPath { what, path } => {
            assert_eq!(what, "label file");
            assert_eq!(path, images_dir.join("train.txt"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[test]
fn mot20_missing_image_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images_dir = common::mot20_tree(dir.path(), &["a/1.jpg 0 1"])?;
    common::write_lines(images_dir.join("train.txt"), &["a/1.jpg 0 1", "a/9.jpg 0 1"])?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    match err {
        DatasetError::MissingPath { what, path } => {
            assert_eq!(what, "image file");
            assert_eq!(path, images_dir.join("a/9.jpg"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[test]
fn mot20_loads_query_and_gallery_when_supplied() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images_dir = common::mot20_tree(dir.path(), &["a/1.jpg 0 1", "a/2.jpg 1 2"])?;
    common::write_label_file(&images_dir, "query.txt", &["q/1.jpg 5 1"])?;
    common::write_label_file(&images_dir, "gallery.txt", &["g/1.jpg 5 2", "g/2.jpg 6 2"])?;

    let dataset = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false))?;
    assert_eq!(dataset.query().len(), 1);
    assert_eq!(dataset.gallery().len(), 2);
    assert!(dataset.supports_evaluation());
    assert_eq!(dataset.gallery_info().num_pids, 2);
    Ok(())
}

#[test]
fn mot20_query_without_gallery_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images_dir = common::mot20_tree(dir.path(), &["a/1.jpg 0 1"])?;
    common::write_label_file(&images_dir, "query.txt", &["q/1.jpg 5 1"])?;

    let err = Mot20::load(&DatasetArgs::new(dir.path()).verbose(false)).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::MissingPath {
            what: "gallery label file",
            ..
        }
    ));
    Ok(())
}

#[test]
fn mot20_rejects_foreign_options() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["a/1.jpg 0 1"])?;

    let args = DatasetArgs::new(dir.path())
        .verbose(false)
        .options(DatasetOptions::Veri(VeriOptions { view_labels: true }));
    let err = Mot20::load(&args).unwrap_err();
    assert!(matches!(err, DatasetError::InvalidOptions { .. }));
    Ok(())
}

#[test]
fn mot20_from_registry_is_deterministic() -> Result<()> {
    let dir = tempfile::tempdir()?;
    common::mot20_tree(dir.path(), &["b/1.jpg 4 1", "a/1.jpg 2 1", "a/2.jpg 4 3"])?;
    let registry = DatasetRegistry::builtin();
    let args = DatasetArgs::new(dir.path()).verbose(false);

    let first = registry.init_dataset("mot20", &args)?;
    let second = registry.init_dataset("mot20", &args)?;

    assert!(first.as_any().downcast_ref::<Mot20>().is_some());
    assert_eq!(first.train(), second.train());
    Ok(())
}
