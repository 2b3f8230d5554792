use crate::{common::*, record::ImageRecord};

/// Checks the existence of paths in order, and reports the first missing one.
pub fn check_paths<'a, I>(paths: I) -> Result<()>
where
    I: IntoIterator<Item = (&'static str, &'a Path)>,
{
    paths.into_iter().try_for_each(|(what, path)| {
        if path.exists() {
            Ok(())
        } else {
            Err(DatasetError::MissingPath {
                what,
                path: path.to_owned(),
            })
        }
    })
}

/// Checks that an image file referenced by a label exists.
pub fn ensure_image_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DatasetError::MissingPath {
            what: "image file",
            path: path.to_owned(),
        })
    }
}

/// A whitespace-separated line of a label file.
#[derive(Debug, Clone, Copy)]
pub struct LabelLine<'a> {
    pub path: &'a Path,
    /// The 1-based line number.
    pub line: usize,
    pub fields: &'a [&'a str],
}

impl<'a> LabelLine<'a> {
    /// Parses the field at `index` into a value.
    pub fn parse<T>(&self, index: usize, field: &'static str) -> Result<T>
    where
        T: FromStr,
    {
        let value = self.fields[index];
        value.parse().map_err(|_| DatasetError::InvalidField {
            path: self.path.to_owned(),
            line: self.line,
            field,
            value: value.to_owned(),
        })
    }
}

/// Reads a label file with a fixed number of fields per line.
///
/// Every line, blank ones included, must split into exactly `num_fields`
/// fields, and is passed to `f`.
pub fn parse_label_file<T, F>(path: &Path, num_fields: usize, mut f: F) -> Result<Vec<T>>
where
    F: FnMut(LabelLine<'_>) -> Result<T>,
{
    let text = fs::read_to_string(path).map_err(|err| DatasetError::io(path, err))?;

    text.lines()
        .enumerate()
        .map(|(index, content)| (index + 1, content.trim()))
        .map(|(line, content)| {
            let fields: Vec<_> = content.split_whitespace().collect();
            if fields.len() != num_fields {
                return Err(DatasetError::MalformedLabelLine {
                    path: path.to_owned(),
                    line,
                    content: content.to_owned(),
                    expected: num_fields,
                    found: fields.len(),
                });
            }
            f(LabelLine {
                path,
                line,
                fields: &fields,
            })
        })
        .collect()
}

/// Lists the `*.jpg` files in a directory in lexicographic order.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.jpg",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|err| {
        DatasetError::io(dir, io::Error::new(io::ErrorKind::InvalidInput, err))
    })?;
    let mut paths: Vec<_> = paths
        .map(|result| {
            result.map_err(|err| {
                let path = err.path().to_owned();
                DatasetError::io(path, err.into_error())
            })
        })
        .collect::<Result<_>>()?;
    paths.sort();
    Ok(paths)
}

/// The file name convention `<pid>_c<camera>...` of person and vehicle crops.
#[derive(Debug, Clone)]
pub struct NamePattern {
    pub regex: &'static Lazy<Regex>,
    /// The inclusive upper bound of valid identities.
    pub max_pid: i64,
    /// The range of valid 1-based camera numbers.
    pub cams: RangeInclusive<usize>,
}

impl NamePattern {
    /// Extracts the identity and the 1-based camera number from an image file name.
    ///
    /// The identity is `-1` for junk images.
    pub fn parse(&self, path: &Path) -> Result<(i64, usize)> {
        let invalid = || DatasetError::InvalidFileName {
            path: path.to_owned(),
        };

        let file_name = path.file_name().and_then(|name| name.to_str()).ok_or_else(invalid)?;
        let captures = self.regex.captures(file_name).ok_or_else(invalid)?;
        let pid: i64 = captures[1].parse().map_err(|_| invalid())?;
        let camera: usize = captures[2].parse().map_err(|_| invalid())?;
        Ok((pid, camera))
    }

    /// Checks the label ranges and converts to a record with a zero-based camera id.
    ///
    /// Returns `None` for junk images.
    pub fn to_record(
        &self,
        path: PathBuf,
        pid_begin: usize,
        trackid: usize,
    ) -> Result<Option<ImageRecord>> {
        let (pid, camera) = self.parse(&path)?;
        if pid == -1 {
            return Ok(None);
        }
        if !(0..=self.max_pid).contains(&pid) {
            return Err(DatasetError::InvalidLabel {
                reason: format!("identity {} is out of range 0..={}", pid, self.max_pid),
                path,
            });
        }
        if !self.cams.contains(&camera) {
            return Err(DatasetError::InvalidLabel {
                reason: format!("camera {} is out of range {:?}", camera, self.cams),
                path,
            });
        }

        Ok(Some(ImageRecord::new(
            path,
            pid_begin + pid as usize,
            camera - 1,
            trackid,
        )))
    }
}

/// Loads a split directory whose images follow a [NamePattern].
pub fn load_named_split(
    dir: &Path,
    pattern: &NamePattern,
    pid_begin: usize,
    trackid: usize,
) -> Result<Vec<ImageRecord>> {
    list_images(dir)?
        .into_iter()
        .map(|path| pattern.to_record(path, pid_begin, trackid))
        .filter_map(|result| result.transpose())
        .collect()
}
