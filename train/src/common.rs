//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context, Error, Result};
pub use chrono::{DateTime, Local};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools;
pub use noisy_float::prelude::*;
pub use once_cell::sync::Lazy;
pub use rand::{prelude::*, rngs::StdRng, seq::SliceRandom};
pub use regex::Regex;
pub use reid_dataset::{DatasetRegistry, ImageRecord, ReidDataset};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::VecDeque,
    fmt::Debug,
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};
pub use tracing::{debug, info, info_span, warn, Instrument};

