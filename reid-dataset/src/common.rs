pub use crate::error::{DatasetError, Result};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools;
pub use once_cell::sync::Lazy;
pub use rand::{prelude::*, rngs::StdRng};
pub use regex::Regex;
pub use serde::{Deserialize, Serialize};
pub use std::{
    any::Any,
    collections::HashMap,
    fmt::{self, Debug, Display},
    fs, io,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    str::FromStr,
};
pub use tracing::{debug, info, warn};
