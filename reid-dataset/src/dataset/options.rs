use crate::common::*;

/// Adapter specific dataset options.
///
/// Each variant belongs to exactly one adapter. Adapters without options
/// accept only [DatasetOptions::None].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DatasetOptions {
    None,
    Veri(VeriOptions),
    VehicleId(VehicleIdOptions),
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self::None
    }
}

impl DatasetOptions {
    fn variant_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Veri(_) => "Veri",
            Self::VehicleId(_) => "VehicleId",
        }
    }

    fn mismatch(&self, dataset: &'static str) -> DatasetError {
        DatasetError::InvalidOptions {
            dataset,
            reason: format!("'{}' options are not accepted", self.variant_name()),
        }
    }

    pub(crate) fn expect_none(&self, dataset: &'static str) -> Result<()> {
        match self {
            Self::None => Ok(()),
            other => Err(other.mismatch(dataset)),
        }
    }

    pub(crate) fn veri(&self, dataset: &'static str) -> Result<VeriOptions> {
        match self {
            Self::None => Ok(VeriOptions::default()),
            Self::Veri(options) => Ok(options.clone()),
            other => Err(other.mismatch(dataset)),
        }
    }

    pub(crate) fn vehicle_id(&self, dataset: &'static str) -> Result<VehicleIdOptions> {
        match self {
            Self::None => Ok(VehicleIdOptions::default()),
            Self::VehicleId(options) => Ok(options.clone()),
            other => Err(other.mismatch(dataset)),
        }
    }
}

/// VeRi-776 options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeriOptions {
    /// Use the view labels in `keypoint_train.txt` and `keypoint_test.txt` as track ids.
    #[serde(default)]
    pub view_labels: bool,
}

/// VehicleID options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleIdOptions {
    /// The number of test identities, one of 800, 1600 or 2400.
    #[serde(default = "default_test_size")]
    pub test_size: usize,
    /// The seed to pick gallery images.
    #[serde(default)]
    pub seed: u64,
}

impl Default for VehicleIdOptions {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            seed: 0,
        }
    }
}

fn default_test_size() -> usize {
    800
}
