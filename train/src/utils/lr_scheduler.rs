use crate::common::*;

/// Per-epoch learning rate with linear warmup.
///
/// The rate grows linearly from `base_lr / warmup_epochs` at epoch 1 to
/// `base_lr` at epoch `warmup_epochs`, and stays at `base_lr` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LrScheduler {
    base_lr: R64,
    warmup_epochs: usize,
}

impl LrScheduler {
    pub fn new(base_lr: R64, warmup_epochs: usize) -> Result<Self> {
        ensure!(
            base_lr > 0.0,
            "base_lr must be positive, but get {}",
            base_lr
        );
        Ok(Self {
            base_lr,
            warmup_epochs,
        })
    }

    pub fn base_lr(&self) -> R64 {
        self.base_lr
    }

    /// The learning rate of a 1-based epoch.
    pub fn lr(&self, epoch: usize) -> R64 {
        if epoch < self.warmup_epochs {
            self.base_lr * epoch.max(1) as f64 / self.warmup_epochs as f64
        } else {
            self.base_lr
        }
    }
}
