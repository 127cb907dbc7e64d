//! Configuration options for entity cleaning.

use serde::{Deserialize, Serialize};

/// Options that alter the default cleaning pipelines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// Null card numbers whose length does not match the provider's
    /// expected length. Off by default.
    pub enforce_card_length: bool,
}

impl CleaningOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_card_length(mut self, enable: bool) -> Self {
        self.enforce_card_length = enable;
        self
    }
}
