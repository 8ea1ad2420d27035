//! Per-call configuration.

use crate::cipher::Password;
use crate::encoder::ResistanceStrategy;
use crate::error::{OutguessError, Result};

pub const DEFAULT_RESISTANCE_LEVEL: i32 = 5;
pub const DEFAULT_QUALITY: i32 = 85;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 65_536;

pub const RESISTANCE_RANGE: std::ops::RangeInclusive<i32> = 1..=10;
pub const QUALITY_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

/// Settings shared by embed, extract and the analysis calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Keyed stream password; `None` leaves payloads untransformed.
    pub password: Password,
    /// Embedding strategy selector, documented range 1-10.
    pub resistance_level: i32,
    /// Quality used for the capacity estimate and the output encode, documented range 1-100.
    pub quality: i32,
    /// Promote per-call summaries from `debug` to `info`.
    pub verbose: bool,
    /// Advisory limit; exceeding it only logs a warning.
    pub max_message_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            password: Password::none(),
            resistance_level: DEFAULT_RESISTANCE_LEVEL,
            quality: DEFAULT_QUALITY,
            verbose: false,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.into();
        self
    }

    /// Set the password
    /// If `None` is passed, no password will be used, leads to no keyed stream used
    pub fn use_password<S: AsRef<str>>(mut self, password: Option<S>) -> Self {
        self.password = password.map(|s| s.as_ref().to_string()).into();
        self
    }

    pub fn with_resistance(mut self, resistance_level: i32) -> Self {
        self.resistance_level = resistance_level;
        self
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn strategy(&self) -> ResistanceStrategy {
        ResistanceStrategy::from_level(self.resistance_level)
    }

    /// Check the documented ranges of resistance and quality.
    pub fn validate(&self) -> Result<()> {
        if !RESISTANCE_RANGE.contains(&self.resistance_level) {
            return Err(OutguessError::invalid_input(format!(
                "resistance level {} outside {}-{}",
                self.resistance_level,
                RESISTANCE_RANGE.start(),
                RESISTANCE_RANGE.end()
            )));
        }
        if !QUALITY_RANGE.contains(&self.quality) {
            return Err(OutguessError::invalid_input(format!(
                "quality {} outside {}-{}",
                self.quality,
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end()
            )));
        }
        Ok(())
    }
}
