use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::codec::{CoefficientCodec, ContainerCodec};
use crate::config::Config;
use crate::error::{OutguessError, Result};
use crate::{pipeline, ErrorCode};

use super::guarded;

pub fn prepare() -> ExtractApi {
    ExtractApi::default()
}

/// Outcome of an extract call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractResult {
    pub success: bool,
    pub message: Vec<u8>,
    pub message_size: usize,
    /// The frame checksum matched. This says nothing about the password.
    pub verified: bool,
    pub error_code: ErrorCode,
    /// Present iff `success` is false.
    pub error_message: Option<String>,
    pub processing_time: Duration,
}

impl ExtractResult {
    /// The message as text, with invalid UTF-8 replaced.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }
}

#[derive(Default)]
pub struct ExtractApi {
    image: Option<PathBuf>,
    config: Config,
    codec: Option<Box<dyn CoefficientCodec>>,
}

impl ExtractApi {
    /// This is the image that contains the message to be extracted
    pub fn from_image(mut self, image: impl AsRef<Path>) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the password used when the message was embedded
    pub fn with_password(mut self, password: &str) -> Self {
        self.config = self.config.with_password(password);
        self
    }

    /// Set the password
    /// If `None` is passed, no password will be used, leads to no keyed stream used
    pub fn use_password<S: AsRef<str>>(mut self, password: Option<S>) -> Self {
        self.config = self.config.use_password(password);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config = self.config.with_verbose(verbose);
        self
    }

    pub fn with_codec<C: CoefficientCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Execute the extraction and block until it is finished
    pub fn execute(self) -> ExtractResult {
        let started = Instant::now();

        match guarded(|| self.run()) {
            Ok(message) => ExtractResult {
                success: true,
                message_size: message.len(),
                message,
                verified: true,
                error_code: ErrorCode::Success,
                error_message: None,
                processing_time: started.elapsed(),
            },
            Err(e) => {
                log::debug!("extraction failed: {e}");
                ExtractResult {
                    error_code: e.code(),
                    error_message: Some(e.to_string()),
                    processing_time: started.elapsed(),
                    ..Default::default()
                }
            }
        }
    }

    fn run(&self) -> Result<Vec<u8>> {
        let image = self
            .image
            .as_deref()
            .ok_or_else(|| OutguessError::invalid_input("carrier image not set"))?;

        let codec: &dyn CoefficientCodec = match &self.codec {
            Some(codec) => codec.as_ref(),
            None => &ContainerCodec,
        };

        let decoded = codec.decode(image)?;
        pipeline::unveil(&decoded.coefficients, &self.config)
    }
}
