use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::codec::{CoefficientCodec, ContainerCodec};
use crate::config::Config;
use crate::error::{OutguessError, Result};
use crate::{pipeline, ErrorCode};

use super::guarded;

pub fn prepare() -> EmbedApi {
    EmbedApi::default()
}

/// Outcome of an embed call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbedResult {
    pub success: bool,
    pub output_path: PathBuf,
    pub message_size: usize,
    /// Size of the carrier file in bytes.
    pub original_size: u64,
    /// Size of the written output file in bytes, zero on failure.
    pub output_size: u64,
    /// `output_size / original_size`.
    pub compression_ratio: f64,
    pub error_code: ErrorCode,
    /// Present iff `success` is false.
    pub error_message: Option<String>,
    pub processing_time: Duration,
}

#[derive(Default)]
pub struct EmbedApi {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    message: Option<Vec<u8>>,
    config: Config,
    codec: Option<Box<dyn CoefficientCodec>>,
    progress: Option<Box<dyn FnMut(u8)>>,
}

impl EmbedApi {
    /// The carrier image the message will be hidden in
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Where the carrier with the hidden message is written to
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn with_message<M: AsRef<[u8]>>(mut self, message: M) -> Self {
        self.message = Some(message.as_ref().to_vec());
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the password
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

    pub fn with_resistance(mut self, resistance_level: i32) -> Self {
        self.config = self.config.with_resistance(resistance_level);
        self
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.config = self.config.with_quality(quality);
        self
    }

    /// Log the embedding summary at info instead of debug level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config = self.config.with_verbose(verbose);
        self
    }

    /// Advisory limit; a larger message only logs a warning
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.config = self.config.with_max_message_size(max_message_size);
        self
    }

    /// Use a different codec than the bundled [`ContainerCodec`]
    pub fn with_codec<C: CoefficientCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Receive progress as a percentage; 100 is reported once the payload is written and verified
    pub fn with_progress<F: FnMut(u8) + 'static>(mut self, progress: F) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Execute the embedding and block until it is finished
    pub fn execute(mut self) -> EmbedResult {
        let started = Instant::now();
        let output_path = self.output.clone().unwrap_or_default();
        let message_size = self.message.as_ref().map_or(0, Vec::len);

        match guarded(|| self.run()) {
            Ok(sizes) => EmbedResult {
                success: true,
                output_path,
                message_size,
                original_size: sizes.original,
                output_size: sizes.output,
                compression_ratio: sizes.ratio(),
                error_code: ErrorCode::Success,
                error_message: None,
                processing_time: started.elapsed(),
            },
            Err(e) => {
                log::debug!("embed into {} failed: {e}", output_path.display());
                EmbedResult {
                    success: false,
                    output_path,
                    message_size,
                    error_code: e.code(),
                    error_message: Some(e.to_string()),
                    processing_time: started.elapsed(),
                    ..Default::default()
                }
            }
        }
    }

    fn run(&mut self) -> Result<FileSizes> {
        let image = self
            .image
            .as_deref()
            .ok_or_else(|| OutguessError::invalid_input("carrier image not set"))?;
        let output = self
            .output
            .as_deref()
            .ok_or_else(|| OutguessError::invalid_input("output path not set"))?;
        let message = match self.message.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => return Err(OutguessError::invalid_input("message is empty")),
        };
        self.config.validate()?;
        let quality = u8::try_from(self.config.quality)
            .map_err(|_| OutguessError::invalid_input("quality does not fit a byte"))?;

        let codec: &dyn CoefficientCodec = match &self.codec {
            Some(codec) => codec.as_ref(),
            None => &ContainerCodec,
        };

        let mut decoded = codec.decode(image)?;
        let original = fs::metadata(image)?.len();

        match self.progress.as_mut() {
            Some(progress) => pipeline::hide_with_progress(
                &mut decoded.coefficients,
                message,
                &self.config,
                progress,
            )?,
            None => pipeline::hide(&mut decoded.coefficients, message, &self.config)?,
        };

        // only reached once the payload is written and verified
        let output_size = codec.encode(&decoded, quality, output).inspect_err(|_| {
            // drop partial output
            let _ = fs::remove_file(output);
        })?;

        Ok(FileSizes {
            original,
            output: output_size,
        })
    }
}

struct FileSizes {
    original: u64,
    output: u64,
}

impl FileSizes {
    fn ratio(&self) -> f64 {
        if self.original == 0 {
            0.0
        } else {
            self.output as f64 / self.original as f64
        }
    }
}
