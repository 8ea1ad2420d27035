//! Coefficient-domain steganography for JPEG-style carriers.
//!
//! Payloads are hidden in the least significant bits of quantized DCT
//! coefficients. The visiting order is a seeded shuffle of the AC positions,
//! each payload is framed with its length and a CRC32, and an optional
//! password applies a keyed byte stream to the payload before framing.
//!
//! # Layer Responsibilities
//!
//! - Buffer level: [`pipeline::hide`] and [`pipeline::unveil`] operate on a
//!   `&mut [i16]` and return typed errors.
//! - File level: [`api`] decodes a carrier through a
//!   [`CoefficientCodec`], runs the buffer level and reports result records
//!   carrying an [`ErrorCode`].
//!
//! Real JPEG parsing is not part of this crate; the bundled [`ContainerCodec`]
//! stores raw coefficients.
//!
//! # Security
//!
//! The keyed stream is a plain XOR with a 32-bit key and the checksum covers
//! the transformed bytes, so a wrong password is not detected. The visiting
//! order does not depend on the password. Treat this as obfuscation, not
//! encryption.
//!
//! # Example
//!
//! ```rust
//! use outguess_core::{codec::DecodedImage, pipeline, Config};
//!
//! let mut coefficients = DecodedImage::synthetic(64, 64, 85, 42).coefficients;
//! let config = Config::default().with_password("secret123");
//!
//! pipeline::hide(&mut coefficients, b"Hello World", &config).expect("fits");
//! let message = pipeline::unveil(&coefficients, &config).expect("readable");
//! assert_eq!(message, b"Hello World");
//! ```

pub mod api;
pub mod capacity;
pub mod cipher;
pub mod codec;
pub mod coefficients;
pub mod config;
pub mod crc32;
mod decoder;
pub mod detect;
mod encoder;
mod error;
pub mod frame;
mod hash;
pub mod pipeline;
pub mod resistance;
pub mod sequence;
pub mod stats;

pub use cipher::{KeyedStream, Password};
pub use codec::{CoefficientCodec, ContainerCodec, DecodedImage};
pub use config::Config;
pub use decoder::Extractor;
pub use detect::DetectionReport;
pub use encoder::{modify_coefficient, EmbedReport, Embedder, ResistanceStrategy};
pub use error::{ErrorCode, OutguessError, Result};
pub use sequence::EmbeddingSequence;
pub use stats::EmbeddingStats;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
