//! Codec seam between image files and coefficient buffers.
//!
//! The engine never parses image files itself. Anything that can turn a file
//! into quantized coefficients and back implements [`CoefficientCodec`]. The
//! bundled [`ContainerCodec`] stores raw coefficients in a small marker-framed
//! file, which is enough for the file-level API and its tests.

use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::coefficients::BLOCK_SIZE;
use crate::error::{OutguessError, Result};

/// Start marker of a container file.
pub const START_MARKER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
/// End marker of a container file.
pub const END_MARKER: [u8; 2] = [0xFF, 0xD9];
/// Files shorter than this are not considered images.
pub const MIN_CONTAINER_SIZE: usize = 100;

/// Start marker, width, height, quality, coefficient count.
const PREAMBLE_LEN: usize = 4 + 4 + 4 + 1 + 4;

/// Coefficients and metadata of a decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub coefficients: Vec<i16>,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl DecodedImage {
    /// Number of 8x8 blocks covering a `width` x `height` plane.
    pub fn block_count(width: u32, height: u32) -> usize {
        (width as usize).div_ceil(8) * (height as usize).div_ceil(8)
    }

    /// Plausible cover coefficients generated from `seed`.
    ///
    /// DC terms are large; AC terms are mostly zero with a tail of small and
    /// medium magnitudes, roughly what a quantized photo looks like.
    pub fn synthetic(width: u32, height: u32, quality: u8, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let blocks = Self::block_count(width, height);

        let mut coefficients = Vec::with_capacity(blocks * BLOCK_SIZE);
        for _ in 0..blocks {
            coefficients.push(rng.i16(-1024..1024));
            for _ in 1..BLOCK_SIZE {
                let value = match rng.u8(0..100) {
                    0..=54 => 0,
                    55..=79 => rng.i16(-2..=2),
                    80..=94 => rng.i16(-12..=12),
                    _ => rng.i16(-60..=60),
                };
                coefficients.push(value);
            }
        }

        DecodedImage {
            coefficients,
            width,
            height,
            quality,
        }
    }
}

/// Turns image files into coefficient buffers and back.
pub trait CoefficientCodec {
    /// Fails with `FileNotFound` if `path` cannot be opened, `InvalidFormat` if it is not a usable image.
    fn decode(&self, path: &Path) -> Result<DecodedImage>;

    /// Write `image` re-encoded at `quality`, returning the number of bytes written.
    fn encode(&self, image: &DecodedImage, quality: u8, path: &Path) -> Result<u64>;
}

/// Raw coefficient container.
///
/// Layout, all integers big endian:
///
/// ```text
/// FF D8 FF E0 | width u32 | height u32 | quality u8 | count u32 | count x i16 | FF D9
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerCodec;

impl ContainerCodec {
    pub fn new() -> Self {
        ContainerCodec
    }

    /// Serialize an image into container bytes.
    pub fn to_bytes(&self, image: &DecodedImage, quality: u8) -> Result<Vec<u8>> {
        let count = u32::try_from(image.coefficients.len()).map_err(|_| {
            OutguessError::invalid_input("too many coefficients for a container file")
        })?;

        let mut bytes =
            Vec::with_capacity(PREAMBLE_LEN + image.coefficients.len() * 2 + END_MARKER.len());
        bytes.extend_from_slice(&START_MARKER);
        bytes.write_u32::<BigEndian>(image.width)?;
        bytes.write_u32::<BigEndian>(image.height)?;
        bytes.write_u8(quality)?;
        bytes.write_u32::<BigEndian>(count)?;
        for &c in &image.coefficients {
            bytes.write_i16::<BigEndian>(c)?;
        }
        bytes.extend_from_slice(&END_MARKER);

        Ok(bytes)
    }

    /// Parse container bytes.
    pub fn parse(&self, bytes: &[u8]) -> Result<DecodedImage> {
        if bytes.len() < MIN_CONTAINER_SIZE {
            return Err(OutguessError::invalid_format(format!(
                "{} bytes is too small for an image",
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let mut marker = [0u8; 4];
        cursor.read_exact(&mut marker)?;
        if marker != START_MARKER {
            return Err(OutguessError::invalid_format("missing start marker"));
        }

        let width = cursor.read_u32::<BigEndian>()?;
        let height = cursor.read_u32::<BigEndian>()?;
        let quality = cursor.read_u8()?;
        let count = cursor.read_u32::<BigEndian>()? as usize;

        let expected = PREAMBLE_LEN + count * 2 + END_MARKER.len();
        if bytes.len() != expected {
            return Err(OutguessError::invalid_format(format!(
                "container declares {count} coefficients, expected {expected} bytes, found {}",
                bytes.len()
            )));
        }
        if count % BLOCK_SIZE != 0 {
            return Err(OutguessError::invalid_format(format!(
                "{count} coefficients is not a whole number of blocks"
            )));
        }

        let mut coefficients = vec![0i16; count];
        cursor.read_i16_into::<BigEndian>(&mut coefficients)?;

        let mut end = [0u8; 2];
        cursor.read_exact(&mut end)?;
        if end != END_MARKER {
            return Err(OutguessError::invalid_format("missing end marker"));
        }

        Ok(DecodedImage {
            coefficients,
            width,
            height,
            quality,
        })
    }
}

impl CoefficientCodec for ContainerCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                OutguessError::FileNotFound {
                    path: path.to_path_buf(),
                    source,
                }
            }
            _ => OutguessError::Io(source),
        })?;

        self.parse(&bytes)
    }

    fn encode(&self, image: &DecodedImage, quality: u8, path: &Path) -> Result<u64> {
        let bytes = self.to_bytes(image, quality)?;
        fs::write(path, &bytes).map_err(OutguessError::EncodeFailed)?;
        log::trace!("wrote {} bytes to {}", bytes.len(), path.display());

        Ok(bytes.len() as u64)
    }
}
