//! File-level operations.
//!
//! These decode a carrier through a [`CoefficientCodec`](crate::codec::CoefficientCodec),
//! run the buffer-level engine and report through plain result records. They
//! never return `Err` and never panic: failures become an
//! [`ErrorCode`](crate::ErrorCode) plus a message, and a panic anywhere below
//! is reported as `AllocationFailure`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{OutguessError, Result};

pub mod analyze;
pub mod embed;
pub mod extract;

pub use analyze::{embedding_stats, has_hidden_data, max_message_size, test_compression_resistance};
pub use embed::EmbedResult;
pub use extract::ExtractResult;

/// Run `op`, turning a panic into [`OutguessError::Internal`].
pub(crate) fn guarded<T>(op: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(op)).unwrap_or_else(|payload| {
        let reason = panic_message(payload.as_ref());
        log::error!("operation panicked: {reason}");
        Err(OutguessError::Internal(reason))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
