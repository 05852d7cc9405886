// src/engine/common.rs
//
// Common utilities shared across engine modules.

use crate::error::{InlineImageError, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run a codec closure with panics confined to the call.
///
/// The C-backed codecs can abort a conversion by panicking on malformed input;
/// a panic here must surface as an error result, not unwind through the public
/// API. The stage label ends up in the error message for diagnostics.
pub fn run_with_panic_policy<T>(stage: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::debug!(stage, %message, "codec panic confined");
            Err(InlineImageError::internal_panic(format!(
                "{stage}: {message}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_ok_and_err() {
        let ok: Result<u32> = run_with_panic_policy("test", || Ok(7));
        assert_eq!(ok.unwrap(), 7);

        let err: Result<u32> =
            run_with_panic_policy("test", || Err(InlineImageError::corrupted_image()));
        assert!(matches!(err, Err(InlineImageError::CorruptedImage)));
    }

    #[test]
    fn converts_panic_to_internal_error() {
        let result: Result<()> = run_with_panic_policy("decode:test", || panic!("boom"));
        match result {
            Err(InlineImageError::InternalPanic { message }) => {
                assert!(message.contains("decode:test"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected InternalPanic, got {other:?}"),
        }
    }
}
