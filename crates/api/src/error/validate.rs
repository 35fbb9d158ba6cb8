//! Validation helpers shared by primitives and the engine

use super::types::{Error, Result};
use crate::types::Family;

/// Validate a parameter condition
pub fn parameter(condition: bool, context: &'static str, message: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::parameter(context, message));
    }
    Ok(())
}

/// Validate an exact length
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidLength {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate that a key or message is tagged with the expected family
pub fn family(context: &'static str, expected: Family, actual: Family) -> Result<()> {
    if expected != actual {
        return Err(Error::type_mismatch(
            context,
            format!("expected {expected}, got {actual}"),
        ));
    }
    Ok(())
}
