//! Key derivation and key confirmation
//!
//! Implements the `KeyDerivation` collaborator for every `KdfAlgorithm`, and
//! the HMAC-SHA256 tag used for optional key confirmation.

#![forbid(unsafe_code)]

pub mod kdf;
pub mod mac;

// Re-export main types for convenience
pub use kdf::{kdf_for, ConcatKdf, HkdfKdf};
pub use mac::{confirmation_tag, verify_confirmation_tag};

// Re-export the API error system instead of custom error types
pub use kagree_api::error::{Error, Result};
