//! Public API traits and types for kagree
//!
//! This crate is the contract between the agreement engine and its
//! collaborators: the error taxonomy, the raw primitive traits each algorithm
//! family implements, the key and secret containers, and the key-derivation
//! trait.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use types::*;

pub use traits::{
    DhPrimitive, KemPrimitive, KeyDerivation, MqvInputs, Primitive, SignaturePrimitive,
};
