//! Trait definitions for the collaborators of the agreement engine
//!
//! Primitives wrap the per-family math; the engine only ever talks to them
//! through these traits.

pub mod agreement;
pub mod kdf;

pub use agreement::{DhPrimitive, KemPrimitive, MqvInputs, Primitive, SignaturePrimitive};
pub use kdf::KeyDerivation;
