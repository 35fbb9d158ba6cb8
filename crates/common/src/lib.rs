//! Common implementations shared by kagree crates
//!
//! Secret containers that zeroize on drop. Primitives use them for seeds and
//! intermediate scalars, the engine for the concatenated key material fed to
//! the KDF.

pub mod security;

// Re-export core security types
pub use security::{SecretBuffer, SecretVec, ZeroizeGuard};
